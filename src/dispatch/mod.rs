//! Batching dispatcher
//!
//! Producers hand events to a [`Dispatcher`], which formats them and queues
//! them on a bounded channel. A single background worker owns the pending
//! batch and flushes it to a [`DeliverySink`] when it reaches the configured
//! size or when the flush interval elapses, whichever comes first.

mod batch;
mod handle;
mod sink;
mod stats;
mod worker;

#[cfg(test)]
pub(crate) mod testing;

pub use batch::Batch;
pub use handle::Dispatcher;
pub use sink::DeliverySink;
pub use stats::DispatchStats;
