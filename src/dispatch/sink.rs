use crate::error::Result;
use crate::event::Attachment;
use crate::rocket::MessageHeader;
use futures::future::BoxFuture;

/// Destination for flushed batches.
///
/// `connect` runs once during start and may fail the start. Errors from
/// `post_batch` are dropped by the dispatcher.
pub trait DeliverySink: Send + Sync + 'static {
    fn connect(&mut self) -> BoxFuture<'_, Result<()>>;

    fn post_batch<'a>(
        &'a self,
        header: &'a MessageHeader,
        attachments: &'a [Attachment],
    ) -> BoxFuture<'a, Result<()>>;
}
