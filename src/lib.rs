pub mod config;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod layer;
pub mod logging;
pub mod rocket;

pub use config::DispatcherConfig;
pub use dispatch::Dispatcher;
pub use error::{RelayError, Result};
pub use event::{Level, LogEvent};
