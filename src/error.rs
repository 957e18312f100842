use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Dispatcher is not running, call start first")]
    NotRunning,

    #[error("Dispatcher is already running")]
    AlreadyRunning,

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Delivery error: {0}")]
    Delivery(String),

    #[error("Inbound queue is full")]
    QueueFull,

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, RelayError>;
