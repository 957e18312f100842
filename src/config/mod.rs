mod dispatcher;
mod settings;

pub use dispatcher::{
    Credentials, DEFAULT_BATCH_SIZE, DEFAULT_FLUSH_INTERVAL, DEFAULT_QUEUE_CAPACITY,
    DEFAULT_SHRINK_THRESHOLD, DispatcherConfig, DisplayOptions, FlushInterval,
};
pub use settings::{load_settings, settings_from_lookup};
