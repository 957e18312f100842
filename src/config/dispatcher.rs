use crate::event::Level;
use std::time::Duration;

pub const DEFAULT_BATCH_SIZE: usize = 8;
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(10);
pub const DEFAULT_QUEUE_CAPACITY: usize = 16;
pub const DEFAULT_SHRINK_THRESHOLD: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Pre-issued personal access token
    Token { user_id: String, token: String },
    /// Exchanged for a token at login
    Password { email: String, password: String },
}

/// When the worker flushes a partial batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushInterval {
    Every(Duration),
    /// Flush only when the batch is full
    Disabled,
}

impl FlushInterval {
    /// Negative seconds disable the timer, zero selects the default.
    pub fn from_secs(secs: i64) -> Self {
        match secs {
            s if s < 0 => FlushInterval::Disabled,
            0 => FlushInterval::Every(DEFAULT_FLUSH_INTERVAL),
            s => FlushInterval::Every(Duration::from_secs(s as u64)),
        }
    }

    pub fn duration(&self) -> Option<Duration> {
        match self {
            FlushInterval::Every(d) if d.is_zero() => Some(DEFAULT_FLUSH_INTERVAL),
            FlushInterval::Every(d) => Some(*d),
            FlushInterval::Disabled => None,
        }
    }
}

impl Default for FlushInterval {
    fn default() -> Self {
        FlushInterval::Every(DEFAULT_FLUSH_INTERVAL)
    }
}

/// How posted batches look in the channel
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayOptions {
    pub title: String,
    pub alias: String,
    pub emoji: String,
    pub avatar: String,
    /// Users mentioned with `@user` on every post
    pub notify_users: Vec<String>,
}

impl DisplayOptions {
    /// Header text shared by every posted batch
    pub fn header_text(&self) -> String {
        let mentions = self
            .notify_users
            .iter()
            .map(|user| format!("@{}", user))
            .collect::<Vec<_>>()
            .join(" ");
        format!("{}\n*{} logs*", mentions, self.title)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatcherConfig {
    pub server_url: String,
    pub channel: String,
    pub credentials: Credentials,
    pub display: DisplayOptions,
    /// Empty means every level is accepted
    pub accepted_levels: Vec<Level>,
    /// Zero selects the default
    pub batch_size: usize,
    pub flush_interval: FlushInterval,
    pub queue_capacity: usize,
    /// Batch capacity above which the buffer is reallocated after a flush
    pub shrink_threshold: usize,
    pub disabled: bool,
}

impl DispatcherConfig {
    pub fn new(
        server_url: impl Into<String>,
        channel: impl Into<String>,
        credentials: Credentials,
    ) -> Self {
        Self {
            server_url: server_url.into(),
            channel: channel.into(),
            credentials,
            display: DisplayOptions::default(),
            accepted_levels: Vec::new(),
            batch_size: DEFAULT_BATCH_SIZE,
            flush_interval: FlushInterval::default(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            shrink_threshold: DEFAULT_SHRINK_THRESHOLD,
            disabled: false,
        }
    }

    pub fn with_display(mut self, display: DisplayOptions) -> Self {
        self.display = display;
        self
    }

    pub fn with_accepted_levels(mut self, levels: Vec<Level>) -> Self {
        self.accepted_levels = levels;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_flush_interval(mut self, interval: FlushInterval) -> Self {
        self.flush_interval = interval;
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn with_shrink_threshold(mut self, threshold: usize) -> Self {
        self.shrink_threshold = threshold;
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn effective_batch_size(&self) -> usize {
        if self.batch_size == 0 {
            DEFAULT_BATCH_SIZE
        } else {
            self.batch_size
        }
    }

    pub fn effective_queue_capacity(&self) -> usize {
        if self.queue_capacity == 0 {
            DEFAULT_QUEUE_CAPACITY
        } else {
            self.queue_capacity
        }
    }

    /// Accepted levels, or every level when none are configured
    pub fn accepted_levels(&self) -> Vec<Level> {
        if self.accepted_levels.is_empty() {
            Level::ALL.to_vec()
        } else {
            self.accepted_levels.clone()
        }
    }

    pub fn accepts(&self, level: Level) -> bool {
        self.accepted_levels.is_empty() || self.accepted_levels.contains(&level)
    }
}
