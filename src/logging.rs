//! Logging utilities for structured tracing

use crate::layer::RelayLayer;
use std::time::Instant;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const DEFAULT_FILTER: &str = "rocket_log_relay=info";

/// Track operation timing and log on drop
pub struct Timer {
    start: Instant,
    operation: &'static str,
}

impl Timer {
    pub fn new(operation: &'static str) -> Self {
        Self {
            start: Instant::now(),
            operation,
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        tracing::debug!(
            operation = %self.operation,
            duration_ms = self.elapsed_ms(),
            "Operation completed"
        );
    }
}

/// Log an error with structured context
pub fn log_error(operation: &str, error: &impl std::error::Error) {
    tracing::error!(
        operation = %operation,
        error = %error,
        error_kind = std::any::type_name_of_val(error),
        "Operation failed"
    );
}

/// Install the global subscriber: a console layer filtered by `RUST_LOG`
/// (default `rocket_log_relay=info`), plus the relay layer when one is given.
/// The relay layer sees every event and applies the dispatcher's own levels.
pub fn init_tracing(relay: Option<RelayLayer>) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true)
                .with_filter(filter),
        )
        .with(relay)
        .init();
}
