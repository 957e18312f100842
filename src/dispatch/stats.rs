use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared between producers and the worker
#[derive(Debug, Default)]
pub(crate) struct DispatchCounters {
    submitted: AtomicU64,
    flushes: AtomicU64,
    delivered: AtomicU64,
    failed_deliveries: AtomicU64,
}

impl DispatchCounters {
    pub fn record_submit(&self) {
        self.submitted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_flush(&self, attachments: usize, ok: bool) {
        self.flushes.fetch_add(1, Ordering::Relaxed);
        if ok {
            self.delivered
                .fetch_add(attachments as u64, Ordering::Relaxed);
        } else {
            self.failed_deliveries.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self) -> DispatchStats {
        DispatchStats {
            submitted: self.submitted.load(Ordering::Relaxed),
            flushes: self.flushes.load(Ordering::Relaxed),
            delivered: self.delivered.load(Ordering::Relaxed),
            failed_deliveries: self.failed_deliveries.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time dispatcher statistics
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchStats {
    /// Events accepted into the inbound queue
    pub submitted: u64,
    pub flushes: u64,
    /// Attachments in batches the sink accepted
    pub delivered: u64,
    /// Flushes the sink rejected
    pub failed_deliveries: u64,
}
