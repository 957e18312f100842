use crate::config::DispatcherConfig;
use crate::dispatch::DeliverySink;
use crate::dispatch::batch::Batch;
use crate::dispatch::stats::DispatchCounters;
use crate::event::Attachment;
use crate::logging::Timer;
use crate::rocket::MessageHeader;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Instant, Sleep, sleep};

/// Deadline used when `now + interval` does not fit in an `Instant`
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// Background task that owns the batch and decides when to flush it
pub(crate) struct BatchWorker<S> {
    rx: mpsc::Receiver<Attachment>,
    sink: S,
    header: MessageHeader,
    batch: Batch,
    /// `None` disarms the flush timer
    interval: Option<Duration>,
    counters: Arc<DispatchCounters>,
}

impl<S: DeliverySink> BatchWorker<S> {
    pub fn new(
        rx: mpsc::Receiver<Attachment>,
        sink: S,
        config: &DispatcherConfig,
        counters: Arc<DispatchCounters>,
    ) -> Self {
        Self {
            rx,
            sink,
            header: MessageHeader::from_config(config),
            batch: Batch::new(config.effective_batch_size(), config.shrink_threshold),
            interval: config.flush_interval.duration(),
            counters,
        }
    }

    pub async fn run(mut self) {
        tracing::debug!(
            channel = %self.header.channel,
            interval_secs = ?self.interval.map(|d| d.as_secs_f64()),
            "Batch worker started"
        );

        // Disarmed timers are never polled, so the initial deadline is irrelevant
        let timer = sleep(self.interval.unwrap_or(Duration::ZERO));
        tokio::pin!(timer);

        loop {
            tokio::select! {
                received = self.rx.recv() => match received {
                    Some(attachment) => {
                        self.batch.push(attachment);
                        if self.batch.is_full() {
                            self.flush().await;
                            self.reset_timer(timer.as_mut());
                        }
                    }
                    None => {
                        // every producer handle is gone
                        if !self.batch.is_empty() {
                            self.flush().await;
                        }
                        break;
                    }
                },
                () = &mut timer, if self.interval.is_some() => {
                    if !self.batch.is_empty() {
                        self.flush().await;
                    }
                    self.reset_timer(timer.as_mut());
                }
            }
        }

        tracing::debug!(channel = %self.header.channel, "Batch worker stopped");
    }

    fn reset_timer(&self, timer: std::pin::Pin<&mut Sleep>) {
        if let Some(interval) = self.interval {
            let now = Instant::now();
            let deadline = now
                .checked_add(interval)
                .unwrap_or_else(|| now + FAR_FUTURE);
            timer.reset(deadline);
        }
    }

    /// Hand the batch to the sink and clear it. Delivery errors are dropped.
    async fn flush(&mut self) {
        let _timer = Timer::new("flush_batch");
        let count = self.batch.len();

        let result = self
            .sink
            .post_batch(&self.header, self.batch.as_slice())
            .await;

        self.counters.record_flush(count, result.is_ok());
        self.batch.clear();
    }
}
