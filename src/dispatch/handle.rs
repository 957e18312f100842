use crate::config::DispatcherConfig;
use crate::dispatch::DeliverySink;
use crate::dispatch::stats::{DispatchCounters, DispatchStats};
use crate::dispatch::worker::BatchWorker;
use crate::error::{RelayError, Result};
use crate::event::{Attachment, Level, LogEvent, format_event};
use crate::rocket::RocketClient;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;

/// Producer-facing handle to one batching worker.
///
/// Construct once per destination and share it (`Arc<Dispatcher>`) with every
/// producer. Events submitted before [`Dispatcher::start`] succeeds are
/// rejected with [`RelayError::NotRunning`].
pub struct Dispatcher {
    config: Arc<DispatcherConfig>,
    running: Mutex<Option<Running>>,
    counters: Arc<DispatchCounters>,
}

struct Running {
    sender: mpsc::Sender<Attachment>,
    worker: JoinHandle<()>,
}

impl Dispatcher {
    pub fn new(config: DispatcherConfig) -> Self {
        Self {
            config: Arc::new(config),
            running: Mutex::new(None),
            counters: Arc::new(DispatchCounters::default()),
        }
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// True while a worker is accepting events
    pub fn is_running(&self) -> bool {
        self.running()
            .as_ref()
            .is_some_and(|running| !running.sender.is_closed())
    }

    /// Log in to the configured Rocket.Chat server and start the worker
    pub async fn start(&self) -> Result<()> {
        let client = RocketClient::from_config(&self.config)?;
        self.start_with_sink(client).await
    }

    /// Connect `sink` and start the worker that delivers to it.
    ///
    /// A connection failure leaves the dispatcher not running.
    pub async fn start_with_sink<S: DeliverySink>(&self, mut sink: S) -> Result<()> {
        if self.is_running() {
            return Err(RelayError::AlreadyRunning);
        }

        sink.connect().await?;

        let mut running = self.running();
        if running
            .as_ref()
            .is_some_and(|running| !running.sender.is_closed())
        {
            return Err(RelayError::AlreadyRunning);
        }

        let (sender, rx) = mpsc::channel(self.config.effective_queue_capacity());
        let worker = BatchWorker::new(rx, sink, &self.config, self.counters.clone());
        *running = Some(Running {
            sender,
            worker: tokio::spawn(worker.run()),
        });
        drop(running);

        tracing::info!(
            channel = %self.config.channel,
            batch_size = self.config.effective_batch_size(),
            flush_interval = ?self.config.flush_interval,
            queue_capacity = self.config.effective_queue_capacity(),
            "Dispatcher started"
        );
        Ok(())
    }

    /// Levels this dispatcher forwards; every level when none are configured
    pub fn accepted_levels(&self) -> Vec<Level> {
        self.config.accepted_levels()
    }

    pub fn accepts(&self, level: Level) -> bool {
        self.config.accepts(level)
    }

    /// Queue an event, waiting for room when the queue is full
    pub async fn submit(&self, event: LogEvent) -> Result<()> {
        let Some(sender) = self.gate(event.level)? else {
            return Ok(());
        };

        sender
            .send(format_event(&event))
            .await
            .map_err(|_| RelayError::NotRunning)?;
        self.counters.record_submit();
        Ok(())
    }

    /// Queue an event without waiting; fails with `QueueFull` instead
    pub fn try_submit(&self, event: LogEvent) -> Result<()> {
        let Some(sender) = self.gate(event.level)? else {
            return Ok(());
        };

        sender
            .try_send(format_event(&event))
            .map_err(|e| match e {
                TrySendError::Full(_) => RelayError::QueueFull,
                TrySendError::Closed(_) => RelayError::NotRunning,
            })?;
        self.counters.record_submit();
        Ok(())
    }

    /// Queue an event from a thread outside the async runtime.
    ///
    /// Panics if called from within an async execution context.
    pub fn blocking_submit(&self, event: LogEvent) -> Result<()> {
        let Some(sender) = self.gate(event.level)? else {
            return Ok(());
        };

        sender
            .blocking_send(format_event(&event))
            .map_err(|_| RelayError::NotRunning)?;
        self.counters.record_submit();
        Ok(())
    }

    pub fn stats(&self) -> DispatchStats {
        self.counters.snapshot()
    }

    /// Close the queue and wait for the worker to flush what it holds.
    ///
    /// Later submissions fail with [`RelayError::NotRunning`] until the
    /// dispatcher is started again.
    pub async fn close(&self) -> Result<()> {
        let Running { sender, worker } = self.running().take().ok_or(RelayError::NotRunning)?;
        drop(sender);

        if let Err(e) = worker.await {
            tracing::warn!(error = %e, "Batch worker ended abnormally");
        }
        tracing::info!(channel = %self.config.channel, "Dispatcher closed");
        Ok(())
    }

    /// `Ok(None)` means the event is dropped on purpose
    fn gate(&self, level: Level) -> Result<Option<mpsc::Sender<Attachment>>> {
        if self.config.disabled || !self.config.accepts(level) {
            return Ok(None);
        }
        self.running()
            .as_ref()
            .map(|running| Some(running.sender.clone()))
            .ok_or(RelayError::NotRunning)
    }

    fn running(&self) -> MutexGuard<'_, Option<Running>> {
        self.running.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
