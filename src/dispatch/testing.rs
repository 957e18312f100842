use crate::dispatch::DeliverySink;
use crate::error::{RelayError, Result};
use crate::event::Attachment;
use crate::rocket::MessageHeader;
use futures::future::BoxFuture;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

pub(crate) type Delivered = Vec<(Instant, Vec<Attachment>)>;

/// Sink that records every batch it is handed
#[derive(Clone, Default)]
pub(crate) struct RecordingSink {
    batches: Arc<Mutex<Delivered>>,
    headers: Arc<Mutex<Vec<MessageHeader>>>,
    fail_delivery: bool,
    fail_connect: bool,
    delay: Option<Duration>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records batches but reports every delivery as failed
    pub fn failing() -> Self {
        Self {
            fail_delivery: true,
            ..Self::default()
        }
    }

    /// Records each batch when handed over, then takes `delay` to deliver it
    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn unreachable() -> Self {
        Self {
            fail_connect: true,
            ..Self::default()
        }
    }

    pub fn batches(&self) -> Delivered {
        self.batches.lock().unwrap().clone()
    }

    pub fn headers(&self) -> Vec<MessageHeader> {
        self.headers.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<Vec<String>> {
        self.batches()
            .into_iter()
            .map(|(_, batch)| batch.into_iter().map(|a| a.text).collect())
            .collect()
    }
}

impl DeliverySink for RecordingSink {
    fn connect(&mut self) -> BoxFuture<'_, Result<()>> {
        let fail = self.fail_connect;
        Box::pin(async move {
            if fail {
                Err(RelayError::Connection("connection refused".to_string()))
            } else {
                Ok(())
            }
        })
    }

    fn post_batch<'a>(
        &'a self,
        header: &'a MessageHeader,
        attachments: &'a [Attachment],
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            self.headers.lock().unwrap().push(header.clone());
            self.batches
                .lock()
                .unwrap()
                .push((Instant::now(), attachments.to_vec()));
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail_delivery {
                Err(RelayError::Delivery("channel archived".to_string()))
            } else {
                Ok(())
            }
        })
    }
}

pub(crate) fn attachment(text: &str) -> Attachment {
    Attachment {
        color: "green".to_string(),
        title: "info log".to_string(),
        ts: String::new(),
        text: text.to_string(),
        fields: vec![],
    }
}
