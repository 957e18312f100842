use crate::event::Level;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// A single log entry produced by the application
#[derive(Debug, Clone, PartialEq)]
pub struct LogEvent {
    pub level: Level,
    pub timestamp: DateTime<Utc>,
    pub message: String,
    /// Structured fields. Iteration order is unspecified.
    pub fields: HashMap<String, Value>,
}

impl LogEvent {
    /// Create an event stamped with the current time
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            timestamp: Utc::now(),
            message: message.into(),
            fields: HashMap::new(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }
}

/// Delivery-ready representation of one log event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub color: String,
    pub title: String,
    pub ts: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<AttachmentField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentField {
    pub short: bool,
    pub title: String,
    pub value: String,
}
