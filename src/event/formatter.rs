//! Converts log events into Rocket.Chat attachments

use crate::event::{Attachment, AttachmentField, Level, LogEvent};
use serde_json::Value;
use std::fmt;

/// Values up to this many characters are rendered as short fields
pub const SHORT_FIELD_MAX_CHARS: usize = 20;

/// Attachment color tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Purple,
    Green,
    Red,
    Yellow,
}

impl Color {
    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Purple => "purple",
            Color::Green => "green",
            Color::Red => "red",
            Color::Yellow => "yellow",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn map_color(level: Level) -> Color {
    match level {
        Level::Debug => Color::Purple,
        Level::Info => Color::Green,
        Level::Error | Level::Fatal | Level::Panic => Color::Red,
        _ => Color::Yellow,
    }
}

/// Render a field value the way it should appear in chat.
///
/// Strings are rendered without JSON quotes; everything else uses its JSON form.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn is_short(rendered: &str) -> bool {
    rendered.chars().count() <= SHORT_FIELD_MAX_CHARS
}

/// Format one event into exactly one attachment.
///
/// Field order follows the event's map iteration order and is not stable.
pub fn format_event(event: &LogEvent) -> Attachment {
    let fields = event
        .fields
        .iter()
        .map(|(key, value)| {
            let value = render_value(value);
            AttachmentField {
                short: is_short(&value),
                title: key.clone(),
                value,
            }
        })
        .collect();

    Attachment {
        color: map_color(event.level).as_str().to_string(),
        title: format!("{} log", event.level),
        ts: event.timestamp.to_rfc3339(),
        text: event.message.clone(),
        fields,
    }
}
