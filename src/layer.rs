//! `tracing` integration: forwards application events to a [`Dispatcher`]

use crate::dispatch::Dispatcher;
use crate::event::{Level, LogEvent};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;

/// Targets whose events are never relayed. Relaying them would feed the
/// dispatcher's own activity (and its HTTP stack) back into itself.
const IGNORED_TARGETS: &[&str] = &[
    "rocket_log_relay",
    "reqwest",
    "hyper",
    "hyper_util",
    "h2",
    "rustls",
];

/// Layer that turns `tracing` events into [`LogEvent`]s.
///
/// Events go through [`Dispatcher::try_submit`]: when the queue is full or
/// the dispatcher is not running the event is dropped rather than blocking
/// the instrumented code.
pub struct RelayLayer {
    dispatcher: Arc<Dispatcher>,
}

impl RelayLayer {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }
}

impl<S: Subscriber> tracing_subscriber::Layer<S> for RelayLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if is_ignored(metadata.target()) {
            return;
        }

        let level = Level::from(*metadata.level());
        if !self.dispatcher.accepts(level) {
            return;
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let mut log_event = LogEvent::new(level, visitor.message.unwrap_or_default());
        log_event.fields = visitor.fields;
        log_event
            .fields
            .insert("target".to_string(), Value::from(metadata.target()));

        let _ = self.dispatcher.try_submit(log_event);
    }
}

fn is_ignored(target: &str) -> bool {
    let root = target.split("::").next().unwrap_or(target);
    IGNORED_TARGETS.contains(&root)
}

#[derive(Default)]
struct FieldVisitor {
    message: Option<String>,
    fields: HashMap<String, Value>,
}

impl FieldVisitor {
    fn insert(&mut self, field: &Field, value: Value) {
        if field.name() == "message" {
            self.message = Some(match value {
                Value::String(s) => s,
                other => other.to_string(),
            });
        } else {
            self.fields.insert(field.name().to_string(), value);
        }
    }
}

impl Visit for FieldVisitor {
    fn record_f64(&mut self, field: &Field, value: f64) {
        self.insert(field, Value::from(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, Value::from(value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, Value::from(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.insert(field, Value::String(format!("{:?}", value)));
    }
}
