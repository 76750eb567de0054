//! In-memory tracing capture.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use tracing::field::{Field, Visit};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

/// One recorded tracing event.
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    /// Event level
    pub level: Level,
    /// Event target (module path by default)
    pub target: String,
    /// Formatted `message` field
    pub message: String,
    /// Every other field, formatted
    pub fields: BTreeMap<String, String>,
}

impl CapturedEvent {
    /// Formatted value of a non-message field.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// A `tracing_subscriber` layer that keeps every event it sees.
///
/// ```
/// use spotwrap_testkit::LogCapture;
///
/// let logs = LogCapture::new();
/// let _guard = logs.install();
/// tracing::warn!(operation = "demo", "`demo()` failed: boom");
///
/// assert_eq!(logs.warnings().len(), 1);
/// assert!(logs.warnings()[0].message.contains("boom"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct LogCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl LogCapture {
    /// Create an empty capture.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install as the thread-local default subscriber until the guard drops.
    ///
    /// `#[tokio::test]` runs on a current-thread runtime, so events from
    /// awaited futures land here too.
    pub fn install(&self) -> DefaultGuard {
        let subscriber = tracing_subscriber::registry().with(self.clone());
        tracing::subscriber::set_default(subscriber)
    }

    /// All events so far.
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.lock().clone()
    }

    /// Events at exactly `level`.
    pub fn at_level(&self, level: Level) -> Vec<CapturedEvent> {
        self.lock().iter().filter(|e| e.level == level).cloned().collect()
    }

    /// `WARN` events.
    pub fn warnings(&self) -> Vec<CapturedEvent> {
        self.at_level(Level::WARN)
    }

    /// `INFO` events.
    pub fn infos(&self) -> Vec<CapturedEvent> {
        self.at_level(Level::INFO)
    }

    /// Forget everything captured so far.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<CapturedEvent>> {
        // A panicking test may poison the lock; the data is still usable.
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<S: Subscriber> Layer<S> for LogCapture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldCollector::default();
        event.record(&mut visitor);

        let metadata = event.metadata();
        self.lock().push(CapturedEvent {
            level: *metadata.level(),
            target: metadata.target().to_string(),
            message: visitor.message,
            fields: visitor.fields,
        });
    }
}

#[derive(Default)]
struct FieldCollector {
    message: String,
    fields: BTreeMap<String, String>,
}

impl FieldCollector {
    fn store(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.message = value;
        } else {
            self.fields.insert(field.name().to_string(), value);
        }
    }
}

impl Visit for FieldCollector {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.store(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.store(field, format!("{:?}", value));
    }
}
