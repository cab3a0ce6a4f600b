//! Log Capture Utilities for Testing
//!
//! Captures tracing events through a subscriber scoped to one closure, so
//! parallel tests never see each other's output.

use std::sync::{Arc, Mutex};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;

/// Captured log record
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub level: Level,
    pub message: String,
}

/// Log capture layer for testing
#[derive(Clone, Default)]
pub struct LogCapture {
    records: Arc<Mutex<Vec<LogRecord>>>,
}

impl LogCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all captured log records
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().unwrap().clone()
    }

    /// Check if any log message matches pattern
    pub fn contains(&self, pattern: &str) -> bool {
        self.records().iter().any(|r| r.message.contains(pattern))
    }

    /// Count log messages matching pattern
    pub fn count_matching(&self, pattern: &str) -> usize {
        self.records()
            .iter()
            .filter(|r| r.message.contains(pattern))
            .count()
    }

    /// Count log messages matching pattern at exactly `level`
    pub fn count_at(&self, level: Level, pattern: &str) -> usize {
        self.records()
            .iter()
            .filter(|r| r.level == level && r.message.contains(pattern))
            .count()
    }

    /// Assert at least one log matches pattern
    pub fn assert_contains(&self, pattern: &str) {
        assert!(
            self.contains(pattern),
            "Expected log matching '{}', but none found. All logs:\n{}",
            pattern,
            self.records()
                .iter()
                .map(|r| r.message.as_str())
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    /// Assert no logs match pattern
    pub fn assert_no_match(&self, pattern: &str) {
        let count = self.count_matching(pattern);
        assert_eq!(count, 0, "Expected no logs matching '{}', found {}", pattern, count);
    }
}

impl<S> tracing_subscriber::Layer<S> for LogCapture
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        use tracing::field::Visit;

        struct MessageVisitor {
            message: String,
        }

        impl Visit for MessageVisitor {
            fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
                if field.name() == "message" {
                    self.message = format!("{:?}", value);
                }
            }

            fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
                if field.name() == "message" {
                    self.message = value.to_string();
                }
            }
        }

        let mut visitor = MessageVisitor {
            message: String::new(),
        };
        event.record(&mut visitor);

        self.records.lock().unwrap().push(LogRecord {
            level: *event.metadata().level(),
            message: visitor.message,
        });
    }
}

/// Run `f` with every tracing event (all levels) routed into a fresh
/// [`LogCapture`]
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, LogCapture) {
    let capture = LogCapture::new();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, capture)
}
