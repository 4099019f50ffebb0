//! Observability for pocketdb
//!
//! - Structured logging (JSON lines)
//! - Monotonic counters
//! - Typed store events
//!
//! Observability is read-only: nothing here changes what an operation
//! returns, and a failing log sink never fails the store.

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{LogBuffer, Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};

/// Logger plus counters owned by one store
#[derive(Debug, Default)]
pub struct Observer {
    logger: Logger,
    metrics: MetricsRegistry,
}

impl Observer {
    /// Create an observer logging through `logger`
    pub fn new(logger: Logger) -> Self {
        Self {
            logger,
            metrics: MetricsRegistry::new(),
        }
    }

    /// Log an event at its own severity
    pub fn emit(&self, event: Event, fields: &[(&str, &str)]) {
        self.logger.log(event.severity(), event.as_str(), fields);
    }

    /// The store's counters
    pub fn metrics(&self) -> &MetricsRegistry {
        &self.metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_uses_event_severity() {
        let (logger, buffer) = Logger::memory(Some(Severity::Trace));
        let observer = Observer::new(logger);

        observer.emit(Event::RecordCreated, &[("category", "users")]);
        observer.emit(Event::TypeRejected, &[]);

        let events = buffer.events();
        assert_eq!(events[0]["event"], "RECORD_CREATED");
        assert_eq!(events[0]["severity"], "TRACE");
        assert_eq!(events[0]["category"], "users");
        assert_eq!(events[1]["severity"], "WARN");
    }

    #[test]
    fn test_silenced_observer_still_counts() {
        let (logger, buffer) = Logger::memory(None);
        let observer = Observer::new(logger);

        observer.metrics().increment_records_created();
        observer.emit(Event::RecordCreated, &[("category", "users")]);

        assert!(buffer.lines().is_empty());
        assert_eq!(observer.metrics().snapshot().records_created, 1);
    }

    #[test]
    fn test_emit_respects_threshold() {
        let (logger, buffer) = Logger::memory(Some(Severity::Info));
        let observer = Observer::new(logger);

        observer.emit(Event::RecordCreated, &[]);
        observer.emit(Event::CategoryCreated, &[]);

        assert_eq!(buffer.lines().len(), 1);
    }
}
