//! Observability for hintsig
//!
//! Structured JSON logging of typed lifecycle events. Hint and signature
//! diagnostics are reported here rather than raised, so saving or loading a
//! model never fails because a type hint is ambiguous.
//!
//! # Usage
//!
//! ```ignore
//! use hintsig::observability::{warn_event, Event};
//!
//! warn_event(Event::TypeHintUnsupported, "Unsupported type hint `list[object]`", &[]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{CapturedLog, Logger, Severity};

/// Log a lifecycle event
pub fn log_event(event: Event) {
    log_event_with_fields(event, &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    let severity = if event.is_warning() {
        Severity::Warn
    } else {
        Severity::Info
    };
    Logger::log(severity, event.as_str(), fields);
}

/// Log a warning-level event carrying a human readable `message` field
pub fn warn_event(event: Event, message: &str, fields: &[(&str, &str)]) {
    let mut all = Vec::with_capacity(fields.len() + 1);
    all.push(("message", message));
    all.extend_from_slice(fields);
    Logger::log(Severity::Warn, event.as_str(), &all);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warn_event_carries_message() {
        let (_, logs) = Logger::capture(|| {
            warn_event(Event::UndecoratedCallable, "Decorate your function", &[("function", "predict")]);
        });

        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].event, "UNDECORATED_CALLABLE");
        assert_eq!(logs[0].message(), "Decorate your function");
        assert_eq!(logs[0].fields["function"], "predict");
    }

    #[test]
    fn test_log_event_severity_follows_event() {
        let (_, logs) = Logger::capture(|| {
            log_event(Event::ModelSaved);
            log_event(Event::SignatureSkipped);
        });

        assert_eq!(logs[0].severity, "INFO");
        assert_eq!(logs[1].severity, "WARN");
    }
}
