//! Structured JSON logger for hintsig
//!
//! - Structured logs (JSON)
//! - Deterministic key ordering
//! - Explicit severity levels
//! - One log line = one event
//! - Synchronous, no buffering
//!
//! Lines emitted inside [`Logger::capture`] are collected for the calling
//! thread instead of being written out.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, Write};

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Debug-level detail
    Trace = 0,
    /// Normal operations
    Info = 1,
    /// Recoverable issues
    Warn = 2,
    /// Operation failures
    Error = 3,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

thread_local! {
    static CAPTURED: RefCell<Option<Vec<String>>> = const { RefCell::new(None) };
}

/// A log line collected by [`Logger::capture`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedLog {
    /// Event name
    pub event: String,
    /// Severity string ("WARN", ...)
    pub severity: String,
    /// Remaining fields
    pub fields: BTreeMap<String, String>,
}

impl CapturedLog {
    fn parse(line: &str) -> Option<Self> {
        let parsed: BTreeMap<String, String> = serde_json::from_str(line.trim_end()).ok()?;
        let mut fields = parsed;
        let event = fields.remove("event")?;
        let severity = fields.remove("severity")?;
        Some(Self {
            event,
            severity,
            fields,
        })
    }

    /// Returns the `message` field, or an empty string.
    pub fn message(&self) -> &str {
        self.fields.get("message").map(String::as_str).unwrap_or("")
    }

    /// True for WARN lines.
    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warn.as_str()
    }
}

/// Reinstates the enclosing capture buffer, also when the captured closure panics.
struct RestoreCapture(Option<Vec<String>>);

impl Drop for RestoreCapture {
    fn drop(&mut self) {
        let previous = self.0.take();
        CAPTURED.with(|c| *c.borrow_mut() = previous);
    }
}

/// A structured logger that outputs JSON logs
pub struct Logger;

impl Logger {
    /// Log an event with the given severity and fields
    ///
    /// Fields are output in deterministic order (alphabetical by key)
    pub fn log(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        let line = Self::format_line(severity, event, fields);
        if Self::try_capture(&line) {
            return;
        }
        if severity >= Severity::Error {
            Self::write_line(&line, &mut io::stderr());
        } else {
            Self::write_line(&line, &mut io::stdout());
        }
    }

    /// Runs `f`, collecting every line logged on this thread while it runs.
    ///
    /// Nested captures collect into the innermost buffer.
    pub fn capture<F, R>(f: F) -> (R, Vec<CapturedLog>)
    where
        F: FnOnce() -> R,
    {
        let restore = RestoreCapture(CAPTURED.with(|c| c.borrow_mut().replace(Vec::new())));
        let result = f();
        let lines = CAPTURED.with(|c| c.borrow_mut().take().unwrap_or_default());
        drop(restore);
        let logs = lines
            .iter()
            .filter_map(|line| CapturedLog::parse(line))
            .collect();
        (result, logs)
    }

    fn try_capture(line: &str) -> bool {
        CAPTURED.with(|c| match c.borrow_mut().as_mut() {
            Some(buffer) => {
                buffer.push(line.to_string());
                true
            }
            None => false,
        })
    }

    fn write_line<W: Write>(line: &str, writer: &mut W) {
        // Write atomically (one syscall)
        let _ = writer.write_all(line.as_bytes());
        let _ = writer.flush();
    }

    /// Renders one JSON line: event first, then severity, then sorted fields.
    fn format_line(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
        let mut output = String::with_capacity(256);

        output.push('{');

        output.push_str("\"event\":\"");
        Self::escape_json_string(&mut output, event);
        output.push('"');

        output.push_str(",\"severity\":\"");
        output.push_str(severity.as_str());
        output.push('"');

        let mut sorted_fields: Vec<_> = fields.iter().collect();
        sorted_fields.sort_by_key(|(k, _)| *k);

        for (key, value) in sorted_fields {
            output.push_str(",\"");
            Self::escape_json_string(&mut output, key);
            output.push_str("\":\"");
            Self::escape_json_string(&mut output, value);
            output.push('"');
        }

        output.push('}');
        output.push('\n');
        output
    }

    /// Escape special characters for JSON strings
    fn escape_json_string(output: &mut String, s: &str) {
        for c in s.chars() {
            match c {
                '"' => output.push_str("\\\""),
                '\\' => output.push_str("\\\\"),
                '\n' => output.push_str("\\n"),
                '\r' => output.push_str("\\r"),
                '\t' => output.push_str("\\t"),
                c if c.is_control() => {
                    output.push_str(&format!("\\u{:04x}", c as u32));
                }
                c => output.push(c),
            }
        }
    }

    /// Log at TRACE level
    pub fn trace(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Trace, event, fields);
    }

    /// Log at INFO level
    pub fn info(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Info, event, fields);
    }

    /// Log at WARN level
    pub fn warn(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Warn, event, fields);
    }

    /// Log at ERROR level
    pub fn error(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Error, event, fields);
    }
}
