//! Structured JSON logger
//!
//! - One log line = one event
//! - `event` first, then `severity`, then fields sorted by key
//! - Synchronous, no buffering
//! - Events below the configured threshold are dropped

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Per-operation detail
    Trace = 0,
    /// Normal operations
    Info = 1,
    /// Caller mistakes the store tolerates
    Warn = 2,
    /// Operation failures
    Error = 3,
    /// The store can no longer be trusted
    Fatal = 4,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(Severity::Trace),
            "info" => Ok(Severity::Info),
            "warn" | "warning" => Ok(Severity::Warn),
            "error" => Ok(Severity::Error),
            "fatal" => Ok(Severity::Fatal),
            other => Err(format!("unknown log level: {}", other)),
        }
    }
}

/// Captured log lines, shared with a memory-backed logger
#[derive(Debug, Clone, Default)]
pub struct LogBuffer {
    lines: Arc<Mutex<Vec<String>>>,
}

impl LogBuffer {
    /// All captured lines, without trailing newlines
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }

    /// Captured lines parsed back into JSON
    pub fn events(&self) -> Vec<serde_json::Value> {
        self.lines()
            .iter()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect()
    }

    fn push(&self, line: String) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line);
        }
    }
}

#[derive(Debug, Clone)]
enum Sink {
    /// stdout below ERROR, stderr at ERROR and above
    Console,
    Memory(LogBuffer),
}

/// A structured logger that outputs JSON lines
#[derive(Debug, Clone)]
pub struct Logger {
    threshold: Option<Severity>,
    sink: Sink,
}

impl Default for Logger {
    fn default() -> Self {
        Self::console(Some(Severity::Warn))
    }
}

impl Logger {
    /// Log to the console. `None` disables logging entirely.
    pub fn console(threshold: Option<Severity>) -> Self {
        Self {
            threshold,
            sink: Sink::Console,
        }
    }

    /// Log into memory; returns the buffer the lines land in
    pub fn memory(threshold: Option<Severity>) -> (Self, LogBuffer) {
        let buffer = LogBuffer::default();
        let logger = Self {
            threshold,
            sink: Sink::Memory(buffer.clone()),
        };
        (logger, buffer)
    }

    /// A logger that drops everything
    pub fn disabled() -> Self {
        Self::console(None)
    }

    /// Returns whether events at `severity` are emitted
    pub fn enabled(&self, severity: Severity) -> bool {
        matches!(self.threshold, Some(min) if severity >= min)
    }

    /// Log an event with the given severity and fields
    pub fn log(&self, severity: Severity, event: &str, fields: &[(&str, &str)]) {
        if !self.enabled(severity) {
            return;
        }

        let line = Self::render(severity, event, fields);
        match &self.sink {
            Sink::Memory(buffer) => buffer.push(line),
            Sink::Console if severity >= Severity::Error => {
                Self::write_line(&mut io::stderr(), &line)
            }
            Sink::Console => Self::write_line(&mut io::stdout(), &line),
        }
    }

    fn write_line<W: Write>(writer: &mut W, line: &str) {
        // One write per line; a failing console never fails the store.
        let _ = writer.write_all(format!("{}\n", line).as_bytes());
        let _ = writer.flush();
    }

    /// Render one JSON line (no trailing newline)
    fn render(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
        let mut output = String::with_capacity(128);

        output.push_str("{\"event\":");
        output.push_str(&quote(event));
        output.push_str(",\"severity\":");
        output.push_str(&quote(severity.as_str()));

        let mut sorted: Vec<_> = fields.iter().collect();
        sorted.sort_by_key(|(k, _)| *k);

        for (key, value) in sorted {
            output.push(',');
            output.push_str(&quote(key));
            output.push(':');
            output.push_str(&quote(value));
        }

        output.push('}');
        output
    }
}

fn quote(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Trace < Severity::Info);
        assert!(Severity::Info < Severity::Warn);
        assert!(Severity::Warn < Severity::Error);
        assert!(Severity::Error < Severity::Fatal);
    }

    #[test]
    fn test_severity_parse() {
        assert_eq!("TRACE".parse::<Severity>(), Ok(Severity::Trace));
        assert_eq!("warning".parse::<Severity>(), Ok(Severity::Warn));
        assert!("loud".parse::<Severity>().is_err());
    }

    #[test]
    fn test_log_json_format() {
        let (logger, buffer) = Logger::memory(Some(Severity::Trace));
        logger.log(Severity::Info, "TEST_EVENT", &[]);

        let events = buffer.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0]["event"], "TEST_EVENT");
        assert_eq!(events[0]["severity"], "INFO");
    }

    #[test]
    fn test_log_deterministic_ordering() {
        let a = Logger::render(Severity::Info, "T", &[("zebra", "1"), ("apple", "2")]);
        let b = Logger::render(Severity::Info, "T", &[("apple", "2"), ("zebra", "1")]);
        assert_eq!(a, b);
        assert!(a.find("apple").unwrap() < a.find("zebra").unwrap());
        assert!(a.find("\"event\"").unwrap() < a.find("\"severity\"").unwrap());
    }

    #[test]
    fn test_log_escapes_special_chars() {
        let line = Logger::render(Severity::Info, "T", &[("message", "hello \"world\"\nline2")]);
        assert!(!line.contains('\n'));

        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["message"], "hello \"world\"\nline2");
    }

    #[test]
    fn test_threshold_filters() {
        let (logger, buffer) = Logger::memory(Some(Severity::Warn));
        logger.log(Severity::Trace, "QUIET", &[]);
        logger.log(Severity::Info, "QUIET", &[]);
        logger.log(Severity::Warn, "LOUD", &[]);
        logger.log(Severity::Error, "LOUDER", &[]);

        let lines = buffer.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| !l.contains("QUIET")));
    }

    #[test]
    fn test_disabled_logger_emits_nothing() {
        let logger = Logger::disabled();
        assert!(!logger.enabled(Severity::Fatal));
        logger.log(Severity::Error, "NOTHING", &[]);
    }
}
