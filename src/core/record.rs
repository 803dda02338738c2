//! Log record structure

use super::{section::Section, severity::Severity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error;
use std::fmt;

/// Source position of a log call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl Location {
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Structured error attached to a log call
///
/// Rendered as `kind: message` when a kind is present, otherwise as the bare
/// message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    kind: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    backtrace: Option<String>,
}

impl ErrorPayload {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            backtrace: None,
        }
    }

    /// Build a payload from an error value.
    ///
    /// The message includes the `source()` chain. A backtrace is captured if
    /// the process enables them (`RUST_BACKTRACE` / `RUST_LIB_BACKTRACE`).
    pub fn capture<E: Error + ?Sized>(err: &E) -> Self {
        let kind = short_type_name(std::any::type_name::<E>()).to_string();

        let mut message = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }

        let backtrace = Backtrace::capture();
        let backtrace = match backtrace.status() {
            BacktraceStatus::Captured => Some(backtrace.to_string()),
            _ => None,
        };

        Self {
            kind,
            message,
            backtrace,
        }
    }

    #[must_use]
    pub fn with_backtrace(mut self, backtrace: impl Into<String>) -> Self {
        self.backtrace = Some(backtrace.into());
        self
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn backtrace(&self) -> Option<&str> {
        self.backtrace.as_deref()
    }
}

/// Last path segment of a type name, without generic arguments or
/// additional trait-object bounds: `app::Wrapper<std::io::Error>` gives
/// `Wrapper`, `dyn core::error::Error + Send` gives `Error`.
fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    let base = base.split(" + ").next().unwrap_or(base);
    base.rsplit("::").next().unwrap_or(base)
}

impl fmt::Display for ErrorPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.kind, self.message)
        }
    }
}

/// An accepted log call, as handed to a sink
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub section: Section,
    pub severity: Severity,
    pub lines: Vec<String>,
    pub location: Option<Location>,
    pub error: Option<ErrorPayload>,
    pub timestamp: DateTime<Utc>,
}

impl LogRecord {
    pub fn new(section: Section, severity: Severity, lines: Vec<String>) -> Self {
        Self {
            section,
            severity,
            lines,
            location: None,
            error: None,
            timestamp: Utc::now(),
        }
    }

    #[must_use]
    pub fn with_location(mut self, location: Option<Location>) -> Self {
        self.location = location;
        self
    }

    #[must_use]
    pub fn with_error(mut self, error: Option<ErrorPayload>) -> Self {
        self.error = error;
        self
    }

    /// The lines joined back with `\n`
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Inner;

    impl fmt::Display for Inner {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "connection reset")
        }
    }

    impl Error for Inner {}

    #[derive(Debug)]
    struct Outer(Inner);

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "request failed")
        }
    }

    impl Error for Outer {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn test_payload_display() {
        assert_eq!(ErrorPayload::new("IoError", "disk full").to_string(), "IoError: disk full");
        assert_eq!(ErrorPayload::new("", "disk full").to_string(), "disk full");
    }

    #[test]
    fn test_payload_capture_chain() {
        let payload = ErrorPayload::capture(&Outer(Inner));
        assert_eq!(payload.kind(), "Outer");
        assert_eq!(payload.message(), "request failed: connection reset");
    }

    #[derive(Debug)]
    struct Wrapper<E>(E);

    impl<E: Error> fmt::Display for Wrapper<E> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "wrapped: {}", self.0)
        }
    }

    impl<E: Error> Error for Wrapper<E> {}

    #[test]
    fn test_capture_generic_kind() {
        let payload = ErrorPayload::capture(&Wrapper(Inner));
        assert_eq!(payload.kind(), "Wrapper");
        assert_eq!(payload.message(), "wrapped: connection reset");
    }

    #[test]
    fn test_capture_trait_object_kind() {
        let boxed: Box<dyn Error + Send + Sync> = Box::new(Inner);
        let payload = ErrorPayload::capture(boxed.as_ref());
        assert_eq!(payload.kind(), "Error");
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name("app::Wrapper<std::io::Error>"), "Wrapper");
        assert_eq!(short_type_name("std::io::error::Error"), "Error");
        assert_eq!(short_type_name("Local"), "Local");
    }

    #[test]
    fn test_location_display() {
        assert_eq!(Location::new("src/main.rs", 10, 5).to_string(), "src/main.rs:10:5");
    }
}
