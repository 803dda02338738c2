//! Error types for the logging core

use std::sync::Arc;

pub type Result<T> = std::result::Result<T, LoggerError>;

/// Errors raised by sink-facing operations and the parsing/rendering boundary.
///
/// Pattern matching, rule resolution and section lookup never fail, so none of
/// these variants originate there. The type is `Clone` because a memoized
/// close completion is handed to every caller of `close`.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LoggerError {
    /// Output attempted on a closed logger
    #[error("Logger '{logger}' is closed")]
    Closed { logger: String },

    /// Unrecognized placeholder or broken template syntax
    #[error("Invalid template '{template}': {message}")]
    InvalidTemplate { template: String, message: String },

    /// The rule-set source text failed the outer grammar
    #[error("Malformed rule document: {message}")]
    MalformedRuleDocument { message: String },

    /// A single rule entry named a level that does not exist
    #[error("Unknown level name '{level}' for pattern '{pattern}'")]
    UnknownLevelName { pattern: String, level: String },

    /// Failure reported by a sink's output or close
    #[error("Sink '{sink}' failed: {message}")]
    SinkFailure { sink: String, message: String },

    /// At least one broadcast member failed
    #[error("{} of {total} broadcast members failed", .failures.len())]
    BroadcastFailed {
        failures: Vec<LoggerError>,
        total: usize,
    },

    /// IO error with context
    #[error("IO error while {operation}: {source}")]
    IoOperation {
        operation: String,
        #[source]
        source: Arc<std::io::Error>,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[source] Arc<std::io::Error>),
}

impl From<std::io::Error> for LoggerError {
    fn from(err: std::io::Error) -> Self {
        LoggerError::Io(Arc::new(err))
    }
}

impl LoggerError {
    /// Create a closed-logger error
    pub fn closed(logger: impl Into<String>) -> Self {
        LoggerError::Closed {
            logger: logger.into(),
        }
    }

    /// Create an invalid template error
    pub fn template(template: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidTemplate {
            template: template.into(),
            message: message.into(),
        }
    }

    /// Create a malformed rule document error
    pub fn malformed(message: impl Into<String>) -> Self {
        LoggerError::MalformedRuleDocument {
            message: message.into(),
        }
    }

    /// Create an unknown level name error
    pub fn unknown_level(pattern: impl Into<String>, level: impl Into<String>) -> Self {
        LoggerError::UnknownLevelName {
            pattern: pattern.into(),
            level: level.into(),
        }
    }

    /// Create a sink failure
    pub fn sink(sink: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::SinkFailure {
            sink: sink.into(),
            message: message.into(),
        }
    }

    /// Create an IO operation error with context
    pub fn io_operation(operation: impl Into<String>, source: std::io::Error) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            source: Arc::new(source),
        }
    }

    /// Whether this is the `Closed` condition
    pub fn is_closed(&self) -> bool {
        matches!(self, LoggerError::Closed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LoggerError::closed("console");
        assert!(err.is_closed());

        let err = LoggerError::unknown_level("net.*", "loud");
        assert!(matches!(err, LoggerError::UnknownLevelName { .. }));

        let err = LoggerError::sink("file", "disk full");
        assert!(matches!(err, LoggerError::SinkFailure { .. }));
        assert!(!err.is_closed());
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::template("{oops}", "unknown placeholder 'oops'");
        assert_eq!(
            err.to_string(),
            "Invalid template '{oops}': unknown placeholder 'oops'"
        );

        let err = LoggerError::BroadcastFailed {
            failures: vec![LoggerError::sink("a", "x"), LoggerError::closed("b")],
            total: 3,
        };
        assert_eq!(err.to_string(), "2 of 3 broadcast members failed");

        let err = LoggerError::malformed("entry 2 has no '='");
        assert_eq!(err.to_string(), "Malformed rule document: entry 2 has no '='");
    }

    #[test]
    fn test_io_operation_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = LoggerError::io_operation("opening log file", io_err);

        assert!(err.to_string().contains("opening log file"));
        assert!(err.to_string().contains("access denied"));

        // Clones share the underlying io::Error
        let copy = err.clone();
        assert_eq!(copy.to_string(), err.to_string());
    }
}
