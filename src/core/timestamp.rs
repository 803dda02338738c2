//! Rendering of record timestamps for the `{time}` template placeholder

use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt::Write;

/// How `{time}` renders a record timestamp
///
/// ```
/// use rust_section_logger::TimestampFormat;
/// use chrono::Utc;
///
/// let rendered = TimestampFormat::default().format(&Utc::now());
/// assert!(rendered.ends_with('Z'));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimestampFormat {
    /// RFC 3339 in UTC with a `Z` suffix, at the given sub-second precision
    Rfc3339(SecondsFormat),

    /// Milliseconds since the Unix epoch
    EpochMillis,

    /// strftime-style pattern; an invalid pattern falls back to the default
    Strftime(String),
}

impl TimestampFormat {
    /// `Rfc3339` with millisecond precision
    pub const DEFAULT: TimestampFormat = TimestampFormat::Rfc3339(SecondsFormat::Millis);

    pub fn format(&self, timestamp: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::Rfc3339(precision) => timestamp.to_rfc3339_opts(*precision, true),
            TimestampFormat::EpochMillis => timestamp.timestamp_millis().to_string(),
            TimestampFormat::Strftime(pattern) => {
                let mut out = String::new();
                match write!(out, "{}", timestamp.format(pattern)) {
                    Ok(()) => out,
                    Err(_) => Self::DEFAULT.format(timestamp),
                }
            }
        }
    }
}

impl Default for TimestampFormat {
    fn default() -> Self {
        Self::DEFAULT
    }
}
