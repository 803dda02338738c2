//! Line templates for text-based sinks
//!
//! Placeholders are written `{name}`; `{{` and `}}` produce literal braces.
//!
//! | Placeholder    | Value                                      |
//! |----------------|--------------------------------------------|
//! | `message`      | one line of the message                    |
//! | `level`        | severity name (`WARNING`)                  |
//! | `section`      | section name                               |
//! | `loc-file`     | call-site file, `<unknown>` if absent      |
//! | `loc-line`     | call-site line, `-1` if absent             |
//! | `loc-column`   | call-site column, `-1` if absent           |
//! | `time`         | record timestamp                           |
//!
//! Any other name is an authoring bug and fails with `InvalidTemplate`.
//!
//! ```
//! use rust_section_logger::{render, Engine, Location, Severity};
//!
//! let engine = Engine::new();
//! let section = engine.section("db");
//! let location = Location::new("src/db.rs", 42, 9);
//!
//! let line = render(
//!     "{level} {section} {loc-file}:{loc-line} {message}",
//!     &section,
//!     Severity::Error,
//!     "timeout",
//!     Some(&location),
//! )
//! .unwrap();
//! assert_eq!(line, "ERROR db src/db.rs:42 timeout");
//!
//! assert!(render("{colour}", &section, Severity::Info, "x", None).is_err());
//! ```

use super::{
    error::{LoggerError, Result},
    record::{Location, LogRecord},
    section::Section,
    severity::Severity,
    timestamp::TimestampFormat,
};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Message,
    Level,
    Section,
    LocFile,
    LocLine,
    LocColumn,
    Time,
}

impl Field {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "message" => Some(Field::Message),
            "level" => Some(Field::Level),
            "section" => Some(Field::Section),
            "loc-file" => Some(Field::LocFile),
            "loc-line" => Some(Field::LocLine),
            "loc-column" => Some(Field::LocColumn),
            "time" => Some(Field::Time),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(Field),
}

/// Values a template is rendered against
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub section: &'a Section,
    pub severity: Severity,
    pub message: &'a str,
    pub location: Option<&'a Location>,
    pub timestamp: &'a DateTime<Utc>,
}

/// A validated template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
    timestamp_format: TimestampFormat,
}

impl Template {
    /// Template used by sinks when none is configured
    pub const DEFAULT: &'static str = "[{time}] [{level}] {section}: {message}";

    /// Parse and validate a template.
    ///
    /// # Errors
    ///
    /// `InvalidTemplate` for an unknown placeholder or an unclosed `{`.
    pub fn parse(source: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for c in chars.by_ref() {
                        if c == '}' {
                            closed = true;
                            break;
                        }
                        name.push(c);
                    }

                    if !closed {
                        return Err(LoggerError::template(source, "unclosed '{'"));
                    }
                    let field = Field::from_name(&name).ok_or_else(|| {
                        LoggerError::template(source, format!("unknown placeholder '{}'", name))
                    })?;

                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Field(field));
                }
                '}' => {
                    if chars.peek() == Some(&'}') {
                        chars.next();
                    }
                    literal.push('}');
                }
                _ => literal.push(c),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
            timestamp_format: TimestampFormat::default(),
        })
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn render(&self, ctx: &RenderContext<'_>) -> String {
        let mut out = String::with_capacity(self.source.len() + ctx.message.len());

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(field) => match field {
                    Field::Message => out.push_str(ctx.message),
                    Field::Level => out.push_str(ctx.severity.to_str()),
                    Field::Section => out.push_str(ctx.section.name()),
                    Field::LocFile => match ctx.location {
                        Some(loc) => out.push_str(&loc.file),
                        None => out.push_str("<unknown>"),
                    },
                    Field::LocLine => match ctx.location {
                        Some(loc) => out.push_str(&loc.line.to_string()),
                        None => out.push_str("-1"),
                    },
                    Field::LocColumn => match ctx.location {
                        Some(loc) => out.push_str(&loc.column.to_string()),
                        None => out.push_str("-1"),
                    },
                    Field::Time => out.push_str(&self.timestamp_format.format(ctx.timestamp)),
                },
            }
        }

        out
    }

    /// One rendered string per line of the record
    pub fn render_record(&self, record: &LogRecord) -> Vec<String> {
        record
            .lines
            .iter()
            .map(|line| {
                self.render(&RenderContext {
                    section: &record.section,
                    severity: record.severity,
                    message: line,
                    location: record.location.as_ref(),
                    timestamp: &record.timestamp,
                })
            })
            .collect()
    }
}

impl Default for Template {
    fn default() -> Self {
        Self {
            source: Self::DEFAULT.to_string(),
            segments: vec![
                Segment::Literal("[".to_string()),
                Segment::Field(Field::Time),
                Segment::Literal("] [".to_string()),
                Segment::Field(Field::Level),
                Segment::Literal("] ".to_string()),
                Segment::Field(Field::Section),
                Segment::Literal(": ".to_string()),
                Segment::Field(Field::Message),
            ],
            timestamp_format: TimestampFormat::default(),
        }
    }
}

/// Parse `template` and render it once, stamped with the current time.
///
/// # Errors
///
/// `InvalidTemplate` if the template does not parse.
pub fn render(
    template: &str,
    section: &Section,
    severity: Severity,
    message: &str,
    location: Option<&Location>,
) -> Result<String> {
    let template = Template::parse(template)?;
    Ok(template.render(&RenderContext {
        section,
        severity,
        message,
        location,
        timestamp: &Utc::now(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::section::SectionRegistry;

    fn section(name: &str) -> Section {
        SectionRegistry::new().intern(name, |_| Severity::Debug)
    }

    #[test]
    fn test_default_matches_parsed_default() {
        assert_eq!(Template::parse(Template::DEFAULT).unwrap(), Template::default());
    }

    #[test]
    fn test_all_placeholders() {
        let s = section("net");
        let loc = Location::new("src/net.rs", 7, 3);
        let line = render(
            "{section}|{level}|{message}|{loc-file}|{loc-line}|{loc-column}",
            &s,
            Severity::Warning,
            "retrying",
            Some(&loc),
        )
        .unwrap();
        assert_eq!(line, "net|WARNING|retrying|src/net.rs|7|3");
    }

    #[test]
    fn test_missing_location_defaults() {
        let s = section("net");
        let line = render("{loc-file}:{loc-line}:{loc-column}", &s, Severity::Info, "", None).unwrap();
        assert_eq!(line, "<unknown>:-1:-1");
    }

    #[test]
    fn test_escaped_braces() {
        let s = section("x");
        let line = render("{{{message}}}", &s, Severity::Info, "m", None).unwrap();
        assert_eq!(line, "{m}");
    }

    #[test]
    fn test_unknown_placeholder() {
        let err = Template::parse("{message} {thread}").unwrap_err();
        assert!(matches!(err, LoggerError::InvalidTemplate { .. }));
        assert!(err.to_string().contains("unknown placeholder 'thread'"));
    }

    #[test]
    fn test_unclosed_placeholder() {
        let err = Template::parse("{message").unwrap_err();
        assert!(err.to_string().contains("unclosed"));
    }

    #[test]
    fn test_time_uses_format() {
        use chrono::TimeZone;

        let template = Template::parse("{time}")
            .unwrap()
            .with_timestamp_format(TimestampFormat::EpochMillis);
        let s = section("t");
        let ts = Utc.timestamp_millis_opt(1_000).single().unwrap();
        let out = template.render(&RenderContext {
            section: &s,
            severity: Severity::Info,
            message: "",
            location: None,
            timestamp: &ts,
        });
        assert_eq!(out, "1000");
    }

    #[test]
    fn test_render_record_per_line() {
        let s = section("multi");
        let record = LogRecord::new(s, Severity::Notice, vec!["a".into(), "".into()]);
        let template = Template::parse("{level} {message}").unwrap();
        assert_eq!(template.render_record(&record), vec!["NOTICE a", "NOTICE "]);
    }
}
