//! Console sink implementation

use crate::core::{LogRecord, Result, Severity, Sink, Template, TimestampFormat};
use async_trait::async_trait;
use colored::Colorize;

pub struct ConsoleSink {
    use_colors: bool,
    template: Template,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self {
            use_colors: true,
            template: Template::default(),
        }
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            use_colors,
            template: Template::default(),
        }
    }

    /// Set the line template for this sink
    ///
    /// # Example
    ///
    /// ```
    /// use rust_section_logger::sinks::ConsoleSink;
    /// use rust_section_logger::Template;
    ///
    /// let sink = ConsoleSink::new()
    ///     .with_template(Template::parse("{level} {section} {message}").unwrap());
    /// ```
    #[must_use]
    pub fn with_template(mut self, template: Template) -> Self {
        self.template = template;
        self
    }

    /// Set the format of the `{time}` placeholder
    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.template = self.template.with_timestamp_format(format);
        self
    }

    fn paint(&self, line: String, severity: Severity) -> String {
        if self.use_colors {
            line.color(severity.color_code()).to_string()
        } else {
            line
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Sink for ConsoleSink {
    async fn output(&self, record: &LogRecord) -> Result<()> {
        for line in self.template.render_record(record) {
            let line = self.paint(line, record.severity);
            // Error and Fatal go to stderr, the rest to stdout
            match record.severity {
                Severity::Error | Severity::Fatal => eprintln!("{}", line),
                _ => println!("{}", line),
            }
        }
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        use std::io::Write;
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
