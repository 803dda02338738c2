//! File sink implementation

use crate::core::{LogRecord, LoggerError, Result, Sink, Template};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Appends rendered lines to a file
///
/// Writes are buffered; closing the owning logger flushes and releases the
/// file handle.
pub struct FileSink {
    path: PathBuf,
    writer: Mutex<Option<BufWriter<File>>>,
    template: Template,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| LoggerError::io_operation(format!("opening {}", path.display()), e))?;

        Ok(Self {
            path,
            writer: Mutex::new(Some(BufWriter::new(file))),
            template: Template::default(),
        })
    }

    /// Set the line template for this sink
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use rust_section_logger::sinks::FileSink;
    /// use rust_section_logger::Template;
    ///
    /// let sink = FileSink::new("/var/log/app.log")
    ///     .unwrap()
    ///     .with_template(Template::parse("{time} {level} {message}").unwrap());
    /// ```
    #[must_use]
    pub fn with_template(mut self, template: Template) -> Self {
        self.template = template;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn released(&self) -> LoggerError {
        LoggerError::sink(self.name(), format!("{} already released", self.path.display()))
    }
}

#[async_trait]
impl Sink for FileSink {
    async fn output(&self, record: &LogRecord) -> Result<()> {
        let mut output = String::new();
        for line in self.template.render_record(record) {
            output.push_str(&line);
            output.push('\n');
        }

        let mut guard = self.writer.lock();
        let writer = guard.as_mut().ok_or_else(|| self.released())?;
        writer
            .write_all(output.as_bytes())
            .map_err(|e| LoggerError::io_operation("writing log file", e))
    }

    async fn close(&self) -> Result<()> {
        let writer = self.writer.lock().take();
        match writer {
            Some(mut writer) => writer
                .flush()
                .map_err(|e| LoggerError::io_operation("flushing log file", e)),
            None => Ok(()),
        }
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        if let Some(writer) = self.writer.get_mut().as_mut() {
            let _ = writer.flush();
        }
    }
}
