//! Log-call pipeline: gate, format, forward
//!
//! A [`LogCall`] is built by [`Engine::entry`] and consumed by
//! [`LogCall::send`] (strict), [`LogCall::send_ignore_errors`] or
//! [`LogCall::send_detached`]. The gate and the formatting run synchronously;
//! the only suspension point is the logger's output.

use super::{
    engine::Engine,
    error::{LoggerError, Result},
    logger::Logger,
    record::{ErrorPayload, Location, LogRecord},
    section::Section,
    severity::Severity,
};
use futures::future::{BoxFuture, FutureExt};

/// Split text at every `\n`, keeping empty segments.
///
/// `k` newlines always give `k + 1` lines:
///
/// ```
/// use rust_section_logger::split_lines;
///
/// assert_eq!(split_lines("a\nb\n"), ["a", "b", ""]);
/// assert_eq!(split_lines(""), [""]);
/// ```
pub fn split_lines(text: &str) -> Vec<String> {
    text.split('\n').map(String::from).collect()
}

/// Message text with the error payload and, optionally, its backtrace appended
pub fn compose_text(message: &str, error: Option<&ErrorPayload>, with_backtrace: bool) -> String {
    let Some(error) = error else {
        return message.to_string();
    };

    let mut text = format!("{}: {}", message, error);
    if with_backtrace {
        if let Some(backtrace) = error.backtrace() {
            text.push_str("\nBacktrace:\n");
            text.push_str(backtrace.trim_end_matches('\n'));
        }
    }
    text
}

/// A pending log call
///
/// Section and logger default to the engine's current defaults when not set.
#[must_use = "a log call does nothing until it is sent"]
pub struct LogCall<'a> {
    engine: &'a Engine,
    severity: Severity,
    message: String,
    section: Option<Section>,
    logger: Option<Logger>,
    error: Option<ErrorPayload>,
    location: Option<Location>,
}

impl<'a> LogCall<'a> {
    pub(crate) fn new(engine: &'a Engine, severity: Severity, message: String) -> Self {
        Self {
            engine,
            severity,
            message,
            section: None,
            logger: None,
            error: None,
            location: None,
        }
    }

    pub fn section(mut self, section: &Section) -> Self {
        self.section = Some(section.clone());
        self
    }

    pub fn logger(mut self, logger: &Logger) -> Self {
        self.logger = Some(logger.clone());
        self
    }

    pub fn error(mut self, error: ErrorPayload) -> Self {
        self.error = Some(error);
        self
    }

    /// Attach `err` captured as an [`ErrorPayload`]
    pub fn error_from<E: std::error::Error + ?Sized>(self, err: &E) -> Self {
        self.error(ErrorPayload::capture(err))
    }

    /// Call-site location, visible to the sink for this call only
    pub fn location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Closed check, severity gate and formatting; runs without suspending.
    fn gate(self) -> Gate {
        let engine = self.engine;
        let logger = self.logger.unwrap_or_else(|| engine.default_logger());
        let section = self.section.unwrap_or_else(|| engine.default_section());
        let metrics = engine.metrics();

        if logger.is_closed() {
            metrics.record_closed_rejected();
            return Gate::Closed(LoggerError::closed(logger.name()));
        }

        if self.severity < section.level() {
            metrics.record_filtered();
            return Gate::Filtered;
        }

        let text = compose_text(
            &self.message,
            self.error.as_ref(),
            engine.captures_backtraces(),
        );
        let record = LogRecord::new(section, self.severity, split_lines(&text))
            .with_location(self.location)
            .with_error(self.error);

        metrics.record_accepted();
        Gate::Accepted(logger, record)
    }

    /// Gate the call and forward it to the logger.
    ///
    /// # Errors
    ///
    /// `Closed` if the target logger is closed; otherwise the logger's own
    /// failure, unchanged. A call below the section level succeeds without
    /// reaching the logger.
    pub async fn send(self) -> Result<()> {
        let engine = self.engine;
        let metrics = engine.metrics();
        match self.gate() {
            Gate::Closed(err) => Err(err),
            Gate::Filtered => Ok(()),
            Gate::Accepted(logger, record) => {
                let result = logger.output(&record).await;
                if result.is_err() {
                    metrics.record_sink_failure();
                }
                result
            }
        }
    }

    /// Like [`send`](Self::send), but every failure is swallowed.
    ///
    /// For call sites that must never fail because of logging. A closed
    /// logger makes this a silent no-op. The returned future still waits for
    /// the sink; use [`send_detached`](Self::send_detached) to return at once.
    pub async fn send_ignore_errors(self) {
        let engine = self.engine;
        if self.send().await.is_err() {
            engine.metrics().record_absorbed();
        }
    }

    /// Gate and format now, hand the sink output to `spawn`, and return.
    ///
    /// Never fails and never waits for the sink: a closed logger or a sink
    /// failure is absorbed. `spawn` receives a `'static` future and decides
    /// where it runs, e.g. `|task| { tokio::spawn(task); }`. Nothing is
    /// spawned for a filtered or rejected call.
    pub fn send_detached<S>(self, spawn: S)
    where
        S: FnOnce(BoxFuture<'static, ()>),
    {
        let metrics = self.engine.shared_metrics();
        match self.gate() {
            Gate::Closed(_) => {
                metrics.record_absorbed();
            }
            Gate::Filtered => {}
            Gate::Accepted(logger, record) => spawn(
                async move {
                    if logger.output(&record).await.is_err() {
                        metrics.record_sink_failure();
                        metrics.record_absorbed();
                    }
                }
                .boxed(),
            ),
        }
    }
}

enum Gate {
    Closed(LoggerError),
    Filtered,
    Accepted(Logger, LogRecord),
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::core::engine::Engine;
    use crate::core::logger::make_logger;
    use crate::sinks::MemorySink;

    #[test]
    fn test_detached_returns_before_output() {
        let memory = MemorySink::new();
        let engine = Engine::builder().logger(memory.logger()).build();
        let mut spawned = Vec::new();

        engine
            .entry(Severity::Error, "later")
            .send_detached(|task| spawned.push(task));
        engine
            .entry(Severity::Debug, "filtered")
            .send_detached(|task| spawned.push(task));

        assert_eq!(spawned.len(), 1);
        assert!(memory.is_empty());
        assert_eq!(engine.metrics().accepted(), 1);
        assert_eq!(engine.metrics().filtered(), 1);

        for task in spawned {
            tokio_test::block_on(task);
        }
        assert_eq!(memory.records()[0].lines, ["later"]);
    }

    #[test]
    fn test_detached_absorbs_failures() {
        let failing = make_logger(
            |_record| async { Err(LoggerError::sink("fn", "down")) },
            || async { Ok(()) },
        );
        let engine = Engine::builder().logger(failing.clone()).build();

        engine
            .entry(Severity::Fatal, "lost")
            .send_detached(|task| tokio_test::block_on(task));
        assert_eq!(engine.metrics().sink_failures(), 1);
        assert_eq!(engine.metrics().absorbed(), 1);

        let _ = failing.close();
        engine
            .entry(Severity::Fatal, "closed")
            .send_detached(|_task| panic!("nothing to spawn for a closed logger"));
        assert_eq!(engine.metrics().absorbed(), 2);
    }

    #[test]
    fn test_split_lines() {
        assert_eq!(split_lines("a\nb\n"), vec!["a", "b", ""]);
        assert_eq!(split_lines(""), vec![""]);
        assert_eq!(split_lines("noNewline"), vec!["noNewline"]);
        assert_eq!(split_lines("\n\n"), vec!["", "", ""]);
    }

    #[test]
    fn test_compose_without_error() {
        assert_eq!(compose_text("plain", None, true), "plain");
    }

    #[test]
    fn test_compose_with_error() {
        let err = ErrorPayload::new("IoError", "disk full");
        assert_eq!(compose_text("write failed", Some(&err), false), "write failed: IoError: disk full");
    }

    #[test]
    fn test_compose_backtrace_only_when_enabled() {
        let err = ErrorPayload::new("Panic", "boom").with_backtrace("0: main\n1: start\n");

        assert_eq!(compose_text("crash", Some(&err), false), "crash: Panic: boom");
        assert_eq!(
            compose_text("crash", Some(&err), true),
            "crash: Panic: boom\nBacktrace:\n0: main\n1: start"
        );
    }
}
