//! Logger capability: a closable handle around an async sink
//!
//! A [`Sink`] is whatever actually writes records (console, file, network, or
//! a combinator forwarding to other loggers). A [`Logger`] wraps a sink and
//! adds the parts every sink shares: the closed flag and the close-once guard.
//!
//! ```
//! use rust_section_logger::{make_logger, Engine, Severity};
//!
//! # tokio_test::block_on(async {
//! let engine = Engine::new();
//! let logger = make_logger(
//!     |record| async move {
//!         println!("{}: {}", record.severity, record.text());
//!         Ok(())
//!     },
//!     || async { Ok(()) },
//! );
//!
//! engine.entry(Severity::Error, "disk almost full").logger(&logger).send().await?;
//! logger.close().await?;
//! assert!(logger.is_closed());
//! # Ok::<(), rust_section_logger::LoggerError>(())
//! # }).unwrap();
//! ```

use super::{
    error::{LoggerError, Result},
    record::LogRecord,
};
use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Output destination for accepted records
///
/// Implementations may perform asynchronous I/O. `close` is called at most
/// once per [`Logger`] wrapping the sink.
#[async_trait]
pub trait Sink: Send + Sync {
    /// Write one record
    async fn output(&self, record: &LogRecord) -> Result<()>;

    /// Release resources held by the sink
    async fn close(&self) -> Result<()> {
        Ok(())
    }

    /// Get the sink name
    fn name(&self) -> &str;
}

/// Completion of a close call, shared by every caller
pub type CloseCompletion = Shared<BoxFuture<'static, Result<()>>>;

struct LoggerInner {
    sink: Arc<dyn Sink>,
    closed: AtomicBool,
    close_completion: Mutex<Option<CloseCompletion>>,
}

/// Clonable, closable handle to a sink
///
/// Clones share the closed flag: closing one closes all of them.
#[derive(Clone)]
pub struct Logger {
    inner: Arc<LoggerInner>,
}

impl Logger {
    pub fn new<S: Sink + 'static>(sink: S) -> Self {
        Self::from_arc(Arc::new(sink))
    }

    pub fn from_arc(sink: Arc<dyn Sink>) -> Self {
        Self {
            inner: Arc::new(LoggerInner {
                sink,
                closed: AtomicBool::new(false),
                close_completion: Mutex::new(None),
            }),
        }
    }

    /// Logger that accepts and discards everything
    pub fn null() -> Self {
        Self::new(NullSink)
    }

    pub fn name(&self) -> &str {
        self.inner.sink.name()
    }

    /// Once true, stays true
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }

    /// Forward a record to the sink.
    ///
    /// # Errors
    ///
    /// `Closed` if the logger has been closed, otherwise whatever the sink
    /// reports.
    pub async fn output(&self, record: &LogRecord) -> Result<()> {
        if self.is_closed() {
            return Err(LoggerError::closed(self.name()));
        }
        self.inner.sink.output(record).await
    }

    /// Close the logger.
    ///
    /// The first call marks the logger closed and starts the sink's `close`
    /// right away, running it up to its first suspension point; later calls
    /// return the same completion. The sink is released exactly once whether
    /// or not anyone awaits the completion: a release still pending when the
    /// last handle is dropped is finished there, blocking the dropping thread.
    #[must_use = "the completion reports whether the sink released cleanly"]
    pub fn close(&self) -> CloseCompletion {
        let mut slot = self.inner.close_completion.lock();
        if let Some(completion) = slot.as_ref() {
            return completion.clone();
        }

        self.inner.closed.store(true, Ordering::Release);
        let sink = Arc::clone(&self.inner.sink);
        let completion = async move { sink.close().await }.boxed().shared();
        *slot = Some(completion.clone());
        drop(slot);

        // Shared keeps the progress, so a later poll resumes where this stops
        let _ = completion.clone().now_or_never();
        completion
    }

    /// Whether two handles share the same logger state
    pub fn ptr_eq(&self, other: &Logger) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Drop for LoggerInner {
    fn drop(&mut self) {
        if let Some(completion) = self.close_completion.get_mut().take() {
            if completion.peek().is_none() {
                let _ = futures::executor::block_on(completion);
            }
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("sink", &self.name())
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::null()
    }
}

/// Sink that accepts and discards every record
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

#[async_trait]
impl Sink for NullSink {
    async fn output(&self, _record: &LogRecord) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "null"
    }
}

/// Sink backed by a pair of closures
pub struct FnSink<O, C> {
    name: String,
    output: O,
    close: C,
}

impl<O, C> FnSink<O, C> {
    pub fn new(output: O, close: C) -> Self {
        Self {
            name: "fn".to_string(),
            output,
            close,
        }
    }

    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

#[async_trait]
impl<O, OF, C, CF> Sink for FnSink<O, C>
where
    O: Fn(LogRecord) -> OF + Send + Sync,
    OF: Future<Output = Result<()>> + Send + 'static,
    C: Fn() -> CF + Send + Sync,
    CF: Future<Output = Result<()>> + Send + 'static,
{
    async fn output(&self, record: &LogRecord) -> Result<()> {
        (self.output)(record.clone()).await
    }

    async fn close(&self) -> Result<()> {
        (self.close)().await
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Build a logger from an output function and a close function
pub fn make_logger<O, OF, C, CF>(output: O, close: C) -> Logger
where
    O: Fn(LogRecord) -> OF + Send + Sync + 'static,
    OF: Future<Output = Result<()>> + Send + 'static,
    C: Fn() -> CF + Send + Sync + 'static,
    CF: Future<Output = Result<()>> + Send + 'static,
{
    Logger::new(FnSink::new(output, close))
}
