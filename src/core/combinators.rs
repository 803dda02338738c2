//! Logger combinators
//!
//! - [`Broadcast`] fans every record out to all member loggers concurrently.
//! - [`Dispatch`] picks one target logger per record through a selector.
//!
//! Neither owns its members: closing a composite leaves the members open, and
//! members must be closed by whoever created them.

use super::{
    error::{LoggerError, Result},
    logger::{Logger, Sink},
    record::LogRecord,
    section::Section,
    severity::Severity,
};
use async_trait::async_trait;
use futures::future::join_all;
use std::sync::Arc;

/// Sink forwarding each record to every member
///
/// All member outputs are started before any of them is awaited, and every
/// member is invoked even when others fail. The composite fails if at least
/// one member failed; completions of different members may interleave.
pub struct Broadcast {
    members: Vec<Logger>,
}

impl Broadcast {
    pub fn new(members: impl IntoIterator<Item = Logger>) -> Self {
        Self {
            members: members.into_iter().collect(),
        }
    }

    pub fn members(&self) -> &[Logger] {
        &self.members
    }
}

#[async_trait]
impl Sink for Broadcast {
    async fn output(&self, record: &LogRecord) -> Result<()> {
        let results = join_all(self.members.iter().map(|member| member.output(record))).await;

        let failures: Vec<LoggerError> = results.into_iter().filter_map(Result::err).collect();
        if failures.is_empty() {
            Ok(())
        } else {
            Err(LoggerError::BroadcastFailed {
                failures,
                total: self.members.len(),
            })
        }
    }

    fn name(&self) -> &str {
        "broadcast"
    }
}

/// Routing strategy for [`Dispatch`]
pub type Selector = Arc<dyn Fn(&Section, Severity) -> Logger + Send + Sync>;

/// Sink forwarding each record to the logger chosen by a selector
pub struct Dispatch {
    selector: Selector,
}

impl Dispatch {
    pub fn new(selector: Selector) -> Self {
        Self { selector }
    }

    /// Route records at or above `threshold` to `high`, the rest to `low`
    pub fn by_severity(threshold: Severity, high: Logger, low: Logger) -> Self {
        Self::new(Arc::new(move |_section: &Section, severity: Severity| {
            if severity >= threshold {
                high.clone()
            } else {
                low.clone()
            }
        }))
    }

    /// The logger a record for (`section`, `severity`) would be sent to
    pub fn select(&self, section: &Section, severity: Severity) -> Logger {
        (self.selector)(section, severity)
    }
}

#[async_trait]
impl Sink for Dispatch {
    async fn output(&self, record: &LogRecord) -> Result<()> {
        let target = self.select(&record.section, record.severity);
        target.output(record).await
    }

    fn name(&self) -> &str {
        "dispatch"
    }
}

/// Logger that writes every record to all `loggers`
pub fn broadcast(loggers: impl IntoIterator<Item = Logger>) -> Logger {
    Logger::new(Broadcast::new(loggers))
}

/// Logger that writes every record to `selector(section, severity)`
pub fn dispatch<F>(selector: F) -> Logger
where
    F: Fn(&Section, Severity) -> Logger + Send + Sync + 'static,
{
    Logger::new(Dispatch::new(Arc::new(selector)))
}
