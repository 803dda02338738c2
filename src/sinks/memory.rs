//! In-memory sink, mostly for tests

use crate::core::{LogRecord, Logger, Result, Sink};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

/// Collects records in memory
///
/// Cloning shares the store. Each [`logger`](Self::logger) call returns a
/// fresh logger over that store, so closing one does not close the others.
///
/// ```
/// use rust_section_logger::sinks::MemorySink;
/// use rust_section_logger::{Engine, Severity};
///
/// # tokio_test::block_on(async {
/// let engine = Engine::new();
/// let memory = MemorySink::new();
/// engine
///     .entry(Severity::Error, "first\nsecond")
///     .logger(&memory.logger())
///     .send()
///     .await
///     .unwrap();
///
/// assert_eq!(memory.records()[0].lines, ["first", "second"]);
/// # });
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<LogRecord>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// New logger writing into this store
    pub fn logger(&self) -> Logger {
        Logger::new(self.clone())
    }

    /// Snapshot of the collected records
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

#[async_trait]
impl Sink for MemorySink {
    async fn output(&self, record: &LogRecord) -> Result<()> {
        self.records.lock().push(record.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{SectionRegistry, Severity};

    #[test]
    fn test_loggers_share_store() {
        let memory = MemorySink::new();
        let (a, b) = (memory.logger(), memory.logger());
        let registry = SectionRegistry::new();
        let record = LogRecord::new(
            registry.intern("m", |_| Severity::Debug),
            Severity::Info,
            vec!["x".into()],
        );

        tokio_test::block_on(async {
            a.output(&record).await.unwrap();
            a.close().await.unwrap();
            b.output(&record).await.unwrap();
        });

        assert_eq!(memory.len(), 2);
        assert!(a.is_closed());
        assert!(!b.is_closed());

        memory.clear();
        assert!(memory.is_empty());
    }
}
