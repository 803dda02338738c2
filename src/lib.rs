//! # Rust Section Logger
//!
//! A sectioned logging core: named sections get a severity threshold from an
//! ordered table of glob rules, and log calls are gated, formatted and handed
//! to pluggable async loggers.
//!
//! ## Features
//!
//! - **Glob rules**: `db.*=debug`, first match wins, reloadable at runtime
//! - **Interned sections**: one shared state per name, levels recomputed on reload
//! - **Composable loggers**: broadcast to many, or dispatch per record
//! - **Templates**: `{level} {section} {loc-file}:{loc-line} {message}`
//!
//! ```
//! use rust_section_logger::prelude::*;
//! use rust_section_logger::sinks::MemorySink;
//!
//! # tokio_test::block_on(async {
//! let memory = MemorySink::new();
//! let engine = Engine::builder()
//!     .rules_text("db.*=debug\n*=warning")
//!     .logger(memory.logger())
//!     .build();
//!
//! let db = engine.section("db.pool");
//! let web = engine.section("web");
//!
//! engine.entry(Severity::Debug, "pool resized").section(&db).send().await?;
//! engine.entry(Severity::Info, "request").section(&web).send().await?;
//!
//! assert_eq!(memory.len(), 1);
//! # Ok::<(), LoggerError>(())
//! # }).unwrap();
//! ```

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        broadcast, dispatch, make_logger, Engine, EngineBuilder, ErrorPayload, Location,
        LogRecord, Logger, LoggerError, Result, Section, Severity, Sink, Template,
    };
    pub use crate::sinks::MemorySink;
}

pub use crate::core::{
    broadcast, compose_text, dispatch, make_logger, parse_rule_source, render,
    silent_diagnostics, split_lines, stderr_diagnostics, Broadcast, CloseCompletion,
    DiagnosticCallback, Dispatch, Engine, EngineBuilder, ErrorPayload, FnSink, Location, LogCall,
    LogRecord, Logger, LoggerError, NullSink, Pattern, PipelineMetrics, ReloadReport,
    RenderContext, Result, Rule, RuleEntry, RuleTable, Section, SectionRegistry, Selector,
    Severity, Sink, Template, TimestampFormat,
};
