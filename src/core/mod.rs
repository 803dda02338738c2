//! Core types: patterns, rules, sections, loggers and the log-call pipeline

pub mod combinators;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod logger;
pub mod metrics;
pub mod pattern;
pub mod pipeline;
pub mod record;
pub mod rule_source;
pub mod rules;
pub mod section;
pub mod severity;
pub mod template;
pub mod timestamp;

pub use combinators::{broadcast, dispatch, Broadcast, Dispatch, Selector};
pub use diagnostics::{silent_diagnostics, stderr_diagnostics, DiagnosticCallback};
pub use engine::{Engine, EngineBuilder};
pub use error::{LoggerError, Result};
pub use logger::{make_logger, CloseCompletion, FnSink, Logger, NullSink, Sink};
pub use metrics::PipelineMetrics;
pub use pattern::Pattern;
pub use pipeline::{compose_text, split_lines, LogCall};
pub use record::{ErrorPayload, Location, LogRecord};
pub use rule_source::{parse_rule_source, RuleEntry};
pub use rules::{ReloadReport, Rule, RuleTable};
pub use section::{Section, SectionRegistry};
pub use severity::Severity;
pub use template::{render, RenderContext, Template};
pub use timestamp::TimestampFormat;
