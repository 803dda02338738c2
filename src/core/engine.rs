//! Process-wide logging state
//!
//! An [`Engine`] owns the rule table, the section registry, the default
//! section and the default logger. Applications usually build one at start-up
//! and install it with [`Engine::init_global`]; [`Engine::global`] otherwise
//! hands out a default instance created on first use.
//!
//! Locks are never held across an `.await`. They are always taken in the
//! order rule table, registry map, section state. Rule mutations keep the
//! table locked through the recompute pass, so a section interned meanwhile
//! resolves against the new rules.

use super::{
    diagnostics::{stderr_diagnostics, DiagnosticCallback},
    error::{LoggerError, Result},
    logger::Logger,
    metrics::PipelineMetrics,
    pipeline::LogCall,
    rule_source::{parse_rule_source, RuleEntry},
    rules::{ReloadReport, Rule, RuleTable},
    section::{Section, SectionRegistry},
    severity::Severity,
};
use futures::future::BoxFuture;
use parking_lot::{RwLock, RwLockWriteGuard};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

static GLOBAL: OnceLock<Engine> = OnceLock::new();

pub struct Engine {
    rules: RwLock<RuleTable>,
    sections: SectionRegistry,
    default_section: RwLock<Section>,
    default_logger: RwLock<Logger>,
    capture_backtraces: AtomicBool,
    on_diagnostic: DiagnosticCallback,
    metrics: Arc<PipelineMetrics>,
}

impl Engine {
    /// Name of the section used when a call names none
    pub const DEFAULT_SECTION: &'static str = "main";

    /// Engine with no rules, a `main` default section and a null logger
    #[must_use]
    pub fn new() -> Self {
        EngineBuilder::new().build()
    }

    #[must_use]
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// The process-wide engine, created with defaults on first use unless
    /// [`init_global`](Self::init_global) installed one earlier.
    pub fn global() -> &'static Engine {
        GLOBAL.get_or_init(Engine::new)
    }

    /// Install `engine` as the process-wide engine.
    ///
    /// # Errors
    ///
    /// Gives `engine` back if a global engine already exists.
    pub fn init_global(engine: Engine) -> std::result::Result<&'static Engine, Engine> {
        GLOBAL.set(engine)?;
        Ok(Self::global())
    }

    // ---- sections ----------------------------------------------------------

    /// Intern the section called `name`
    pub fn section(&self, name: &str) -> Section {
        let rules = self.rules.read();
        self.sections.intern(name, |n| rules.resolve(n))
    }

    /// Pin a section's level so rule reloads no longer change it
    pub fn set_level(&self, section: &Section, level: Severity) {
        section.set_level(level);
    }

    /// Drop a pinned level and resolve from the rules again.
    /// No-op if the section is not overridden.
    pub fn reset_level(&self, section: &Section) {
        let rules = self.rules.read();
        section.clear_override(rules.resolve(section.name()));
    }

    pub fn sections(&self) -> &SectionRegistry {
        &self.sections
    }

    /// Whether a call at `severity` in `section` would reach a logger
    pub fn enabled(&self, section: &Section, severity: Severity) -> bool {
        severity >= section.level()
    }

    // ---- rules -------------------------------------------------------------

    /// Severity the current rules give `name`
    pub fn resolve(&self, name: &str) -> Severity {
        self.rules.read().resolve(name)
    }

    /// Snapshot of the current rules in priority order
    pub fn rules(&self) -> Vec<Rule> {
        self.rules.read().rules().to_vec()
    }

    /// Replace all rules with `(pattern, level name)` entries.
    ///
    /// Entries with an unknown level name are dropped and reported to the
    /// diagnostic channel; the others are applied.
    pub fn replace_rules<I, P, L>(&self, entries: I) -> ReloadReport
    where
        I: IntoIterator<Item = (P, L)>,
        P: AsRef<str>,
        L: AsRef<str>,
    {
        let report = self.mutate_rules(move |table| table.replace_all(entries));
        for err in &report.dropped {
            self.diagnose(err);
        }
        report
    }

    /// Parse rule-set source text and replace all rules with it.
    ///
    /// A malformed document is reported to the diagnostic channel and leaves
    /// the current rules in force; `None` is returned in that case.
    pub fn reload_rules(&self, text: &str) -> Option<ReloadReport> {
        match parse_rule_source(text) {
            Ok(entries) => Some(self.replace_rules(entries.iter().map(RuleEntry::as_pair))),
            Err(err) => {
                self.diagnose(&err);
                None
            }
        }
    }

    /// [`reload_rules`](Self::reload_rules) with the text of environment
    /// variable `var`; `None` if it is unset or malformed.
    pub fn reload_rules_from_env(&self, var: &str) -> Option<ReloadReport> {
        let text = std::env::var(var).ok()?;
        self.reload_rules(&text)
    }

    /// Add a rule ahead of all others
    pub fn prepend_rule(&self, pattern: &str, level: Severity) {
        self.mutate_rules(|table| table.prepend(pattern, level));
    }

    /// Add a rule behind all others
    pub fn append_rule(&self, pattern: &str, level: Severity) {
        self.mutate_rules(|table| table.append(pattern, level));
    }

    /// Re-resolve every live section that is not overridden; returns how
    /// many were updated.
    pub fn recompute_all(&self) -> usize {
        let rules = self.rules.read();
        self.sections.recompute_all(|name| rules.resolve(name))
    }

    fn mutate_rules<R>(&self, mutate: impl FnOnce(&mut RuleTable) -> R) -> R {
        let mut rules = self.rules.write();
        let out = mutate(&mut rules);

        let rules = RwLockWriteGuard::downgrade(rules);
        self.sections.recompute_all(|name| rules.resolve(name));
        out
    }

    fn diagnose(&self, err: &LoggerError) {
        (self.on_diagnostic)(err);
    }

    // ---- defaults ----------------------------------------------------------

    pub fn default_section(&self) -> Section {
        self.default_section.read().clone()
    }

    /// Replace the default section; returns the previous one
    pub fn set_default_section(&self, section: Section) -> Section {
        std::mem::replace(&mut *self.default_section.write(), section)
    }

    pub fn default_logger(&self) -> Logger {
        self.default_logger.read().clone()
    }

    /// Replace the default logger; returns the previous one, still open
    pub fn set_default_logger(&self, logger: Logger) -> Logger {
        std::mem::replace(&mut *self.default_logger.write(), logger)
    }

    /// Append backtraces of attached errors to the message text
    pub fn set_capture_backtraces(&self, enabled: bool) {
        self.capture_backtraces.store(enabled, Ordering::Relaxed);
    }

    pub fn captures_backtraces(&self) -> bool {
        self.capture_backtraces.load(Ordering::Relaxed)
    }

    pub fn metrics(&self) -> &PipelineMetrics {
        &self.metrics
    }

    pub(crate) fn shared_metrics(&self) -> Arc<PipelineMetrics> {
        Arc::clone(&self.metrics)
    }

    // ---- logging -----------------------------------------------------------

    /// Start a log call; see [`LogCall`]
    pub fn entry(&self, severity: Severity, message: impl Into<String>) -> LogCall<'_> {
        LogCall::new(self, severity, message.into())
    }

    /// Log to the default section and logger
    pub async fn log(&self, severity: Severity, message: impl Into<String>) -> Result<()> {
        self.entry(severity, message).send().await
    }

    /// Log to the default section and logger, swallowing every failure
    pub async fn log_ignore_errors(&self, severity: Severity, message: impl Into<String>) {
        self.entry(severity, message).send_ignore_errors().await
    }

    /// Log to the default section and logger without waiting for the sink;
    /// see [`LogCall::send_detached`]
    pub fn log_detached<S>(&self, severity: Severity, message: impl Into<String>, spawn: S)
    where
        S: FnOnce(BoxFuture<'static, ()>),
    {
        self.entry(severity, message).send_detached(spawn)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("rules", &self.rules.read().len())
            .field("sections", &self.sections.len())
            .field("default_section", &self.default_section().name().to_string())
            .field("default_logger", &self.default_logger().name().to_string())
            .finish()
    }
}

/// Builder for constructing an Engine with a fluent API
///
/// Rule sources are applied in this order: the environment variable from
/// [`rules_from_env`](Self::rules_from_env) if it is set, otherwise the
/// [`rules_text`](Self::rules_text) document; then every
/// [`rule`](Self::rule) is appended behind them.
///
/// # Example
/// ```
/// use rust_section_logger::{Engine, Severity};
///
/// let engine = Engine::builder()
///     .default_level(Severity::Warning)
///     .rules_text("db.*=debug")
///     .rule("*", Severity::Info)
///     .capture_backtraces(true)
///     .build();
///
/// assert_eq!(engine.resolve("db.pool"), Severity::Debug);
/// assert_eq!(engine.resolve("web"), Severity::Info);
/// ```
pub struct EngineBuilder {
    default_level: Severity,
    default_section: String,
    logger: Option<Logger>,
    rules_text: Option<String>,
    rules_env: Option<String>,
    rules: Vec<(String, Severity)>,
    capture_backtraces: bool,
    on_diagnostic: Option<DiagnosticCallback>,
}

impl EngineBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            default_level: RuleTable::DEFAULT_LEVEL,
            default_section: Engine::DEFAULT_SECTION.to_string(),
            logger: None,
            rules_text: None,
            rules_env: None,
            rules: Vec::new(),
            capture_backtraces: false,
            on_diagnostic: None,
        }
    }

    /// Severity for names no rule matches
    #[must_use = "builder methods return a new value"]
    pub fn default_level(mut self, level: Severity) -> Self {
        self.default_level = level;
        self
    }

    /// Name of the default section
    #[must_use = "builder methods return a new value"]
    pub fn default_section(mut self, name: impl Into<String>) -> Self {
        self.default_section = name.into();
        self
    }

    /// Default logger (a null logger otherwise)
    #[must_use = "builder methods return a new value"]
    pub fn logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Initial rule-set source text
    #[must_use = "builder methods return a new value"]
    pub fn rules_text(mut self, text: impl Into<String>) -> Self {
        self.rules_text = Some(text.into());
        self
    }

    /// Read the rule-set source text from environment variable `var`
    /// when it is set, in preference to [`rules_text`](Self::rules_text)
    #[must_use = "builder methods return a new value"]
    pub fn rules_from_env(mut self, var: impl Into<String>) -> Self {
        self.rules_env = Some(var.into());
        self
    }

    /// Append a rule
    #[must_use = "builder methods return a new value"]
    pub fn rule(mut self, pattern: impl Into<String>, level: Severity) -> Self {
        self.rules.push((pattern.into(), level));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn capture_backtraces(mut self, enabled: bool) -> Self {
        self.capture_backtraces = enabled;
        self
    }

    /// Receiver for internal diagnostics (stderr by default)
    #[must_use = "builder methods return a new value"]
    pub fn on_diagnostic(mut self, callback: DiagnosticCallback) -> Self {
        self.on_diagnostic = Some(callback);
        self
    }

    /// Build the Engine
    pub fn build(self) -> Engine {
        let table = RuleTable::with_default(self.default_level);
        let sections = SectionRegistry::new();
        let main = sections.intern(&self.default_section, |name| table.resolve(name));

        let engine = Engine {
            rules: RwLock::new(table),
            sections,
            default_section: RwLock::new(main),
            default_logger: RwLock::new(self.logger.unwrap_or_default()),
            capture_backtraces: AtomicBool::new(self.capture_backtraces),
            on_diagnostic: self.on_diagnostic.unwrap_or_else(stderr_diagnostics),
            metrics: Arc::new(PipelineMetrics::new()),
        };

        let env_text = self.rules_env.and_then(|var| std::env::var(var).ok());
        if let Some(text) = env_text.or(self.rules_text) {
            engine.reload_rules(&text);
        }
        for (pattern, level) in &self.rules {
            engine.append_rule(pattern, *level);
        }

        engine
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
