//! Ordered glob rules resolving a section name to its default severity

use super::{error::LoggerError, pattern::Pattern, severity::Severity};

/// A (pattern, severity) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pattern: Pattern,
    level: Severity,
}

impl Rule {
    pub fn new(pattern: impl Into<Pattern>, level: Severity) -> Self {
        Self {
            pattern: pattern.into(),
            level,
        }
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn level(&self) -> Severity {
        self.level
    }
}

/// Outcome of replacing the rule list
///
/// Entries whose level name did not parse are dropped individually and
/// reported here; the remaining entries are still applied.
#[derive(Debug, Clone, Default)]
pub struct ReloadReport {
    pub applied: usize,
    pub dropped: Vec<LoggerError>,
}

impl ReloadReport {
    pub fn is_clean(&self) -> bool {
        self.dropped.is_empty()
    }
}

/// Rules in priority order; the earliest match wins.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<Rule>,
    default_level: Severity,
}

impl RuleTable {
    /// Severity for names no rule matches
    pub const DEFAULT_LEVEL: Severity = Severity::Notice;

    pub fn new() -> Self {
        Self::with_default(Self::DEFAULT_LEVEL)
    }

    pub fn with_default(default_level: Severity) -> Self {
        Self {
            rules: Vec::new(),
            default_level,
        }
    }

    pub fn default_level(&self) -> Severity {
        self.default_level
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Severity of the first matching rule, or the default level
    pub fn resolve(&self, name: &str) -> Severity {
        self.rules
            .iter()
            .find(|rule| rule.pattern.matches(name))
            .map_or(self.default_level, |rule| rule.level)
    }

    /// Replace every rule with `entries`, parsing level names case-insensitively.
    ///
    /// An unrecognized level name drops only that entry. The new list takes
    /// effect as a whole once all entries have been examined.
    pub fn replace_all<I, P, L>(&mut self, entries: I) -> ReloadReport
    where
        I: IntoIterator<Item = (P, L)>,
        P: AsRef<str>,
        L: AsRef<str>,
    {
        let mut report = ReloadReport::default();
        let mut rules = Vec::new();

        for (pattern, level) in entries {
            let (pattern, level) = (pattern.as_ref(), level.as_ref());
            match level.parse::<Severity>() {
                Ok(severity) => rules.push(Rule::new(pattern, severity)),
                Err(_) => report.dropped.push(LoggerError::unknown_level(pattern, level)),
            }
        }

        report.applied = rules.len();
        self.rules = rules;
        report
    }

    /// Insert at the front so the rule overrides every existing one
    pub fn prepend(&mut self, pattern: &str, level: Severity) {
        self.rules.insert(0, Rule::new(pattern, level));
    }

    /// Insert at the back as a fallback default
    pub fn append(&mut self, pattern: &str, level: Severity) {
        self.rules.push(Rule::new(pattern, level));
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::new()
    }
}
