//! Rule-set source text
//!
//! Two grammars are accepted:
//!
//! - A JSON array of `["glob", "level"]` pairs or `{"pattern": .., "level": ..}`
//!   objects, recognised by a leading `[`.
//! - A compact list of `glob=level` entries separated by newlines or commas.
//!   Blank entries and lines starting with `#` are skipped.
//!
//! ```
//! use rust_section_logger::core::rule_source::parse_rule_source;
//!
//! let entries = parse_rule_source("db.*=debug, *=warning").unwrap();
//! assert_eq!(entries.len(), 2);
//! assert_eq!(entries[0].pattern, "db.*");
//! assert_eq!(entries[1].level, "warning");
//! ```
//!
//! Only the document structure is checked here. Level names stay as text and
//! are validated entry by entry when the rules are applied.

use super::error::{LoggerError, Result};
use serde::{Deserialize, Serialize};

/// One unvalidated rule as written in the source text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleEntry {
    pub pattern: String,
    pub level: String,
}

impl RuleEntry {
    pub fn new(pattern: impl Into<String>, level: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            level: level.into(),
        }
    }

    pub fn as_pair(&self) -> (&str, &str) {
        (&self.pattern, &self.level)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonRule {
    Pair(String, String),
    Object { pattern: String, level: String },
}

impl From<JsonRule> for RuleEntry {
    fn from(rule: JsonRule) -> Self {
        match rule {
            JsonRule::Pair(pattern, level) | JsonRule::Object { pattern, level } => {
                RuleEntry { pattern, level }
            }
        }
    }
}

/// Parse rule-set source text into ordered entries.
///
/// # Errors
///
/// Returns `MalformedRuleDocument` if the text does not follow either grammar.
pub fn parse_rule_source(text: &str) -> Result<Vec<RuleEntry>> {
    let trimmed = text.trim_start();
    if trimmed.starts_with('[') {
        parse_json(trimmed)
    } else {
        parse_compact(text)
    }
}

fn parse_json(text: &str) -> Result<Vec<RuleEntry>> {
    let rules: Vec<JsonRule> = serde_json::from_str(text)
        .map_err(|e| LoggerError::malformed(format!("invalid JSON rule list: {}", e)))?;
    Ok(rules.into_iter().map(RuleEntry::from).collect())
}

fn parse_compact(text: &str) -> Result<Vec<RuleEntry>> {
    let mut entries = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        if line.trim_start().starts_with('#') {
            continue;
        }

        for raw in line.split(',') {
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }

            let (pattern, level) = raw.rsplit_once('=').ok_or_else(|| {
                LoggerError::malformed(format!(
                    "line {}: entry '{}' is not of the form glob=level",
                    line_no + 1,
                    raw
                ))
            })?;
            entries.push(RuleEntry::new(pattern.trim(), level.trim()));
        }
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_grammar() {
        let text = "# storage\ndb.*=debug\nnet.*=Info, cache=error\n\n*=notice\n";
        let entries = parse_rule_source(text).unwrap();

        assert_eq!(
            entries,
            vec![
                RuleEntry::new("db.*", "debug"),
                RuleEntry::new("net.*", "Info"),
                RuleEntry::new("cache", "error"),
                RuleEntry::new("*", "notice"),
            ]
        );
    }

    #[test]
    fn test_compact_keeps_unknown_levels() {
        let entries = parse_rule_source("a=loud").unwrap();
        assert_eq!(entries, vec![RuleEntry::new("a", "loud")]);
    }

    #[test]
    fn test_compact_missing_separator() {
        let err = parse_rule_source("db.*=debug\nnet.*").unwrap_err();
        assert!(matches!(err, LoggerError::MalformedRuleDocument { .. }));
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_empty_document() {
        assert!(parse_rule_source("").unwrap().is_empty());
        assert!(parse_rule_source("  \n# nothing\n").unwrap().is_empty());
    }

    #[test]
    fn test_json_grammar() {
        let text = r#"[["db.*", "debug"], {"pattern": "*", "level": "error"}]"#;
        let entries = parse_rule_source(text).unwrap();

        assert_eq!(
            entries,
            vec![RuleEntry::new("db.*", "debug"), RuleEntry::new("*", "error")]
        );
    }

    #[test]
    fn test_json_malformed() {
        let err = parse_rule_source(r#"[["db.*"]"#).unwrap_err();
        assert!(matches!(err, LoggerError::MalformedRuleDocument { .. }));

        let err = parse_rule_source(r#"[{"pattern": "x"}]"#).unwrap_err();
        assert!(matches!(err, LoggerError::MalformedRuleDocument { .. }));
    }
}
