//! Glob patterns for section names
//!
//! A pattern is compiled into an ordered list of literals. `N` literals encode
//! `N - 1` wildcards between them; an empty first or last literal stands for a
//! leading or trailing `*`.
//!
//! ```
//! use rust_section_logger::Pattern;
//!
//! let pattern = Pattern::compile("foo*bar*");
//! assert_eq!(pattern.literals(), ["foo", "bar", ""]);
//! assert!(pattern.matches("foo.bar.baz"));
//! assert!(!pattern.matches("bar.foo"));
//! ```
//!
//! Matching backtracks over every occurrence of each literal, so the worst case
//! is exponential in the number of literals for pathological overlapping
//! patterns. Rule sets are small and written by the application author, which
//! keeps this from mattering in practice.

use std::fmt;

/// Compiled glob: literal segments separated by implicit `*` wildcards
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern {
    source: String,
    literals: Vec<String>,
}

impl Pattern {
    /// Compile a glob, splitting on `*`.
    ///
    /// The empty glob compiles to no literals at all and matches only the
    /// empty string.
    pub fn compile(glob: &str) -> Self {
        let literals = if glob.is_empty() {
            Vec::new()
        } else {
            glob.split('*').map(String::from).collect()
        };

        Self {
            source: glob.to_string(),
            literals,
        }
    }

    /// The glob text this pattern was compiled from
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn literals(&self) -> &[String] {
        &self.literals
    }

    /// A final empty literal after at least one wildcard accepts any suffix
    fn has_trailing_wildcard(&self) -> bool {
        self.literals.len() > 1 && self.literals.last().is_some_and(|l| l.is_empty())
    }

    /// Test whether `candidate` matches this pattern
    pub fn matches(&self, candidate: &str) -> bool {
        let Some((first, rest)) = self.literals.split_first() else {
            return candidate.is_empty();
        };

        if !candidate.starts_with(first.as_str()) {
            return false;
        }

        self.match_rest(rest, candidate, first.len())
    }

    fn match_rest(&self, rest: &[String], candidate: &str, cursor: usize) -> bool {
        let Some((literal, tail)) = rest.split_first() else {
            return cursor == candidate.len() || self.has_trailing_wildcard();
        };

        if literal.is_empty() {
            // Adjacent wildcards collapse; the next wildcard absorbs any gap
            return self.match_rest(tail, candidate, cursor);
        }

        let mut start = cursor;
        while let Some(offset) = candidate[start..].find(literal.as_str()) {
            let found = start + offset;
            if self.match_rest(tail, candidate, found + literal.len()) {
                return true;
            }

            // Retry from the next character to catch overlapping occurrences
            let step = candidate[found..].chars().next().map_or(1, char::len_utf8);
            start = found + step;
            if start > candidate.len() {
                break;
            }
        }

        false
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl From<&str> for Pattern {
    fn from(glob: &str) -> Self {
        Pattern::compile(glob)
    }
}
