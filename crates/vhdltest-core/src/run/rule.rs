//! Line classification rules.
//!
//! A rule pairs a [`Severity`] with a regular expression. Rules are held in
//! ordered tables and the first rule whose pattern matches a line decides its
//! severity, so a narrow rule placed before a broad one can downgrade known
//! benign vendor output.
//!
//! Patterns are compiled with the `regex` crate, whose matching time is linear
//! in the input. That bounds the cost of every match; the compiled program size
//! is bounded as well so a pathological pattern is rejected at construction.

use crate::error::{Result, VhdlTestError};
use crate::run::line::Severity;
use regex::{Regex, RegexBuilder};

/// Upper bound on the compiled size of a classification pattern.
const PATTERN_SIZE_LIMIT: usize = 1 << 20;

/// A single classification rule.
#[derive(Debug, Clone)]
pub struct RunLineRule {
    severity: Severity,
    pattern: Regex,
}

impl RunLineRule {
    /// Compile a rule from a pattern.
    pub fn new(severity: Severity, pattern: &str) -> Result<Self> {
        let pattern = RegexBuilder::new(pattern)
            .size_limit(PATTERN_SIZE_LIMIT)
            .build()
            .map_err(|source| VhdlTestError::InvalidRule {
                pattern: pattern.to_string(),
                source,
            })?;
        Ok(Self { severity, pattern })
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Whether the pattern matches anywhere in `line`.
    pub fn is_match(&self, line: &str) -> bool {
        self.pattern.is_match(line)
    }
}

/// Compile an ordered rule table from `(severity, pattern)` pairs.
pub fn rule_table(rules: &[(Severity, &str)]) -> Result<Vec<RunLineRule>> {
    rules
        .iter()
        .map(|(severity, pattern)| RunLineRule::new(*severity, pattern))
        .collect()
}

/// Classify a line against an ordered table; unmatched lines are `Text`.
pub fn classify(rules: &[RunLineRule], line: &str) -> Severity {
    rules
        .iter()
        .find(|rule| rule.is_match(line))
        .map_or(Severity::Text, RunLineRule::severity)
}
