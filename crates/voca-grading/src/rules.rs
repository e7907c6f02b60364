//! Equivalence rules between a normalized answer and a normalized gloss.
//!
//! Each rule is a pure predicate `(user, gloss) -> bool`. The suffix rules are
//! plain data ([`SuffixRule`]) grouped in a [`RuleTable`], so a table for a
//! different language pair can be loaded from JSON without code changes.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::normalize::normalize;

/// A single equivalence predicate over two normalized strings.
pub trait EquivalenceRule: fmt::Debug + Send + Sync {
    /// Short identifier, used in logs when a rule accepts an answer.
    fn name(&self) -> &str;

    /// Whether `user` should be accepted for `gloss`.
    ///
    /// Both arguments must already be normalized.
    fn matches(&self, user: &str, gloss: &str) -> bool;
}

/// Accepts identical strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExactMatch;

impl EquivalenceRule for ExactMatch {
    fn name(&self) -> &str {
        "exact"
    }

    fn matches(&self, user: &str, gloss: &str) -> bool {
        user == gloss
    }
}

/// Suffix elision rule.
///
/// The gloss is reduced to a stem by removing the longest matching entry of
/// `strip` (the gloss itself is the stem when none matches). The answer is
/// accepted when it equals the stem followed by any entry of `reattach`; an
/// empty string in `reattach` stands for the bare stem. A `symmetric` rule
/// is also tried with the two sides swapped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuffixRule {
    /// Identifier used in logs.
    pub name: String,
    /// Trailing suffixes removed from the reference side.
    pub strip: Vec<String>,
    /// Suffixes that may follow the stem on the answer side.
    #[serde(default = "bare_stem")]
    pub reattach: Vec<String>,
    /// Also try with the answer and gloss swapped.
    #[serde(default)]
    pub symmetric: bool,
}

fn bare_stem() -> Vec<String> {
    vec![String::new()]
}

impl SuffixRule {
    /// Build a rule from string slices.
    pub fn new(name: &str, strip: &[&str], reattach: &[&str], symmetric: bool) -> Self {
        Self {
            name: name.to_string(),
            strip: strip.iter().map(|s| s.to_string()).collect(),
            reattach: reattach.iter().map(|s| s.to_string()).collect(),
            symmetric,
        }
    }

    /// Normalize suffixes and order `strip` longest first.
    ///
    /// Rules loaded from configuration go through this before use so that a
    /// shorter suffix never shadows a longer one (`적` vs `적으로`).
    pub fn prepared(mut self) -> Result<Self, RuleTableError> {
        self.strip = self.strip.iter().map(|s| normalize(s)).collect();
        self.reattach = self.reattach.iter().map(|s| normalize(s)).collect();

        if self.strip.is_empty() || self.strip.iter().any(String::is_empty) {
            return Err(RuleTableError::EmptyStrip(self.name));
        }
        if self.reattach.is_empty() {
            return Err(RuleTableError::EmptyReattach(self.name));
        }

        self.strip
            .sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));
        self.strip.dedup();
        self.reattach.dedup();

        Ok(self)
    }

    /// Stem of `reference`: the reference without its longest strippable suffix.
    pub fn stem<'a>(&self, reference: &'a str) -> &'a str {
        self.strip
            .iter()
            .find_map(|suffix| reference.strip_suffix(suffix.as_str()))
            .unwrap_or(reference)
    }

    fn matches_one_way(&self, candidate: &str, reference: &str) -> bool {
        let stem = self.stem(reference);

        candidate
            .strip_prefix(stem)
            .is_some_and(|rest| self.reattach.iter().any(|suffix| rest == suffix))
    }
}

impl EquivalenceRule for SuffixRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn matches(&self, user: &str, gloss: &str) -> bool {
        self.matches_one_way(user, gloss) || (self.symmetric && self.matches_one_way(gloss, user))
    }
}

/// Errors raised while loading a rule table.
#[derive(Debug, Error)]
pub enum RuleTableError {
    #[error("rule table is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("rule '{0}' has no usable suffix to strip")]
    EmptyStrip(String),
    #[error("rule '{0}' has nothing to reattach")]
    EmptyReattach(String),
}

/// Ordered suffix rules, applied after exact matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleTable {
    /// Rules in evaluation order.
    pub rules: Vec<SuffixRule>,
}

impl RuleTable {
    /// Korean inflection table used for English → Korean quizzes.
    pub fn korean() -> Self {
        Self {
            rules: vec![
                korean::adjectival_suffix(),
                korean::verbal_stem(),
                korean::adverbializer(),
                korean::plural_marker(),
            ],
        }
    }

    /// Parse a table from JSON of the form `{"rules": [...]}`.
    pub fn from_json(json: &str) -> Result<Self, RuleTableError> {
        let table: Self = serde_json::from_str(json)?;
        table.prepared()
    }

    /// Validate and prepare every rule.
    pub fn prepared(self) -> Result<Self, RuleTableError> {
        let rules = self
            .rules
            .into_iter()
            .map(SuffixRule::prepared)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { rules })
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::korean()
    }
}

/// Korean suffix rules.
pub mod korean {
    use super::SuffixRule;

    /// `-적`, `-적으로`, `-적인`, `-적이`, `-적게` dropped from the gloss.
    pub fn adjectival_suffix() -> SuffixRule {
        SuffixRule::new("adjectival-suffix", &["적으로", "적인", "적이", "적게", "적"], &[""], false)
    }

    /// `하다` / `한다` / `함` stem, answered bare or with any of the three.
    pub fn verbal_stem() -> SuffixRule {
        SuffixRule::new(
            "verbal-stem",
            &["하다", "한다", "함"],
            &["", "하다", "한다", "함"],
            false,
        )
    }

    /// `-게` and `-하게` are interchangeable.
    pub fn adverbializer() -> SuffixRule {
        SuffixRule::new("adverbializer", &["하게", "게"], &["게", "하게"], false)
    }

    /// Plural marker `들` is optional on either side.
    pub fn plural_marker() -> SuffixRule {
        SuffixRule::new("plural-marker", &["들"], &[""], true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prepared(rule: SuffixRule) -> SuffixRule {
        rule.prepared().expect("rule should be valid")
    }

    #[test]
    fn test_exact_match() {
        assert!(ExactMatch.matches("행복", "행복"));
        assert!(!ExactMatch.matches("행복", "행복하다"));
    }

    #[test]
    fn test_adjectival_suffix() {
        let rule = prepared(korean::adjectival_suffix());

        assert!(rule.matches("고의", "고의적"));
        assert!(rule.matches("고의", "고의적으로"));
        assert!(rule.matches("감정", "감정적인"));
        assert!(rule.matches("일시", "일시적이"));
        assert!(rule.matches("효과", "효과적게"));

        // The suffix is dropped from the gloss only, nothing is reattached
        assert!(!rule.matches("고의로", "고의적으로"));
        assert!(!rule.matches("고의적으로", "고의"));
    }

    #[test]
    fn test_adjectival_suffix_is_trailing_only() {
        let rule = prepared(korean::adjectival_suffix());
        assert!(!rule.matches("극적인", "적극적인"));
        assert!(rule.matches("적극", "적극적인"));
    }

    #[test]
    fn test_verbal_stem() {
        let rule = prepared(korean::verbal_stem());

        assert!(rule.matches("행복", "행복하다"));
        assert!(rule.matches("행복함", "행복하다"));
        assert!(rule.matches("행복한다", "행복함"));
        // Gloss without the suffix is its own stem
        assert!(rule.matches("행복하다", "행복"));
        assert!(rule.matches("공부함", "공부"));

        assert!(!rule.matches("행복해", "행복하다"));
        assert!(!rule.matches("불행", "행복하다"));
    }

    #[test]
    fn test_adverbializer() {
        let rule = prepared(korean::adverbializer());

        assert!(rule.matches("조용하게", "조용게"));
        assert!(rule.matches("빠르게", "빠르하게"));
        assert!(rule.matches("행복하게", "행복게"));
        assert!(rule.matches("행복게", "행복하게"));
        // No suffix on the gloss: the gloss is the stem
        assert!(rule.matches("행복하게", "행복"));

        // The bare stem is not an adverbializer form
        assert!(!rule.matches("행복", "행복하게"));
    }

    #[test]
    fn test_plural_marker_both_directions() {
        let rule = prepared(korean::plural_marker());

        assert!(rule.matches("사과", "사과들"));
        assert!(rule.matches("사과들", "사과"));
        assert!(!rule.matches("사과", "배들"));
        assert!(!rule.matches("사과들들", "사과"));
    }

    #[test]
    fn test_strip_prefers_longest_suffix() {
        // Declared shortest first on purpose
        let rule = SuffixRule::new("t", &["적", "적으로"], &[""], false)
            .prepared()
            .unwrap();
        assert_eq!(rule.strip, vec!["적으로".to_string(), "적".to_string()]);
        assert_eq!(rule.stem("고의적으로"), "고의");
    }

    #[test]
    fn test_rule_from_json_defaults() {
        let table = RuleTable::from_json(
            r#"{ "rules": [ { "name": "plural", "strip": ["S"], "symmetric": true } ] }"#,
        )
        .unwrap();

        let rule = &table.rules[0];
        assert_eq!(rule.reattach, vec![String::new()]);
        // Suffixes are normalized on load
        assert_eq!(rule.strip, vec!["s".to_string()]);
        assert!(rule.matches("cats", "cat"));
        assert!(rule.matches("cat", "cats"));
    }

    #[test]
    fn test_rule_table_rejects_bad_rules() {
        let empty_strip = RuleTable::from_json(r#"{ "rules": [ { "name": "x", "strip": [] } ] }"#);
        assert!(matches!(empty_strip, Err(RuleTableError::EmptyStrip(name)) if name == "x"));

        let blank_strip =
            RuleTable::from_json(r#"{ "rules": [ { "name": "y", "strip": [" ~ "] } ] }"#);
        assert!(matches!(blank_strip, Err(RuleTableError::EmptyStrip(_))));

        let empty_reattach = RuleTable::from_json(
            r#"{ "rules": [ { "name": "z", "strip": ["a"], "reattach": [] } ] }"#,
        );
        assert!(matches!(empty_reattach, Err(RuleTableError::EmptyReattach(_))));

        assert!(matches!(
            RuleTable::from_json("not json"),
            Err(RuleTableError::Parse(_))
        ));
    }

    #[test]
    fn test_korean_table_round_trips_through_json() {
        let json = serde_json::to_string(&RuleTable::korean()).unwrap();
        let loaded = RuleTable::from_json(&json).unwrap();
        assert_eq!(loaded, RuleTable::korean().prepared().unwrap());
    }
}
