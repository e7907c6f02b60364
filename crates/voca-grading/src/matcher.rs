//! Answer evaluation: normalize, expand glosses, then try each rule in order.

use crate::glosses::expand_glosses;
use crate::normalize::normalize;
use crate::rules::{EquivalenceRule, ExactMatch, RuleTable, RuleTableError};

/// Decides whether a free-text answer satisfies a set of reference translations.
///
/// Rules are evaluated in order and the first match wins. Exact equality is
/// always the first rule, followed by the suffix rules of the [`RuleTable`]
/// and any rule added with [`AnswerMatcher::with_rule`].
///
/// The matcher holds no mutable state and can be shared freely between
/// request handlers.
#[derive(Debug)]
pub struct AnswerMatcher {
    rules: Vec<Box<dyn EquivalenceRule>>,
}

impl AnswerMatcher {
    /// Build a matcher from a rule table.
    ///
    /// Suffixes are normalized and ordered longest first before use.
    pub fn new(table: RuleTable) -> Result<Self, RuleTableError> {
        let table = table.prepared()?;

        let mut rules: Vec<Box<dyn EquivalenceRule>> = Vec::with_capacity(table.rules.len() + 1);
        rules.push(Box::new(ExactMatch));
        for rule in table.rules {
            rules.push(Box::new(rule));
        }

        Ok(Self { rules })
    }

    /// Matcher with the built-in Korean suffix rules.
    pub fn korean() -> Self {
        // Built-in rules are declared normalized and longest suffix first
        let mut rules: Vec<Box<dyn EquivalenceRule>> = vec![Box::new(ExactMatch)];
        for rule in RuleTable::korean().rules {
            rules.push(Box::new(rule));
        }

        Self { rules }
    }

    /// Append a custom rule, evaluated after the existing ones.
    pub fn with_rule(mut self, rule: impl EquivalenceRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Names of the active rules in evaluation order.
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    /// Whether two already-normalized strings are equivalent under any rule.
    pub fn pattern_equivalent(&self, normalized_user: &str, normalized_gloss: &str) -> bool {
        self.matching_rule(normalized_user, normalized_gloss).is_some()
    }

    /// Whether `user_answer` is accepted for the given reference translations.
    ///
    /// Never fails: an empty answer or an empty candidate set is simply
    /// rejected.
    pub fn is_accepted<S: AsRef<str>>(&self, user_answer: &str, references: &[S]) -> bool {
        self.matched_rule(user_answer, references).is_some()
    }

    /// Name of the rule that accepted the answer, if any.
    pub fn matched_rule<S: AsRef<str>>(&self, user_answer: &str, references: &[S]) -> Option<&str> {
        let user = normalize(user_answer);
        if user.is_empty() {
            return None;
        }

        expand_glosses(references).iter().find_map(|candidate| {
            let gloss = normalize(candidate);
            if gloss.is_empty() {
                return None;
            }
            self.matching_rule(&user, &gloss)
        })
    }

    fn matching_rule(&self, user: &str, gloss: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|rule| rule.matches(user, gloss))
            .map(|rule| rule.name())
    }
}

impl Default for AnswerMatcher {
    fn default() -> Self {
        Self::korean()
    }
}
