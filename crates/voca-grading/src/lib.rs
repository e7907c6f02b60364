//! Answer evaluation for self-graded vocabulary quizzes.
//!
//! A learner's answer is accepted when, after [`normalize`], it equals one of
//! the glosses of the stored translation or differs from it only by one of a
//! small set of known inflection patterns. The engine is pure: no I/O, no
//! shared mutable state.

pub mod glosses;
pub mod matcher;
pub mod normalize;
pub mod rules;

use std::sync::LazyLock;

pub use glosses::{GLOSS_SEPARATOR, expand_glosses};
pub use matcher::AnswerMatcher;
pub use normalize::normalize;
pub use rules::{EquivalenceRule, ExactMatch, RuleTable, RuleTableError, SuffixRule};

static DEFAULT_MATCHER: LazyLock<AnswerMatcher> = LazyLock::new(AnswerMatcher::korean);

/// Whether `user_answer` is accepted for `references` under the Korean rules.
///
/// # Examples
/// ```
/// use voca_grading::is_answer_accepted;
///
/// assert!(is_answer_accepted("신속한", &["빠른, 신속한"]));
/// assert!(is_answer_accepted("사과", &["사과들"]));
/// assert!(!is_answer_accepted("", &["아무 값"]));
/// ```
pub fn is_answer_accepted<S: AsRef<str>>(user_answer: &str, references: &[S]) -> bool {
    DEFAULT_MATCHER.is_accepted(user_answer, references)
}

/// Rule equivalence of two already-normalized strings under the Korean rules.
pub fn pattern_equivalent(normalized_user: &str, normalized_gloss: &str) -> bool {
    DEFAULT_MATCHER.pattern_equivalent(normalized_user, normalized_gloss)
}
