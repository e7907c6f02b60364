//! Answer normalization for self-graded quizzes.
//!
//! Learners type answers with stray spacing, mixed case and the occasional
//! `~` used as an emphasis marker. None of that should decide whether an
//! answer is right, so both sides of a comparison go through [`normalize`].

use unicode_normalization::UnicodeNormalization;

/// Normalize a string for answer comparison.
///
/// Applies the following transformations in order:
/// 1. Remove every `~`
/// 2. Remove every whitespace character
/// 3. Lowercase
/// 4. Unicode NFC composition (decomposed Hangul jamo become syllables)
///
/// Composition runs last so that jamo separated by a removed space or `~`
/// still combine. Empty input yields an empty string. The function is
/// idempotent.
///
/// # Examples
/// ```
/// use voca_grading::normalize;
///
/// assert_eq!(normalize("  빠른 ~ "), "빠른");
/// assert_eq!(normalize("Hello World"), "helloworld");
/// assert_eq!(normalize(""), "");
/// ```
pub fn normalize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    text.chars()
        .filter(|c| *c != '~' && !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
        .chars()
        .nfc()
        .collect()
}
