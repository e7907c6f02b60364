//! Applying AI-suggested corrections to stored words.

use voca_grading::{GLOSS_SEPARATOR, expand_glosses};

use super::model::{UpdatedWord, WordCorrection};
use crate::ai::CorrectionType;

/// Append the meanings of `addition` that `current` does not already list.
///
/// Comparison is per meaning, so adding `"강둑"` to `"은행, 강둑"` is a no-op
/// while adding `"강"` to `"강둑"` is not.
///
/// ```
/// use voca_api::group::corrections::merge_meanings;
///
/// assert_eq!(merge_meanings("은행", "강둑, 은행"), "은행, 강둑");
/// ```
pub fn merge_meanings(current: &str, addition: &str) -> String {
    let existing = expand_glosses(&[current]);
    let mut additions: Vec<&str> = Vec::new();

    for meaning in addition.split(GLOSS_SEPARATOR).map(str::trim) {
        if !meaning.is_empty() && !existing.contains(meaning) && !additions.contains(&meaning) {
            additions.push(meaning);
        }
    }

    let current = current.trim();
    match (current.is_empty(), additions.is_empty()) {
        (_, true) => current.to_string(),
        (true, false) => additions.join(", "),
        (false, false) => format!("{current}, {}", additions.join(", ")),
    }
}

/// Compute the new values for a word. Returns `None` when nothing changes.
pub fn apply_correction(
    id: i64,
    english: &str,
    korean: &str,
    correction: &WordCorrection,
) -> Option<UpdatedWord> {
    let correction_type = correction.correction_type();

    let new_english = match non_blank(correction.suggested_english.as_deref()) {
        Some(suggested) => suggested.to_string(),
        None => english.to_string(),
    };

    let new_korean = match non_blank(correction.suggested_korean.as_deref()) {
        Some(suggested) => match correction_type {
            CorrectionType::Add => merge_meanings(korean, suggested),
            CorrectionType::Replace => suggested.to_string(),
        },
        None => korean.to_string(),
    };

    let english_changed = new_english != english;
    let korean_changed = new_korean != korean;
    if !english_changed && !korean_changed {
        return None;
    }

    Some(UpdatedWord {
        id,
        old_english: english.to_string(),
        new_english,
        english_changed,
        old_korean: korean.to_string(),
        new_korean,
        korean_changed,
        correction_type,
    })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
