//! Input validation shared by the route handlers.

use std::sync::LazyLock;

use regex::Regex;
use validator::ValidateLength;

use crate::error::ApiError;

pub const MAX_GROUP_NAME_LEN: u64 = 100;
pub const MAX_WORD_LEN: u64 = 255;
pub const MAX_PREFERENCE_KEY_LEN: u64 = 50;
pub const MAX_PREFERENCE_VALUE_LEN: u64 = 255;

static PREFERENCE_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.-]+$").expect("valid preference key regex"));

/// Trim `value` and check it holds 1..=`max` characters
fn required_text(field: &str, value: &str, max: u64) -> Result<String, ApiError> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ApiError::Validation(format!("{field} is required")));
    }
    if !value.validate_length(None, Some(max), None) {
        return Err(ApiError::Validation(format!(
            "{field} must be at most {max} characters long"
        )));
    }

    Ok(value.to_string())
}

/// Validate a group name, returning it trimmed
///
/// ```
/// use voca_api::validation::validate_group_name;
///
/// assert_eq!(validate_group_name("  토익 ").unwrap(), "토익");
/// assert!(validate_group_name("   ").is_err());
/// ```
pub fn validate_group_name(name: &str) -> Result<String, ApiError> {
    required_text("Group name", name, MAX_GROUP_NAME_LEN)
}

/// Validate the English side of a word, returning it trimmed
pub fn validate_english(english: &str) -> Result<String, ApiError> {
    required_text("English word", english, MAX_WORD_LEN)
}

/// Validate the Korean side of a word, returning it trimmed
pub fn validate_korean(korean: &str) -> Result<String, ApiError> {
    required_text("Korean meaning", korean, MAX_WORD_LEN)
}

pub fn validate_preference_key(key: &str) -> Result<(), ApiError> {
    if key.is_empty() || !key.validate_length(None, Some(MAX_PREFERENCE_KEY_LEN), None) {
        return Err(ApiError::Validation(format!(
            "Preference key must be 1 to {MAX_PREFERENCE_KEY_LEN} characters long"
        )));
    }

    if !PREFERENCE_KEY.is_match(key) {
        return Err(ApiError::Validation(
            "Preference key can only contain letters, numbers, '_', '.' and '-'".to_string(),
        ));
    }

    Ok(())
}

/// Preference values are stored verbatim, so only the length is checked
pub fn validate_preference_value(value: &str) -> Result<(), ApiError> {
    if value.is_empty() {
        return Err(ApiError::Validation("Preference value is required".to_string()));
    }
    if !value.validate_length(None, Some(MAX_PREFERENCE_VALUE_LEN), None) {
        return Err(ApiError::Validation(format!(
            "Preference value must be at most {MAX_PREFERENCE_VALUE_LEN} characters long"
        )));
    }

    Ok(())
}
