use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use voca_db::models::Word;

use crate::ai::{CorrectionType, WordValidation};

#[derive(Debug, Deserialize)]
pub struct GroupRequest {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct GroupResponse {
    pub id: i64,
    pub name: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct GroupDetail {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub words: Vec<Word>,
}

#[derive(Debug, Serialize)]
pub struct GroupValidationResponse {
    pub group_id: i64,
    pub group_name: String,
    pub total_words: usize,
    pub problem_count: usize,
    /// Only the words the model flagged
    pub results: Vec<WordValidation>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateWordsRequest {
    #[serde(default)]
    pub words: Vec<WordCorrection>,
}

/// Correction chosen by the user from a validation report
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WordCorrection {
    pub id: Option<i64>,
    #[serde(default, alias = "suggestedEnglish")]
    pub suggested_english: Option<String>,
    #[serde(default, alias = "suggestedKorean")]
    pub suggested_korean: Option<String>,
    /// `replace`/`add`, or the Korean labels `수정`/`추가`
    #[serde(default, alias = "correctionType")]
    pub correction_type: Option<String>,
}

impl WordCorrection {
    /// Unknown or missing types replace the stored translation
    pub fn correction_type(&self) -> CorrectionType {
        self.correction_type
            .as_deref()
            .and_then(CorrectionType::parse)
            .unwrap_or(CorrectionType::Replace)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdatedWord {
    pub id: i64,
    pub old_english: String,
    pub new_english: String,
    pub english_changed: bool,
    pub old_korean: String,
    pub new_korean: String,
    pub korean_changed: bool,
    pub correction_type: CorrectionType,
}

#[derive(Debug, Serialize)]
pub struct UpdateWordsResponse {
    pub group_id: i64,
    pub updated_count: usize,
    pub updated_words: Vec<UpdatedWord>,
    pub message: String,
}
