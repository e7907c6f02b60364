//! AI check of stored English/Korean word pairs.
//!
//! Model output is parsed leniently: the list may be bare or wrapped in a
//! `result`/`results` field, fields may be missing, and an unusable shape
//! falls back to "everything is correct" rather than failing the request.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::model::{AiError, ChatMessage, CompletionRequest};

/// Largest number of words sent in one completion request.
pub const MAX_WORDS_PER_REQUEST: usize = 30;

const VALIDATION_TEMPERATURE: f32 = 0.1;
const VALIDATION_MAX_TOKENS: u32 = 2000;

const VALIDATOR_PROMPT: &str = "당신은 영어-한국어 단어장 검수자입니다. 다음 오류를 찾습니다: \
1) 영어 단어 철자 오류, 2) 잘못된 한국어 번역, 3) 중요한 의미가 빠진 불완전한 번역 \
(이미 충분하면 의미를 추가하지 않습니다). 영어 이외의 언어는 고려하지 않습니다. \
응답은 JSON 객체로만 작성합니다.";

const VALIDATION_EXAMPLES: &str = "\
ID: 9999, 영어: quite, 한글: 조용히하다 -> isCorrect: false, correctionType: replace, suggestedEnglish: quite, suggestedKorean: 꽤, 상당히, explanation: 'quite'는 '꽤, 상당히'라는 뜻의 부사이며 'quiet'과 혼동됨
ID: 9998, 영어: happyness, 한글: 행복 -> isCorrect: false, correctionType: replace, suggestedEnglish: happiness, suggestedKorean: 행복, explanation: 올바른 철자는 'happiness'
ID: 9997, 영어: bank, 한글: 은행 -> isCorrect: false, correctionType: add, suggestedEnglish: bank, suggestedKorean: 강둑, explanation: 'bank'에는 '강둑'이라는 뜻도 있음";

const FALLBACK_EXPLANATION: &str = "AI response had an unexpected format; validation skipped.";
const MISSING_EXPLANATION: &str = "No explanation provided";

/// Word pair submitted for checking
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordToValidate {
    pub id: i64,
    pub english: String,
    pub korean: String,
}

/// How a suggested Korean translation should be applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrectionType {
    /// Replace the stored translation
    Replace,
    /// Append the suggested meanings to the stored translation
    Add,
}

impl CorrectionType {
    /// Accepts the English names and the Korean labels used by older clients.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "replace" | "수정" => Some(Self::Replace),
            "add" | "추가" => Some(Self::Add),
            _ => None,
        }
    }
}

/// Verdict for one word pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordValidation {
    pub id: i64,
    pub english: String,
    pub korean: String,
    pub is_correct: bool,
    pub correction_type: Option<CorrectionType>,
    pub suggested_english: String,
    pub suggested_korean: String,
    pub explanation: String,
}

pub fn word_validation_request(words: &[WordToValidate]) -> CompletionRequest {
    let listing = words
        .iter()
        .map(|w| format!("ID: {}, 영어: {}, 한글: {}", w.id, w.english, w.korean))
        .collect::<Vec<_>>()
        .join("\n");

    let prompt = format!(
        r#"단어 목록:
{listing}

예시:
{VALIDATION_EXAMPLES}

다음 JSON 형식으로 응답해 주세요:
{{
  "results": [
    {{
      "id": 단어ID,
      "english": "현재 영어",
      "korean": "현재 번역",
      "isCorrect": true 또는 false,
      "correctionType": "replace" 또는 "add" 또는 null,
      "suggestedEnglish": "제안 영어 단어",
      "suggestedKorean": "제안 한국어 번역",
      "explanation": "설명"
    }}
  ]
}}

"replace"는 기존 번역이 틀린 경우, "add"는 기존 번역에 의미를 더해야 하는 경우입니다."#
    );

    CompletionRequest {
        messages: vec![
            ChatMessage::system(VALIDATOR_PROMPT),
            ChatMessage::user(prompt),
        ],
        temperature: VALIDATION_TEMPERATURE,
        max_tokens: Some(VALIDATION_MAX_TOKENS),
    }
}

/// Parse model output for `requested`.
///
/// Only invalid JSON is an error. Any other unexpected shape yields
/// [`fallback_validations`].
pub fn parse_word_validations(
    content: &str,
    requested: &[WordToValidate],
) -> Result<Vec<WordValidation>, AiError> {
    let value: Value =
        serde_json::from_str(content).map_err(|e| AiError::MalformedResponse(e.to_string()))?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match (map.remove("result"), map.remove("results")) {
            (Some(Value::Array(items)), _) | (_, Some(Value::Array(items))) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };

    if items.is_empty() {
        tracing::warn!("unexpected word validation response shape, skipping validation");
        return Ok(fallback_validations(requested));
    }

    Ok(items
        .iter()
        .filter_map(|item| match item.as_object() {
            Some(fields) => parse_item(fields),
            None => None,
        })
        .collect())
}

/// Every word reported as correct, used when the model output is unusable.
pub fn fallback_validations(requested: &[WordToValidate]) -> Vec<WordValidation> {
    requested
        .iter()
        .map(|w| WordValidation {
            id: w.id,
            english: w.english.clone(),
            korean: w.korean.clone(),
            is_correct: true,
            correction_type: None,
            suggested_english: w.english.clone(),
            suggested_korean: w.korean.clone(),
            explanation: FALLBACK_EXPLANATION.to_string(),
        })
        .collect()
}

fn parse_item(fields: &Map<String, Value>) -> Option<WordValidation> {
    let Some(id) = fields.get("id").and_then(as_id) else {
        tracing::warn!("dropping word validation item without id");
        return None;
    };

    let english = text(fields, &["english"]).unwrap_or_default();
    let korean = text(fields, &["korean"]).unwrap_or_default();

    Some(WordValidation {
        id,
        is_correct: fields
            .get("isCorrect")
            .or_else(|| fields.get("is_correct"))
            .and_then(Value::as_bool)
            .unwrap_or(true),
        correction_type: text(fields, &["correctionType", "correction_type"])
            .as_deref()
            .and_then(CorrectionType::parse),
        suggested_english: text(fields, &["suggestedEnglish", "suggested_english"])
            .unwrap_or_else(|| english.clone()),
        suggested_korean: text(fields, &["suggestedKorean", "suggested_korean"])
            .unwrap_or_else(|| korean.clone()),
        explanation: text(fields, &["explanation"])
            .unwrap_or_else(|| MISSING_EXPLANATION.to_string()),
        english,
        korean,
    })
}

fn as_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// First non-empty string among `keys`.
fn text(fields: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| fields.get(*key).and_then(Value::as_str))
        .find(|s| !s.trim().is_empty())
        .map(str::to_string)
}
