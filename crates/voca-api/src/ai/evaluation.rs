//! AI grading of a single quiz answer.

use serde::{Deserialize, Serialize};

use super::model::{AiError, ChatMessage, CompletionRequest};

const ANSWER_TEMPERATURE: f32 = 0.3;

const GRADER_PROMPT: &str = "당신은 영어 단어 시험을 채점하는 언어 전문가입니다. \
사용자가 입력한 한국어 번역이 정답으로 인정될 수 있는지 평가하고, 틀렸다면 이유를 설명해 주세요. \
띄어쓰기 차이는 무시하고 판정은 너그럽게 합니다. 응답은 JSON 객체로만 작성합니다.";

/// Verdict of the language model for one answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerEvaluation {
    #[serde(alias = "isCorrect")]
    pub is_correct: bool,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub example: String,
    #[serde(default, alias = "exampleTranslation")]
    pub example_translation: String,
}

pub fn answer_evaluation_request(
    english: &str,
    expected: &str,
    user_answer: &str,
) -> CompletionRequest {
    let prompt = format!(
        r#"영어 단어: {english}
정답: {expected}
사용자 답변: {user_answer}

이 답변이 정답으로 인정될 수 있는지 평가해 주세요. 다음 JSON 형식으로 응답해 주세요:
{{
  "isCorrect": true 또는 false,
  "explanation": "평가 설명",
  "example": "단어를 사용한 영어 예문",
  "exampleTranslation": "예문의 한국어 번역"
}}"#
    );

    CompletionRequest {
        messages: vec![ChatMessage::system(GRADER_PROMPT), ChatMessage::user(prompt)],
        temperature: ANSWER_TEMPERATURE,
        max_tokens: None,
    }
}

pub fn parse_answer_evaluation(content: &str) -> Result<AnswerEvaluation, AiError> {
    serde_json::from_str(content).map_err(|e| AiError::MalformedResponse(e.to_string()))
}
