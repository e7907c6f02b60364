use serde::{Deserialize, Serialize};
use validator::Validate;
use voca_db::models::{TestHistoryEntry, Word};

use super::scoring::{TestSummary, percentage, score_label};
use crate::ai::AnswerEvaluation;

/// Largest quiz, both for drawing words and for submitted answers
pub const MAX_QUIZ_SIZE: usize = 500;

#[derive(Debug, Serialize)]
pub struct TestWordsResponse {
    pub group_id: i64,
    pub total_words: usize,
    pub words: Vec<Word>,
}

#[derive(Debug, Deserialize)]
pub struct CheckAnswerRequest {
    pub word_id: i64,
    #[serde(default)]
    pub user_answer: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CheckAnswerResponse {
    pub word_id: i64,
    pub is_correct: bool,
    pub correct_answer: String,
}

#[derive(Debug, Deserialize)]
pub struct AnswerSubmission {
    pub word_id: i64,
    #[serde(default)]
    pub user_answer: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SelfEvaluationRequest {
    pub group_id: i64,
    #[serde(default)]
    pub answers: Vec<AnswerSubmission>,
}

#[derive(Debug, Serialize)]
pub struct QuestionResult {
    pub word_id: i64,
    pub english: String,
    pub user_answer: String,
    pub correct_answer: String,
    pub is_correct: bool,
}

#[derive(Debug, Serialize)]
pub struct SelfEvaluationResponse {
    #[serde(flatten)]
    pub summary: TestSummary,
    pub results: Vec<QuestionResult>,
    pub message: String,
}

/// Tally computed by the client
#[derive(Debug, Deserialize, Validate)]
pub struct TestResultRequest {
    pub group_id: i64,
    #[validate(range(min = 1, message = "total_questions must be at least 1"))]
    pub total_questions: i32,
    #[validate(range(min = 0, message = "correct_answers cannot be negative"))]
    pub correct_answers: i32,
}

#[derive(Debug, Serialize)]
pub struct TestResultResponse {
    #[serde(flatten)]
    pub summary: TestSummary,
    pub message: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AiAnswer {
    pub word_id: i64,
    #[validate(length(min = 1, max = 255, message = "english must be 1 to 255 characters"))]
    pub english: String,
    #[validate(length(min = 1, max = 255, message = "expected must be 1 to 255 characters"))]
    pub expected: String,
    #[serde(default)]
    #[validate(length(max = 255, message = "user_answer must be at most 255 characters"))]
    pub user_answer: String,
}

#[derive(Debug, Deserialize)]
pub struct AiEvaluationRequest {
    pub group_id: i64,
    #[serde(default)]
    pub answers: Vec<AiAnswer>,
}

#[derive(Debug, Serialize)]
pub struct AiEvaluatedAnswer {
    pub word_id: i64,
    pub english: String,
    pub expected: String,
    pub user_answer: String,
    #[serde(flatten)]
    pub evaluation: AnswerEvaluation,
}

#[derive(Debug, Serialize)]
pub struct AiEvaluationResponse {
    #[serde(flatten)]
    pub summary: TestSummary,
    pub evaluations: Vec<AiEvaluatedAnswer>,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct HistoryItem {
    #[serde(flatten)]
    pub entry: TestHistoryEntry,
    pub score: String,
    pub percentage: u32,
}

impl From<TestHistoryEntry> for HistoryItem {
    fn from(entry: TestHistoryEntry) -> Self {
        Self {
            score: score_label(entry.correct_answers, entry.total_questions),
            percentage: percentage(entry.correct_answers, entry.total_questions),
            entry,
        }
    }
}
