use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Public profile of a Kakao-authenticated user
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserProfile {
    pub id: Uuid,
    /// Kakao OpenID subject
    pub kakao_id: String,
    pub nickname: Option<String>,
}

/// Word group owned by a user
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct WordGroup {
    pub id: i64,
    pub user_id: Uuid,
    /// Group name (max 100 chars)
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Group listing row with the number of words it holds
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct GroupSummary {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub word_count: i64,
}

/// English word and its Korean translation.
///
/// `korean` may hold several acceptable meanings separated by commas.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Word {
    pub id: i64,
    pub group_id: i64,
    pub english: String,
    pub korean: String,
    pub created_at: DateTime<Utc>,
}

/// Word joined with the name of its group
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct WordWithGroup {
    pub id: i64,
    pub group_id: i64,
    pub group_name: String,
    pub english: String,
    pub korean: String,
    pub created_at: DateTime<Utc>,
}

/// How a test result was graded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradingMode {
    /// Graded server-side by the answer matcher
    #[serde(rename = "self")]
    SelfGraded,
    /// Tally computed and submitted by the client
    Manual,
    /// Graded by the language model
    Ai,
}

impl GradingMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SelfGraded => "self",
            Self::Manual => "manual",
            Self::Ai => "ai",
        }
    }
}

/// Stored quiz tally
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TestResult {
    pub id: i64,
    pub user_id: Uuid,
    pub group_id: i64,
    pub total_questions: i32,
    pub correct_answers: i32,
    pub grading_mode: String,
    pub test_date: DateTime<Utc>,
}

/// Test history row joined with the group name
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TestHistoryEntry {
    pub id: i64,
    pub group_id: i64,
    pub group_name: String,
    pub total_questions: i32,
    pub correct_answers: i32,
    pub grading_mode: String,
    pub test_date: DateTime<Utc>,
}

/// Per-user key/value setting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Preference {
    #[sqlx(rename = "preference_key")]
    pub key: String,
    #[sqlx(rename = "preference_value")]
    pub value: String,
}

/// Result of an upsert: the stored setting and whether it was newly inserted
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PreferenceUpsert {
    #[sqlx(rename = "preference_key")]
    pub key: String,
    #[sqlx(rename = "preference_value")]
    pub value: String,
    pub created: bool,
}

/// Refresh token row, looked up by hash
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RefreshTokenRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}
