use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::{GradingMode, TestHistoryEntry, TestResult};

pub async fn insert_test_result<'e, E>(
    executor: E,
    user_id: Uuid,
    group_id: i64,
    total_questions: i32,
    correct_answers: i32,
    grading_mode: GradingMode,
) -> Result<TestResult, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO test_results (user_id, group_id, total_questions, correct_answers, grading_mode)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, group_id, total_questions, correct_answers, grading_mode, test_date
        "#,
    )
    .bind(user_id)
    .bind(group_id)
    .bind(total_questions)
    .bind(correct_answers)
    .bind(grading_mode.as_str())
    .fetch_one(executor)
    .await
}

pub async fn list_history<'e, E>(
    executor: E,
    user_id: Uuid,
) -> Result<Vec<TestHistoryEntry>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT t.id, t.group_id, g.name AS group_name, t.total_questions,
                   t.correct_answers, t.grading_mode, t.test_date
            FROM test_results t
            JOIN word_groups g ON g.id = t.group_id
            WHERE t.user_id = $1
            ORDER BY t.test_date DESC, t.id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(executor)
    .await
}

pub async fn list_history_for_group<'e, E>(
    executor: E,
    user_id: Uuid,
    group_id: i64,
) -> Result<Vec<TestHistoryEntry>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT t.id, t.group_id, g.name AS group_name, t.total_questions,
                   t.correct_answers, t.grading_mode, t.test_date
            FROM test_results t
            JOIN word_groups g ON g.id = t.group_id
            WHERE t.user_id = $1 AND t.group_id = $2
            ORDER BY t.test_date DESC, t.id DESC
        "#,
    )
    .bind(user_id)
    .bind(group_id)
    .fetch_all(executor)
    .await
}
