use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::{Word, WordWithGroup};

pub async fn create_word<'e, E>(
    executor: E,
    group_id: i64,
    english: &str,
    korean: &str,
) -> Result<Word, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO words (group_id, english, korean)
            VALUES ($1, $2, $3)
            RETURNING id, group_id, english, korean, created_at
        "#,
    )
    .bind(group_id)
    .bind(english)
    .bind(korean)
    .fetch_one(executor)
    .await
}

pub async fn list_words_for_user<'e, E>(
    executor: E,
    user_id: Uuid,
) -> Result<Vec<WordWithGroup>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT w.id, w.group_id, g.name AS group_name, w.english, w.korean, w.created_at
            FROM words w
            JOIN word_groups g ON g.id = w.group_id
            WHERE g.user_id = $1
            ORDER BY w.created_at DESC, w.id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(executor)
    .await
}

pub async fn list_words_in_group<'e, E>(executor: E, group_id: i64) -> Result<Vec<Word>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, group_id, english, korean, created_at
            FROM words
            WHERE group_id = $1
            ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(group_id)
    .fetch_all(executor)
    .await
}

/// Case-insensitive search over the user's words.
///
/// `pattern` is a complete `ILIKE` pattern with `\` as the escape character.
pub async fn search_words<'e, E>(
    executor: E,
    user_id: Uuid,
    pattern: &str,
) -> Result<Vec<WordWithGroup>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT w.id, w.group_id, g.name AS group_name, w.english, w.korean, w.created_at
            FROM words w
            JOIN word_groups g ON g.id = w.group_id
            WHERE g.user_id = $1
                AND (w.english ILIKE $2 ESCAPE '\' OR w.korean ILIKE $2 ESCAPE '\')
            ORDER BY w.created_at DESC, w.id DESC
        "#,
    )
    .bind(user_id)
    .bind(pattern)
    .fetch_all(executor)
    .await
}

/// Find a word, scoped to the owner of its group.
pub async fn find_word_for_user<'e, E>(
    executor: E,
    user_id: Uuid,
    word_id: i64,
) -> Result<Option<Word>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT w.id, w.group_id, w.english, w.korean, w.created_at
            FROM words w
            JOIN word_groups g ON g.id = w.group_id
            WHERE w.id = $1 AND g.user_id = $2
        "#,
    )
    .bind(word_id)
    .bind(user_id)
    .fetch_optional(executor)
    .await
}

/// Words of one group with the given ids. Ids outside the group are ignored.
pub async fn find_words_in_group<'e, E>(
    executor: E,
    group_id: i64,
    word_ids: &[i64],
) -> Result<Vec<Word>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, group_id, english, korean, created_at
            FROM words
            WHERE group_id = $1 AND id = ANY($2)
        "#,
    )
    .bind(group_id)
    .bind(word_ids)
    .fetch_all(executor)
    .await
}

pub async fn random_words<'e, E>(
    executor: E,
    group_id: i64,
    limit: i64,
) -> Result<Vec<Word>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, group_id, english, korean, created_at
            FROM words
            WHERE group_id = $1
            ORDER BY RANDOM()
            LIMIT $2
        "#,
    )
    .bind(group_id)
    .bind(limit)
    .fetch_all(executor)
    .await
}

pub async fn count_words_in_group<'e, E>(executor: E, group_id: i64) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar("SELECT COUNT(*) FROM words WHERE group_id = $1")
        .bind(group_id)
        .fetch_one(executor)
        .await
}

pub async fn update_word<'e, E>(
    executor: E,
    word_id: i64,
    group_id: i64,
    english: &str,
    korean: &str,
) -> Result<Word, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            UPDATE words
            SET group_id = $1, english = $2, korean = $3
            WHERE id = $4
            RETURNING id, group_id, english, korean, created_at
        "#,
    )
    .bind(group_id)
    .bind(english)
    .bind(korean)
    .bind(word_id)
    .fetch_one(executor)
    .await
}

pub async fn delete_word<'e, E>(executor: E, user_id: Uuid, word_id: i64) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        // language=PostgreSQL
        r#"
            DELETE FROM words w
            USING word_groups g
            WHERE w.id = $1 AND g.id = w.group_id AND g.user_id = $2
        "#,
    )
    .bind(word_id)
    .bind(user_id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

pub async fn delete_words_in_group<'e, E>(executor: E, group_id: i64) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query("DELETE FROM words WHERE group_id = $1")
        .bind(group_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}
