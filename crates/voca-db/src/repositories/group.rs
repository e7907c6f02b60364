use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::{GroupSummary, WordGroup};

pub async fn create_group<'e, E>(
    executor: E,
    user_id: Uuid,
    name: &str,
) -> Result<WordGroup, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO word_groups (user_id, name)
            VALUES ($1, $2)
            RETURNING id, user_id, name, created_at
        "#,
    )
    .bind(user_id)
    .bind(name)
    .fetch_one(executor)
    .await
}

pub async fn list_groups<'e, E>(executor: E, user_id: Uuid) -> Result<Vec<GroupSummary>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT g.id, g.name, g.created_at, COUNT(w.id) AS word_count
            FROM word_groups g
            LEFT JOIN words w ON w.group_id = g.id
            WHERE g.user_id = $1
            GROUP BY g.id
            ORDER BY g.created_at DESC, g.id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(executor)
    .await
}

/// Find a group, scoped to its owner.
pub async fn find_group<'e, E>(
    executor: E,
    user_id: Uuid,
    group_id: i64,
) -> Result<Option<WordGroup>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, user_id, name, created_at
            FROM word_groups
            WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(group_id)
    .bind(user_id)
    .fetch_optional(executor)
    .await
}

pub async fn group_belongs_to_user<'e, E>(
    executor: E,
    user_id: Uuid,
    group_id: i64,
) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT EXISTS(SELECT 1 FROM word_groups WHERE id = $1 AND user_id = $2)
        "#,
    )
    .bind(group_id)
    .bind(user_id)
    .fetch_one(executor)
    .await
}

pub async fn rename_group<'e, E>(
    executor: E,
    user_id: Uuid,
    group_id: i64,
    name: &str,
) -> Result<Option<WordGroup>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            UPDATE word_groups
            SET name = $1
            WHERE id = $2 AND user_id = $3
            RETURNING id, user_id, name, created_at
        "#,
    )
    .bind(name)
    .bind(group_id)
    .bind(user_id)
    .fetch_optional(executor)
    .await
}

pub async fn delete_group<'e, E>(
    executor: E,
    user_id: Uuid,
    group_id: i64,
) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        // language=PostgreSQL
        r#"
            DELETE FROM word_groups WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(group_id)
    .bind(user_id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}
