use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::{Preference, PreferenceUpsert};

pub async fn list_preferences<'e, E>(
    executor: E,
    user_id: Uuid,
) -> Result<Vec<Preference>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT preference_key, preference_value
            FROM user_preferences
            WHERE user_id = $1
            ORDER BY preference_key
        "#,
    )
    .bind(user_id)
    .fetch_all(executor)
    .await
}

pub async fn find_preference<'e, E>(
    executor: E,
    user_id: Uuid,
    key: &str,
) -> Result<Option<Preference>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT preference_key, preference_value
            FROM user_preferences
            WHERE user_id = $1 AND preference_key = $2
        "#,
    )
    .bind(user_id)
    .bind(key)
    .fetch_optional(executor)
    .await
}

/// Insert or overwrite a setting. `created` is true when no row existed.
pub async fn upsert_preference<'e, E>(
    executor: E,
    user_id: Uuid,
    key: &str,
    value: &str,
) -> Result<PreferenceUpsert, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO user_preferences (user_id, preference_key, preference_value)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, preference_key) DO UPDATE
            SET preference_value = EXCLUDED.preference_value,
                updated_at = NOW()
            RETURNING preference_key, preference_value, (xmax = 0) AS created
        "#,
    )
    .bind(user_id)
    .bind(key)
    .bind(value)
    .fetch_one(executor)
    .await
}
