use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::UserProfile;

/// Insert or refresh a Kakao user and record the login.
///
/// A missing nickname keeps the stored one.
pub async fn upsert_kakao_user<'e, E>(
    executor: E,
    kakao_id: &str,
    nickname: Option<&str>,
) -> Result<UserProfile, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO users (kakao_id, nickname, last_login_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (kakao_id) DO UPDATE
            SET nickname = COALESCE(EXCLUDED.nickname, users.nickname),
                last_login_at = NOW(),
                updated_at = NOW()
            RETURNING id, kakao_id, nickname
        "#,
    )
    .bind(kakao_id)
    .bind(nickname)
    .fetch_one(executor)
    .await
}

pub async fn find_profile_by_id<'e, E>(
    executor: E,
    user_id: Uuid,
) -> Result<Option<UserProfile>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, kakao_id, nickname
            FROM users
            WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(executor)
    .await
}

pub async fn delete_user<'e, E>(executor: E, user_id: Uuid) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        // language=PostgreSQL
        r#"
            DELETE FROM users WHERE id = $1
        "#,
    )
    .bind(user_id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}
