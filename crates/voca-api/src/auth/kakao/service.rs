use sqlx::PgPool;
use voca_db::{models::UserProfile, repositories::user as user_repo};

use crate::error::ApiError;

/// Find or create the user for a Kakao subject.
///
/// Existing users get their nickname refreshed when Kakao sends one, and
/// their last login time updated.
pub async fn find_or_create_kakao_user(
    pool: &PgPool,
    kakao_id: &str,
    nickname: Option<&str>,
) -> Result<UserProfile, ApiError> {
    let nickname = nickname.map(str::trim).filter(|n| !n.is_empty());

    let user = user_repo::upsert_kakao_user(pool, kakao_id, nickname).await?;
    tracing::info!(user_id = %user.id, "kakao user signed in");

    Ok(user)
}
