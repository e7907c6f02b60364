//! Rotating refresh tokens.
//!
//! The client receives 32 random bytes encoded as base64url; only the SHA-256
//! hex digest is stored. Every use deletes the presented token and issues a
//! new one inside a single transaction.

use base64::Engine;
use chrono::Utc;
use rand::Rng;
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;
use voca_db::repositories::token as token_repo;

use crate::error::ApiError;

/// Generate a token, returning `(token for the client, hash for the database)`
pub fn generate_refresh_token() -> (String, String) {
    let mut token_bytes = [0u8; 32];
    rand::thread_rng().fill(&mut token_bytes);

    let token = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(token_bytes);
    let token_hash = hash_refresh_token(&token);

    (token, token_hash)
}

pub fn hash_refresh_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Generate and store a new token for `user_id`, returning the client value
pub async fn issue_refresh_token(
    pool: &PgPool,
    user_id: Uuid,
    expiry_days: i64,
) -> Result<String, ApiError> {
    let (token, token_hash) = generate_refresh_token();
    let expires_at = Utc::now() + chrono::Duration::days(expiry_days);

    token_repo::store_refresh_token(pool, user_id, &token_hash, expires_at).await?;

    Ok(token)
}

/// Consume `token` and issue its replacement.
///
/// Returns the owning user and the new client token.
pub async fn verify_and_rotate_refresh_token(
    pool: &PgPool,
    token: &str,
    expiry_days: i64,
) -> Result<(Uuid, String), ApiError> {
    let token_hash = hash_refresh_token(token);

    let mut tx = pool.begin().await?;

    let record = token_repo::find_refresh_token_by_hash(&mut *tx, &token_hash)
        .await?
        .ok_or_else(|| ApiError::Auth("Invalid refresh token".to_string()))?;

    token_repo::delete_refresh_token(&mut *tx, record.id).await?;

    if record.expires_at < Utc::now() {
        tx.commit().await?;
        return Err(ApiError::Auth("Refresh token expired".to_string()));
    }

    let (new_token, new_token_hash) = generate_refresh_token();
    let new_expires_at = Utc::now() + chrono::Duration::days(expiry_days);

    token_repo::store_refresh_token(&mut *tx, record.user_id, &new_token_hash, new_expires_at)
        .await?;

    tx.commit().await?;

    Ok((record.user_id, new_token))
}

/// Delete `token`. Unknown tokens are not an error.
pub async fn revoke_refresh_token(pool: &PgPool, token: &str) -> Result<bool, ApiError> {
    let rows = token_repo::delete_refresh_token_by_hash(pool, &hash_refresh_token(token)).await?;
    Ok(rows > 0)
}

pub async fn cleanup_expired_tokens(pool: &PgPool) -> Result<u64, ApiError> {
    Ok(token_repo::cleanup_expired_refresh_tokens(pool).await?)
}
