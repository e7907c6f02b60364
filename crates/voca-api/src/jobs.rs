//! Background jobs for periodic maintenance tasks.
//!
//! Refresh tokens are also removed when they are used after expiry; this job
//! catches the ones that are never presented again.

use sqlx::PgPool;
use std::time::Duration;
use tokio::time::interval;

use crate::auth::refresh_token;

const FIRST_RUN_DELAY: Duration = Duration::from_secs(3600);
const TOKEN_CLEANUP_INTERVAL: Duration = Duration::from_secs(21600); // 6 hours

/// Start all background jobs
///
/// Returns the join handles so the caller can abort them on shutdown
pub fn start_background_jobs(pool: PgPool) -> Vec<tokio::task::JoinHandle<()>> {
    vec![tokio::spawn(periodic_token_cleanup_job(pool))]
}

async fn periodic_token_cleanup_job(pool: PgPool) {
    // Wait before the first run to avoid startup contention
    tokio::time::sleep(FIRST_RUN_DELAY).await;

    let mut interval = interval(TOKEN_CLEANUP_INTERVAL);

    loop {
        interval.tick().await;

        match refresh_token::cleanup_expired_tokens(&pool).await {
            Ok(deleted) if deleted > 0 => {
                tracing::info!(deleted, "expired refresh tokens cleaned up");
            }
            Ok(_) => {
                tracing::debug!("token cleanup complete: no expired tokens found");
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to run periodic token cleanup");
            }
        }
    }
}
