use axum::Router;

use crate::{auth, group, preference, quiz, state::ApiState, word};

/// V1 API routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .merge(auth::routes())
        .merge(group::routes())
        .merge(word::routes())
        .merge(quiz::routes())
        .merge(preference::routes())
}
