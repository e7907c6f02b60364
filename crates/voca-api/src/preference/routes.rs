use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use serde::Deserialize;
use voca_db::{
    models::{Preference, PreferenceUpsert},
    repositories::preference as preference_repo,
};

use crate::{
    ApiState,
    auth::AuthUser,
    error::ApiError,
    middleware::rate_limit,
    validation::{validate_preference_key, validate_preference_value},
};

pub fn routes() -> Router<ApiState> {
    use crate::make_rate_limit_layer;

    Router::new()
        .route("/preferences", get(list_preferences))
        .route(
            "/preferences/{key}",
            get(get_preference).post(set_preference),
        )
        .layer(make_rate_limit_layer!(
            rate_limit::GENERAL_REPLENISH_MS,
            rate_limit::GENERAL_BURST_SIZE
        ))
}

#[derive(Debug, Deserialize)]
struct PreferenceRequest {
    #[serde(default)]
    value: String,
}

async fn list_preferences(
    auth_user: AuthUser,
    State(state): State<ApiState>,
) -> Result<Json<Vec<Preference>>, ApiError> {
    let preferences = preference_repo::list_preferences(&state.pool, auth_user.user_id).await?;
    Ok(Json(preferences))
}

async fn get_preference(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Path(key): Path<String>,
) -> Result<Json<Preference>, ApiError> {
    validate_preference_key(&key)?;

    let preference = preference_repo::find_preference(&state.pool, auth_user.user_id, &key)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Preference '{key}' not found")))?;

    Ok(Json(preference))
}

/// Insert or overwrite a setting
async fn set_preference(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Path(key): Path<String>,
    Json(payload): Json<PreferenceRequest>,
) -> Result<Json<PreferenceUpsert>, ApiError> {
    validate_preference_key(&key)?;
    validate_preference_value(&payload.value)?;

    let stored =
        preference_repo::upsert_preference(&state.pool, auth_user.user_id, &key, &payload.value)
            .await?;

    tracing::debug!(key = %stored.key, created = stored.created, "preference saved");

    Ok(Json(stored))
}
