use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use voca_db::{
    models::{Word, WordWithGroup},
    repositories::{group as group_repo, word as word_repo},
};

use crate::{
    ApiState,
    auth::AuthUser,
    error::ApiError,
    middleware::rate_limit,
    validation::{validate_english, validate_korean},
};

pub fn routes() -> Router<ApiState> {
    use crate::make_rate_limit_layer;

    Router::new()
        .route("/words", get(list_words).post(create_word))
        .route("/words/search", get(search_words))
        .route("/words/group/{group_id}", get(list_group_words))
        .route("/words/{id}", put(update_word).delete(delete_word))
        .layer(make_rate_limit_layer!(
            rate_limit::GENERAL_REPLENISH_MS,
            rate_limit::GENERAL_BURST_SIZE
        ))
}

#[derive(Debug, Deserialize)]
struct WordRequest {
    group_id: Option<i64>,
    #[serde(default)]
    english: String,
    #[serde(default)]
    korean: String,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    keyword: Option<String>,
}

async fn ensure_group_owned(state: &ApiState, user_id: Uuid, group_id: i64) -> Result<(), ApiError> {
    if group_repo::group_belongs_to_user(&state.pool, user_id, group_id).await? {
        Ok(())
    } else {
        Err(ApiError::NotFound("Group not found".to_string()))
    }
}

async fn create_word(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Json(payload): Json<WordRequest>,
) -> Result<(StatusCode, Json<Word>), ApiError> {
    let group_id = payload
        .group_id
        .ok_or_else(|| ApiError::Validation("group_id is required".to_string()))?;
    let english = validate_english(&payload.english)?;
    let korean = validate_korean(&payload.korean)?;

    ensure_group_owned(&state, auth_user.user_id, group_id).await?;

    let word = word_repo::create_word(&state.pool, group_id, &english, &korean).await?;

    Ok((StatusCode::CREATED, Json(word)))
}

async fn list_words(
    auth_user: AuthUser,
    State(state): State<ApiState>,
) -> Result<Json<Vec<WordWithGroup>>, ApiError> {
    let words = word_repo::list_words_for_user(&state.pool, auth_user.user_id).await?;
    Ok(Json(words))
}

async fn list_group_words(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Path(group_id): Path<i64>,
) -> Result<Json<Vec<Word>>, ApiError> {
    ensure_group_owned(&state, auth_user.user_id, group_id).await?;

    let words = word_repo::list_words_in_group(&state.pool, group_id).await?;
    Ok(Json(words))
}

async fn search_words(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<WordWithGroup>>, ApiError> {
    let keyword = query
        .keyword
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .ok_or_else(|| ApiError::Validation("keyword is required".to_string()))?;

    let words =
        word_repo::search_words(&state.pool, auth_user.user_id, &contains_pattern(keyword)).await?;
    Ok(Json(words))
}

async fn update_word(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Path(word_id): Path<i64>,
    Json(payload): Json<WordRequest>,
) -> Result<Json<Word>, ApiError> {
    let english = validate_english(&payload.english)?;
    let korean = validate_korean(&payload.korean)?;

    let word = word_repo::find_word_for_user(&state.pool, auth_user.user_id, word_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Word not found".to_string()))?;

    let group_id = payload.group_id.unwrap_or(word.group_id);
    if group_id != word.group_id {
        ensure_group_owned(&state, auth_user.user_id, group_id).await?;
    }

    let word = word_repo::update_word(&state.pool, word.id, group_id, &english, &korean).await?;
    Ok(Json(word))
}

async fn delete_word(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Path(word_id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let rows = word_repo::delete_word(&state.pool, auth_user.user_id, word_id).await?;
    if rows == 0 {
        return Err(ApiError::NotFound("Word not found".to_string()));
    }

    Ok(Json(json!({
        "message": "Word deleted successfully",
        "id": word_id,
    })))
}

/// `ILIKE` pattern matching `keyword` anywhere, with wildcards escaped
fn contains_pattern(keyword: &str) -> String {
    let mut pattern = String::with_capacity(keyword.len() + 2);
    pattern.push('%');
    for c in keyword.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
