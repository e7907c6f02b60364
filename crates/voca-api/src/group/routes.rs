use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use serde_json::json;
use voca_db::{
    models::GroupSummary,
    repositories::{group as group_repo, word as word_repo},
};

use super::{
    corrections::apply_correction,
    model::{
        GroupDetail, GroupRequest, GroupResponse, GroupValidationResponse, UpdateWordsRequest,
        UpdateWordsResponse,
    },
};
use crate::{
    ApiState,
    ai::WordToValidate,
    auth::AuthUser,
    error::ApiError,
    middleware::rate_limit,
    validation::{validate_english, validate_group_name, validate_korean},
};

pub fn routes() -> Router<ApiState> {
    use crate::make_rate_limit_layer;

    let group_routes = Router::new()
        .route("/groups", get(list_groups).post(create_group))
        .route(
            "/groups/{id}",
            get(get_group).put(rename_group).delete(delete_group),
        )
        .route("/groups/{id}/update-words", post(update_words))
        .layer(make_rate_limit_layer!(
            rate_limit::GENERAL_REPLENISH_MS,
            rate_limit::GENERAL_BURST_SIZE
        ));

    let ai_routes = Router::new()
        .route("/groups/{id}/validate", get(validate_group))
        .layer(make_rate_limit_layer!(
            rate_limit::AI_REPLENISH_MS,
            rate_limit::AI_BURST_SIZE
        ));

    Router::new().merge(group_routes).merge(ai_routes)
}

fn group_not_found() -> ApiError {
    ApiError::NotFound("Group not found".to_string())
}

async fn create_group(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Json(payload): Json<GroupRequest>,
) -> Result<(StatusCode, Json<GroupResponse>), ApiError> {
    let name = validate_group_name(&payload.name)?;

    let group = group_repo::create_group(&state.pool, auth_user.user_id, &name).await?;

    Ok((
        StatusCode::CREATED,
        Json(GroupResponse {
            id: group.id,
            name: group.name,
            message: "Group created successfully".to_string(),
        }),
    ))
}

async fn list_groups(
    auth_user: AuthUser,
    State(state): State<ApiState>,
) -> Result<Json<Vec<GroupSummary>>, ApiError> {
    let groups = group_repo::list_groups(&state.pool, auth_user.user_id).await?;
    Ok(Json(groups))
}

async fn get_group(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Path(group_id): Path<i64>,
) -> Result<Json<GroupDetail>, ApiError> {
    let group = group_repo::find_group(&state.pool, auth_user.user_id, group_id)
        .await?
        .ok_or_else(group_not_found)?;

    let words = word_repo::list_words_in_group(&state.pool, group.id).await?;

    Ok(Json(GroupDetail {
        id: group.id,
        name: group.name,
        created_at: group.created_at,
        words,
    }))
}

async fn rename_group(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Path(group_id): Path<i64>,
    Json(payload): Json<GroupRequest>,
) -> Result<Json<GroupResponse>, ApiError> {
    let name = validate_group_name(&payload.name)?;

    let group = group_repo::rename_group(&state.pool, auth_user.user_id, group_id, &name)
        .await?
        .ok_or_else(group_not_found)?;

    Ok(Json(GroupResponse {
        id: group.id,
        name: group.name,
        message: "Group updated successfully".to_string(),
    }))
}

async fn delete_group(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Path(group_id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut tx = state.pool.begin().await?;

    if !group_repo::group_belongs_to_user(&mut *tx, auth_user.user_id, group_id).await? {
        return Err(group_not_found());
    }

    let deleted_words = word_repo::delete_words_in_group(&mut *tx, group_id).await?;
    group_repo::delete_group(&mut *tx, auth_user.user_id, group_id).await?;

    tx.commit().await?;

    tracing::info!(group_id, deleted_words, "group deleted");

    Ok(Json(json!({
        "message": "Group deleted successfully",
        "id": group_id,
        "deleted_words": deleted_words,
    })))
}

/// Ask the model to review every word of a group, returning only the flagged ones
async fn validate_group(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Path(group_id): Path<i64>,
) -> Result<Json<GroupValidationResponse>, ApiError> {
    let ai = state.ai()?;

    let group = group_repo::find_group(&state.pool, auth_user.user_id, group_id)
        .await?
        .ok_or_else(group_not_found)?;

    let words = word_repo::list_words_in_group(&state.pool, group.id).await?;
    if words.is_empty() {
        return Err(ApiError::NotFound("Group has no words".to_string()));
    }

    let to_validate: Vec<WordToValidate> = words
        .into_iter()
        .map(|w| WordToValidate {
            id: w.id,
            english: w.english,
            korean: w.korean,
        })
        .collect();

    let problems: Vec<_> = ai
        .validate_words(&to_validate)
        .await?
        .into_iter()
        .filter(|result| !result.is_correct)
        .collect();

    tracing::info!(
        group_id,
        total_words = to_validate.len(),
        problem_count = problems.len(),
        "group validated"
    );

    Ok(Json(GroupValidationResponse {
        group_id: group.id,
        group_name: group.name,
        total_words: to_validate.len(),
        problem_count: problems.len(),
        results: problems,
    }))
}

/// Apply user-accepted corrections in one transaction.
///
/// Corrections for words outside the group, without an id, or without any
/// change are skipped.
async fn update_words(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Path(group_id): Path<i64>,
    Json(payload): Json<UpdateWordsRequest>,
) -> Result<Json<UpdateWordsResponse>, ApiError> {
    let mut tx = state.pool.begin().await?;

    if !group_repo::group_belongs_to_user(&mut *tx, auth_user.user_id, group_id).await? {
        return Err(group_not_found());
    }

    let ids: Vec<i64> = payload.words.iter().filter_map(|c| c.id).collect();
    let words: HashMap<i64, _> = word_repo::find_words_in_group(&mut *tx, group_id, &ids)
        .await?
        .into_iter()
        .map(|w| (w.id, w))
        .collect();

    let mut updated_words = Vec::new();

    for correction in &payload.words {
        let Some(word) = correction.id.and_then(|id| words.get(&id)) else {
            continue;
        };

        let Some(updated) = apply_correction(word.id, &word.english, &word.korean, correction)
        else {
            continue;
        };

        let english = validate_english(&updated.new_english)?;
        let korean = validate_korean(&updated.new_korean)?;
        word_repo::update_word(&mut *tx, word.id, group_id, &english, &korean).await?;

        updated_words.push(updated);
    }

    tx.commit().await?;

    let updated_count = updated_words.len();
    tracing::info!(group_id, updated_count, "applied word corrections");

    Ok(Json(UpdateWordsResponse {
        group_id,
        updated_count,
        updated_words,
        message: format!("{updated_count} words updated"),
    }))
}
