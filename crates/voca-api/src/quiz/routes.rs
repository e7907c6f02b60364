use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use uuid::Uuid;
use validator::Validate;
use voca_db::{
    models::GradingMode,
    repositories::{group as group_repo, test_result as result_repo, word as word_repo},
};

use super::{
    model::{
        AiEvaluatedAnswer, AiEvaluationRequest, AiEvaluationResponse, CheckAnswerRequest,
        CheckAnswerResponse, HistoryItem, MAX_QUIZ_SIZE, QuestionResult, SelfEvaluationRequest,
        SelfEvaluationResponse, TestResultRequest, TestResultResponse, TestWordsResponse,
    },
    scoring::TestSummary,
};
use crate::{
    ApiState, auth::AuthUser, error::ApiError, metrics::record_answer_evaluation,
    middleware::rate_limit,
};

pub fn routes() -> Router<ApiState> {
    use crate::make_rate_limit_layer;

    let quiz_routes = Router::new()
        .route("/tests/words/{group_id}/{count}", get(test_words))
        .route("/tests/check-answer", post(check_answer))
        .route("/tests/self-evaluation", post(self_evaluation))
        .route("/tests/results", post(save_result))
        .route("/tests/history", get(history))
        .route("/tests/history/{group_id}", get(group_history))
        .layer(make_rate_limit_layer!(
            rate_limit::GENERAL_REPLENISH_MS,
            rate_limit::GENERAL_BURST_SIZE
        ));

    let ai_routes = Router::new()
        .route("/tests/ai-evaluation", post(ai_evaluation))
        .layer(make_rate_limit_layer!(
            rate_limit::AI_REPLENISH_MS,
            rate_limit::AI_BURST_SIZE
        ));

    Router::new().merge(quiz_routes).merge(ai_routes)
}

async fn ensure_group_owned(state: &ApiState, user_id: Uuid, group_id: i64) -> Result<(), ApiError> {
    if group_repo::group_belongs_to_user(&state.pool, user_id, group_id).await? {
        Ok(())
    } else {
        Err(ApiError::NotFound("Group not found".to_string()))
    }
}

fn check_answer_count(count: usize) -> Result<i32, ApiError> {
    if count == 0 {
        return Err(ApiError::Validation("answers must not be empty".to_string()));
    }
    if count > MAX_QUIZ_SIZE {
        return Err(ApiError::Validation(format!(
            "at most {MAX_QUIZ_SIZE} answers can be submitted"
        )));
    }
    Ok(count as i32)
}

/// Draw up to `count` random words from a group
async fn test_words(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Path((group_id, count)): Path<(i64, i64)>,
) -> Result<Json<TestWordsResponse>, ApiError> {
    if !(1..=MAX_QUIZ_SIZE as i64).contains(&count) {
        return Err(ApiError::Validation(format!(
            "count must be between 1 and {MAX_QUIZ_SIZE}"
        )));
    }

    ensure_group_owned(&state, auth_user.user_id, group_id).await?;

    let words = word_repo::random_words(&state.pool, group_id, count).await?;
    if words.is_empty() {
        return Err(ApiError::NotFound("Group has no words".to_string()));
    }

    Ok(Json(TestWordsResponse {
        group_id,
        total_words: words.len(),
        words,
    }))
}

/// Grade a single answer with the answer matcher
async fn check_answer(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Json(payload): Json<CheckAnswerRequest>,
) -> Result<Json<CheckAnswerResponse>, ApiError> {
    let word = word_repo::find_word_for_user(&state.pool, auth_user.user_id, payload.word_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Word not found".to_string()))?;

    let user_answer = payload.user_answer.unwrap_or_default();
    let is_correct = grade(&state, word.id, &user_answer, &word.korean);

    Ok(Json(CheckAnswerResponse {
        word_id: word.id,
        is_correct,
        correct_answer: word.korean,
    }))
}

fn grade(state: &ApiState, word_id: i64, user_answer: &str, reference: &str) -> bool {
    let matched_rule = state.matcher.matched_rule(user_answer, &[reference]);
    tracing::debug!(word_id, ?matched_rule, "graded answer");

    let is_correct = matched_rule.is_some();
    record_answer_evaluation("self", is_correct);
    is_correct
}

/// Grade a whole quiz server-side and store the tally
async fn self_evaluation(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Json(payload): Json<SelfEvaluationRequest>,
) -> Result<(StatusCode, Json<SelfEvaluationResponse>), ApiError> {
    let total_questions = check_answer_count(payload.answers.len())?;
    ensure_group_owned(&state, auth_user.user_id, payload.group_id).await?;

    let ids: Vec<i64> = payload.answers.iter().map(|a| a.word_id).collect();
    let words: HashMap<i64, _> = word_repo::find_words_in_group(&state.pool, payload.group_id, &ids)
        .await?
        .into_iter()
        .map(|w| (w.id, w))
        .collect();

    let mut results = Vec::with_capacity(payload.answers.len());
    for answer in payload.answers {
        let word = words.get(&answer.word_id).ok_or_else(|| {
            ApiError::NotFound(format!("Word {} not found in group", answer.word_id))
        })?;

        let user_answer = answer.user_answer.unwrap_or_default();
        let is_correct = grade(&state, word.id, &user_answer, &word.korean);

        results.push(QuestionResult {
            word_id: word.id,
            english: word.english.clone(),
            user_answer,
            correct_answer: word.korean.clone(),
            is_correct,
        });
    }

    let correct_answers = results.iter().filter(|r| r.is_correct).count() as i32;

    let result = result_repo::insert_test_result(
        &state.pool,
        auth_user.user_id,
        payload.group_id,
        total_questions,
        correct_answers,
        GradingMode::SelfGraded,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(SelfEvaluationResponse {
            summary: TestSummary::new(&result, GradingMode::SelfGraded),
            results,
            message: "Test graded successfully".to_string(),
        }),
    ))
}

/// Store a tally computed by the client
async fn save_result(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Json(payload): Json<TestResultRequest>,
) -> Result<(StatusCode, Json<TestResultResponse>), ApiError> {
    payload.validate()?;
    if payload.correct_answers > payload.total_questions {
        return Err(ApiError::Validation(
            "correct_answers cannot exceed total_questions".to_string(),
        ));
    }

    ensure_group_owned(&state, auth_user.user_id, payload.group_id).await?;

    let result = result_repo::insert_test_result(
        &state.pool,
        auth_user.user_id,
        payload.group_id,
        payload.total_questions,
        payload.correct_answers,
        GradingMode::Manual,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(TestResultResponse {
            summary: TestSummary::new(&result, GradingMode::Manual),
            message: "Test result saved successfully".to_string(),
        }),
    ))
}

/// Grade every answer with the language model and store the tally
async fn ai_evaluation(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Json(payload): Json<AiEvaluationRequest>,
) -> Result<(StatusCode, Json<AiEvaluationResponse>), ApiError> {
    let ai = state.ai()?;

    let total_questions = check_answer_count(payload.answers.len())?;
    for answer in &payload.answers {
        answer.validate()?;
    }

    ensure_group_owned(&state, auth_user.user_id, payload.group_id).await?;

    let mut evaluations = Vec::with_capacity(payload.answers.len());
    for answer in payload.answers {
        let evaluation = ai
            .evaluate_answer(&answer.english, &answer.expected, &answer.user_answer)
            .await?;
        record_answer_evaluation("ai", evaluation.is_correct);

        evaluations.push(AiEvaluatedAnswer {
            word_id: answer.word_id,
            english: answer.english,
            expected: answer.expected,
            user_answer: answer.user_answer,
            evaluation,
        });
    }

    let correct_answers = evaluations.iter().filter(|e| e.evaluation.is_correct).count() as i32;

    let result = result_repo::insert_test_result(
        &state.pool,
        auth_user.user_id,
        payload.group_id,
        total_questions,
        correct_answers,
        GradingMode::Ai,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(AiEvaluationResponse {
            summary: TestSummary::new(&result, GradingMode::Ai),
            evaluations,
            message: "AI grading completed".to_string(),
        }),
    ))
}

async fn history(
    auth_user: AuthUser,
    State(state): State<ApiState>,
) -> Result<Json<Vec<HistoryItem>>, ApiError> {
    let entries = result_repo::list_history(&state.pool, auth_user.user_id).await?;
    Ok(Json(entries.into_iter().map(HistoryItem::from).collect()))
}

async fn group_history(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Path(group_id): Path<i64>,
) -> Result<Json<Vec<HistoryItem>>, ApiError> {
    ensure_group_owned(&state, auth_user.user_id, group_id).await?;

    let entries =
        result_repo::list_history_for_group(&state.pool, auth_user.user_id, group_id).await?;
    Ok(Json(entries.into_iter().map(HistoryItem::from).collect()))
}
