use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use axum_extra::extract::PrivateCookieJar;
use serde_json::json;
use voca_db::repositories::user as user_repo;

use super::{
    cookies::{self, AUTH_COOKIE, REFRESH_COOKIE},
    jwt, kakao,
    middleware::AuthUser,
    models::{TokenResponse, UserResponse},
    refresh_token as rt,
};
use crate::{ApiState, error::ApiError, metrics::record_auth_event, middleware::rate_limit};

pub fn routes() -> Router<ApiState> {
    use crate::make_rate_limit_layer;

    let session_routes = Router::new()
        .route("/auth/me", get(auth_me))
        .route("/auth/refresh", post(refresh_token))
        .route("/auth/logout", post(logout))
        .layer(make_rate_limit_layer!(
            rate_limit::GENERAL_REPLENISH_MS,
            rate_limit::GENERAL_BURST_SIZE
        ));

    Router::new().merge(kakao::routes()).merge(session_routes)
}

async fn auth_me(
    auth_user: AuthUser,
    State(state): State<ApiState>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = user_repo::find_profile_by_id(&state.pool, auth_user.user_id)
        .await?
        .ok_or_else(|| ApiError::Auth("User not found".to_string()))?;

    Ok(Json(UserResponse {
        id: user.id,
        kakao_id: user.kakao_id,
        nickname: user.nickname,
    }))
}

async fn refresh_token(
    State(state): State<ApiState>,
    jar: PrivateCookieJar,
) -> Result<(PrivateCookieJar, Json<TokenResponse>), ApiError> {
    let old_refresh_token = jar
        .get(REFRESH_COOKIE)
        .ok_or_else(|| ApiError::Auth("No refresh token found".to_string()))?
        .value()
        .to_owned();

    let rotated =
        rt::verify_and_rotate_refresh_token(&state.pool, &old_refresh_token, state.refresh_token_expiry_days)
            .await;
    record_auth_event("refresh", rotated.is_ok());
    let (user_id, new_refresh_token) = rotated?;

    let user = user_repo::find_profile_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| ApiError::Auth("User not found".to_string()))?;

    let token = jwt::generate_jwt_token(
        user.id,
        user.nickname,
        &state.jwt_secret,
        state.jwt_expiry_hours,
    )?;

    let jar = jar
        .add(cookies::create_auth_cookie(
            token.clone(),
            &state.environment,
            state.jwt_expiry_hours,
            &state.cookie_domain,
        ))
        .add(cookies::create_refresh_token_cookie(
            new_refresh_token,
            &state.environment,
            state.refresh_token_expiry_days,
            &state.cookie_domain,
        ));

    Ok((
        jar,
        Json(TokenResponse {
            token,
            message: "Token refreshed successfully".to_string(),
        }),
    ))
}

async fn logout(
    State(state): State<ApiState>,
    jar: PrivateCookieJar,
) -> (PrivateCookieJar, Json<serde_json::Value>) {
    if let Some(refresh_cookie) = jar.get(REFRESH_COOKIE) {
        if let Err(e) = rt::revoke_refresh_token(&state.pool, refresh_cookie.value()).await {
            tracing::warn!(error = %e, "failed to revoke refresh token on logout");
        }
    }

    record_auth_event("logout", true);

    let jar = jar
        .remove(cookies::removal_cookie(AUTH_COOKIE, &state.cookie_domain))
        .remove(cookies::removal_cookie(REFRESH_COOKIE, &state.cookie_domain));

    (jar, Json(json!({ "message": "Logged out successfully" })))
}
