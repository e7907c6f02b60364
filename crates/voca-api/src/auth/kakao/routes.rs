use axum::{
    Router,
    extract::{Query, State},
    response::Redirect,
    routing::get,
};
use axum_extra::extract::PrivateCookieJar;
use oauth2::{AuthorizationCode, CsrfToken, PkceCodeChallenge, PkceCodeVerifier, Scope};
use openidconnect::{AuthenticationFlow, Nonce, TokenResponse, core::CoreResponseType};
use serde::Deserialize;

use super::service;
use crate::{
    ApiState,
    auth::{
        cookies::{self, OIDC_FLOW_COOKIE},
        jwt,
        models::OidcFlowData,
        refresh_token as rt,
    },
    error::ApiError,
    metrics::record_auth_event,
    middleware::rate_limit,
};

pub fn routes() -> Router<ApiState> {
    use crate::make_rate_limit_layer;

    Router::new()
        .route("/auth/kakao", get(kakao_auth))
        .route("/auth/kakao/callback", get(kakao_callback))
        .layer(make_rate_limit_layer!(
            rate_limit::GENERAL_REPLENISH_MS,
            rate_limit::GENERAL_BURST_SIZE
        ))
}

async fn kakao_auth(
    State(state): State<ApiState>,
    jar: PrivateCookieJar,
) -> Result<(PrivateCookieJar, Redirect), ApiError> {
    let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

    let (auth_url, csrf_token, nonce) = state
        .oidc_client
        .authorize_url(
            AuthenticationFlow::<CoreResponseType>::AuthorizationCode,
            CsrfToken::new_random,
            Nonce::new_random,
        )
        .add_scope(Scope::new("profile_nickname".to_string()))
        .set_pkce_challenge(pkce_challenge)
        .url();

    let oidc_data = OidcFlowData {
        csrf_token: csrf_token.secret().clone(),
        nonce: nonce.secret().clone(),
        pkce_verifier: pkce_verifier.secret().clone(),
    };

    let oidc_json = serde_json::to_string(&oidc_data)
        .map_err(|e| ApiError::Cookie(format!("Failed to serialize OIDC data: {e}")))?;

    let jar = jar.add(cookies::create_oidc_flow_cookie(
        oidc_json,
        &state.environment,
        state.oidc_flow_expiry_minutes,
        &state.cookie_domain,
    ));

    Ok((jar, Redirect::to(auth_url.as_str())))
}

/// Kakao sends `error` instead of `code` when the user cancels
#[derive(Debug, Deserialize)]
struct AuthRequest {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

/// Finish the login and send the browser back to the frontend.
///
/// Failures never surface as JSON here since the caller is a browser
/// redirect; they land on the frontend login page instead.
async fn kakao_callback(
    State(state): State<ApiState>,
    jar: PrivateCookieJar,
    Query(query): Query<AuthRequest>,
) -> (PrivateCookieJar, Redirect) {
    let frontend_url = state.frontend_url.trim_end_matches('/').to_string();
    let flow_cookie = jar.get(OIDC_FLOW_COOKIE);
    let jar = jar.remove(cookies::removal_cookie(
        OIDC_FLOW_COOKIE,
        &state.cookie_domain,
    ));

    let flow = flow_cookie.map(|cookie| cookie.value().to_owned());

    match complete_login(&state, flow.as_deref(), query).await {
        Ok(session) => {
            record_auth_event("login", true);

            let jar = jar
                .add(cookies::create_auth_cookie(
                    session.token.clone(),
                    &state.environment,
                    state.jwt_expiry_hours,
                    &state.cookie_domain,
                ))
                .add(cookies::create_refresh_token_cookie(
                    session.refresh_token,
                    &state.environment,
                    state.refresh_token_expiry_days,
                    &state.cookie_domain,
                ));

            (
                jar,
                Redirect::to(&format!("{frontend_url}/?token={}", session.token)),
            )
        }
        Err(e) => {
            record_auth_event("login", false);
            tracing::warn!(error = %e, "kakao login failed");

            (
                jar,
                Redirect::to(&format!("{frontend_url}/login?error=auth_failed")),
            )
        }
    }
}

struct Session {
    token: String,
    refresh_token: String,
}

async fn complete_login(
    state: &ApiState,
    flow: Option<&str>,
    query: AuthRequest,
) -> Result<Session, ApiError> {
    if let Some(error) = query.error {
        return Err(ApiError::Oidc(format!("Authorization denied: {error}")));
    }

    let flow = flow.ok_or_else(|| ApiError::Cookie("No OIDC flow cookie found".to_string()))?;
    let oidc_data: OidcFlowData = serde_json::from_str(flow)
        .map_err(|e| ApiError::Cookie(format!("Failed to parse OIDC data: {e}")))?;

    if query.state.as_deref() != Some(oidc_data.csrf_token.as_str()) {
        return Err(ApiError::Cookie("Invalid CSRF token".to_string()));
    }

    let code = query
        .code
        .ok_or_else(|| ApiError::Oidc("Missing authorization code".to_string()))?;

    let token_response = state
        .oidc_client
        .exchange_code(AuthorizationCode::new(code))
        .map_err(|e| ApiError::Oidc(format!("Token exchange failed: {e}")))?
        .set_pkce_verifier(PkceCodeVerifier::new(oidc_data.pkce_verifier))
        .request_async(&reqwest::Client::new())
        .await
        .map_err(|e| ApiError::Oidc(format!("Token exchange failed: {e}")))?;

    let id_token = token_response
        .id_token()
        .ok_or_else(|| ApiError::InvalidIdToken("No ID token in response".to_string()))?;

    let id_token_verifier = state.oidc_client.id_token_verifier();
    let claims = id_token
        .claims(&id_token_verifier, &Nonce::new(oidc_data.nonce))
        .map_err(|e| ApiError::InvalidIdToken(format!("ID token verification failed: {e}")))?;

    let kakao_id = claims.subject().to_string();
    let nickname = claims
        .nickname()
        .and_then(|n| n.get(None))
        .map(|n| n.to_string());

    let user = service::find_or_create_kakao_user(&state.pool, &kakao_id, nickname.as_deref()).await?;

    let token = jwt::generate_jwt_token(
        user.id,
        user.nickname.clone(),
        &state.jwt_secret,
        state.jwt_expiry_hours,
    )?;
    let refresh_token =
        rt::issue_refresh_token(&state.pool, user.id, state.refresh_token_expiry_days).await?;

    Ok(Session {
        token,
        refresh_token,
    })
}
