use std::{sync::Arc, time::Duration};

use anyhow::Context;
use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use sqlx::PgPool;
use voca_grading::{AnswerMatcher, RuleTable};

use crate::{
    ApiConfig,
    ai::{AiBoundary, OpenAiModel},
    auth::kakao::{OpenIdClient, create_oidc_client},
    config::Environment,
    error::ApiError,
};

#[derive(Clone)]
pub struct ApiState {
    pub oidc_client: OpenIdClient,
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    pub refresh_token_expiry_days: i64,
    pub oidc_flow_expiry_minutes: i64,
    pub frontend_url: String,
    pub cookie_key: Key,
    pub cookie_domain: String,
    pub pool: PgPool,
    pub environment: Environment,
    pub matcher: Arc<AnswerMatcher>,
    /// `None` when no model API key is configured
    pub ai: Option<AiBoundary>,
}

impl ApiState {
    pub async fn new(config: ApiConfig, pool: PgPool) -> anyhow::Result<Self> {
        let cookie_key = Key::from(config.cookie_secret.as_bytes());

        let oidc_client = create_oidc_client(
            &config.kakao_issuer_url,
            config.kakao_client_id.clone(),
            config.kakao_client_secret.clone(),
            config.redirect_url.clone(),
        )
        .await?;

        let matcher = load_matcher(config.grading_rules_path.as_deref())?;

        let ai = if config.ai_enabled() {
            let model = OpenAiModel::new(
                &config.openai_base_url,
                config.openai_api_key.as_deref().unwrap_or_default(),
                &config.openai_model,
            );
            tracing::info!(model = %config.openai_model, "AI features enabled");
            Some(AiBoundary::new(
                Arc::new(model),
                Duration::from_secs(config.ai_timeout_secs),
                Duration::from_secs(config.ai_validation_timeout_secs),
                config.ai_max_retries,
            ))
        } else {
            tracing::warn!("AI features disabled (OPENAI_API_KEY not set)");
            None
        };

        Ok(Self {
            oidc_client,
            jwt_secret: config.jwt_secret,
            jwt_expiry_hours: config.jwt_expiry_hours,
            refresh_token_expiry_days: config.refresh_token_expiry_days,
            oidc_flow_expiry_minutes: config.oidc_flow_expiry_minutes,
            frontend_url: config.frontend_url,
            cookie_key,
            cookie_domain: config.cookie_domain,
            pool,
            environment: config.env,
            matcher: Arc::new(matcher),
            ai,
        })
    }

    /// The AI boundary, or 503 when AI features are disabled
    pub fn ai(&self) -> Result<&AiBoundary, ApiError> {
        self.ai.as_ref().ok_or(ApiError::AiUnavailable)
    }
}

/// Build the answer matcher, from a JSON rule table when `path` is set.
pub fn load_matcher(path: Option<&str>) -> anyhow::Result<AnswerMatcher> {
    let Some(path) = path else {
        return Ok(AnswerMatcher::korean());
    };

    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read grading rules from {path}"))?;
    let table = RuleTable::from_json(&json).context("invalid grading rule table")?;
    let matcher = AnswerMatcher::new(table).context("invalid grading rule table")?;

    tracing::info!(path, rules = ?matcher.rule_names(), "loaded grading rules");
    Ok(matcher)
}

/// Subset of the state needed to authenticate requests
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

impl FromRef<ApiState> for AuthConfig {
    fn from_ref(state: &ApiState) -> Self {
        Self {
            jwt_secret: state.jwt_secret.clone(),
        }
    }
}

impl FromRef<ApiState> for Key {
    fn from_ref(state: &ApiState) -> Self {
        state.cookie_key.clone()
    }
}
