//! Application configuration loaded from environment variables.

use std::fmt;

use serde::Deserialize;

/// Deployment environment
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub const fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Minimum length of `JWT_SECRET` in bytes
pub const MIN_JWT_SECRET_LEN: usize = 32;
/// Minimum length of `COOKIE_SECRET` in bytes (required by the private cookie key)
pub const MIN_COOKIE_SECRET_LEN: usize = 64;

#[derive(Clone, Debug, Deserialize)]
pub struct ApiConfig {
    // Required
    pub database_url: String,
    pub jwt_secret: String,
    pub cookie_secret: String,
    pub kakao_client_id: String,
    pub kakao_client_secret: String,
    pub redirect_url: String,
    pub frontend_url: String,

    // Server
    #[serde(default)]
    pub env: Environment,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Comma-separated list, defaults to the frontend URL
    #[serde(default)]
    pub allowed_origins: Option<String>,
    #[serde(default = "default_cookie_domain")]
    pub cookie_domain: String,
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,

    // Auth
    #[serde(default = "default_jwt_expiry_hours")]
    pub jwt_expiry_hours: i64,
    #[serde(default = "default_refresh_token_expiry_days")]
    pub refresh_token_expiry_days: i64,
    #[serde(default = "default_oidc_flow_expiry_minutes")]
    pub oidc_flow_expiry_minutes: i64,
    #[serde(default = "default_kakao_issuer_url")]
    pub kakao_issuer_url: String,

    // AI
    #[serde(default)]
    pub openai_api_key: Option<String>,
    #[serde(default = "default_openai_model")]
    pub openai_model: String,
    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,
    #[serde(default = "default_ai_timeout_secs")]
    pub ai_timeout_secs: u64,
    #[serde(default = "default_ai_validation_timeout_secs")]
    pub ai_validation_timeout_secs: u64,
    #[serde(default = "default_ai_max_retries")]
    pub ai_max_retries: u32,

    // Grading
    /// JSON suffix rule table replacing the built-in Korean rules
    #[serde(default)]
    pub grading_rules_path: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    5000
}

fn default_cookie_domain() -> String {
    "localhost".to_string()
}

const fn default_db_max_connections() -> u32 {
    10
}

const fn default_true() -> bool {
    true
}

const fn default_jwt_expiry_hours() -> i64 {
    24 * 7
}

const fn default_refresh_token_expiry_days() -> i64 {
    30
}

const fn default_oidc_flow_expiry_minutes() -> i64 {
    10
}

fn default_kakao_issuer_url() -> String {
    "https://kauth.kakao.com".to_string()
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

const fn default_ai_timeout_secs() -> u64 {
    30
}

const fn default_ai_validation_timeout_secs() -> u64 {
    60
}

const fn default_ai_max_retries() -> u32 {
    2
}

impl ApiConfig {
    /// Load and validate configuration from the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        let config: Self = envy::from_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that would fail at runtime.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.jwt_secret.len() < MIN_JWT_SECRET_LEN {
            anyhow::bail!("JWT_SECRET must be at least {MIN_JWT_SECRET_LEN} bytes long");
        }
        if self.cookie_secret.len() < MIN_COOKIE_SECRET_LEN {
            anyhow::bail!("COOKIE_SECRET must be at least {MIN_COOKIE_SECRET_LEN} bytes long");
        }
        if self.jwt_expiry_hours <= 0 || self.refresh_token_expiry_days <= 0 {
            anyhow::bail!("token expiries must be positive");
        }
        if self.ai_timeout_secs == 0 || self.ai_validation_timeout_secs == 0 {
            anyhow::bail!("AI timeouts must be positive");
        }
        Ok(())
    }

    /// Allowed CORS origins, falling back to the frontend URL.
    pub fn allowed_origins(&self) -> Vec<String> {
        match &self.allowed_origins {
            Some(origins) if !origins.trim().is_empty() => origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect(),
            _ => vec![self.frontend_url.clone()],
        }
    }

    /// Whether the AI features can be enabled.
    pub fn ai_enabled(&self) -> bool {
        self.openai_api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }
}
