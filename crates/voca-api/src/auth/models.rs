use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// PKCE, CSRF and nonce values kept in the encrypted `oidc_flow` cookie
/// between the redirect to Kakao and the callback
#[derive(Debug, Serialize, Deserialize)]
pub struct OidcFlowData {
    pub csrf_token: String,
    pub nonce: String,
    pub pkce_verifier: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub kakao_id: String,
    pub nickname: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub message: String,
}
