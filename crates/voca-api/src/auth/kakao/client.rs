use oauth2::{AuthType, EndpointMaybeSet, EndpointNotSet, EndpointSet};
use openidconnect::{
    ClientId, ClientSecret, IssuerUrl, RedirectUrl,
    core::{CoreClient, CoreProviderMetadata},
};

pub type OpenIdClient = CoreClient<
    EndpointSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointMaybeSet,
    EndpointMaybeSet,
>;

/// Create an OIDC client for Kakao from its discovery document.
///
/// Kakao expects the client secret in the token request body rather than
/// in a Basic auth header.
pub async fn create_oidc_client(
    issuer_url: &str,
    client_id: String,
    client_secret: String,
    redirect_url: String,
) -> anyhow::Result<OpenIdClient> {
    let provider_metadata = CoreProviderMetadata::discover_async(
        IssuerUrl::new(issuer_url.to_string())?,
        &reqwest::Client::new(),
    )
    .await?;

    let oidc_client = CoreClient::from_provider_metadata(
        provider_metadata,
        ClientId::new(client_id),
        Some(ClientSecret::new(client_secret)),
    )
    .set_auth_type(AuthType::RequestBody)
    .set_redirect_uri(RedirectUrl::new(redirect_url)?);

    Ok(oidc_client)
}
