use axum_extra::extract::cookie::{Cookie, SameSite};

use crate::config::Environment;

pub const AUTH_COOKIE: &str = "auth_token";
pub const REFRESH_COOKIE: &str = "refresh_token";
pub const OIDC_FLOW_COOKIE: &str = "oidc_flow";

/// Shared attributes: HttpOnly, `SameSite=Lax`, and `Secure` outside development.
///
/// The domain lets the cookie be shared between the API and frontend
/// subdomains (e.g. `.voca.example.com`).
fn build_cookie(
    name: &'static str,
    value: String,
    environment: &Environment,
    max_age: time::Duration,
    cookie_domain: &str,
) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .max_age(max_age)
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(!environment.is_development())
        .domain(cookie_domain.to_string())
        .build()
}

/// Cookie holding the JWT access token
pub fn create_auth_cookie(
    token: String,
    environment: &Environment,
    expiry_hours: i64,
    cookie_domain: &str,
) -> Cookie<'static> {
    build_cookie(
        AUTH_COOKIE,
        token,
        environment,
        time::Duration::hours(expiry_hours),
        cookie_domain,
    )
}

/// Short-lived cookie holding [`OidcFlowData`](super::models::OidcFlowData) as JSON
pub fn create_oidc_flow_cookie(
    oidc_json: String,
    environment: &Environment,
    expiry_minutes: i64,
    cookie_domain: &str,
) -> Cookie<'static> {
    build_cookie(
        OIDC_FLOW_COOKIE,
        oidc_json,
        environment,
        time::Duration::minutes(expiry_minutes),
        cookie_domain,
    )
}

pub fn create_refresh_token_cookie(
    token: String,
    environment: &Environment,
    expiry_days: i64,
    cookie_domain: &str,
) -> Cookie<'static> {
    build_cookie(
        REFRESH_COOKIE,
        token,
        environment,
        time::Duration::days(expiry_days),
        cookie_domain,
    )
}

/// Cookie to pass to `jar.remove`. Path and domain must match the original
/// for the browser to drop it.
pub fn removal_cookie(name: &'static str, cookie_domain: &str) -> Cookie<'static> {
    Cookie::build(name)
        .path("/")
        .domain(cookie_domain.to_string())
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_auth_cookie_development() {
        let token = "test_token".to_string();

        let cookie = create_auth_cookie(token.clone(), &Environment::Development, 24, "localhost");

        assert_eq!(cookie.name(), AUTH_COOKIE);
        assert_eq!(cookie.value(), token);
        assert_eq!(cookie.path(), Some("/"));
        assert!(cookie.http_only().unwrap_or(false));
        assert!(
            !cookie.secure().unwrap_or(true),
            "Should not be secure in development"
        );
        assert_eq!(cookie.domain(), Some("localhost"));
        assert_eq!(cookie.max_age(), Some(time::Duration::hours(24)));
    }

    #[test]
    fn test_create_auth_cookie_production() {
        let cookie = create_auth_cookie(
            "test_token".to_string(),
            &Environment::Production,
            24,
            ".voca.example.com",
        );

        assert!(
            cookie.secure().unwrap_or(false),
            "Should be secure in production"
        );
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        // The cookie crate may strip the leading dot
        let domain = cookie.domain().unwrap();
        assert!(
            domain == ".voca.example.com" || domain == "voca.example.com",
            "unexpected domain: {domain}"
        );
    }

    #[test]
    fn test_create_oidc_flow_cookie() {
        let oidc_json =
            r#"{"csrf_token":"test","nonce":"test","pkce_verifier":"test"}"#.to_string();

        let cookie =
            create_oidc_flow_cookie(oidc_json.clone(), &Environment::Development, 10, "localhost");

        assert_eq!(cookie.name(), OIDC_FLOW_COOKIE);
        assert_eq!(cookie.value(), oidc_json);
        assert!(cookie.http_only().unwrap_or(false));
        assert_eq!(cookie.max_age(), Some(time::Duration::minutes(10)));
    }

    #[test]
    fn test_create_refresh_token_cookie() {
        let cookie = create_refresh_token_cookie(
            "refresh".to_string(),
            &Environment::Production,
            30,
            "localhost",
        );

        assert_eq!(cookie.name(), REFRESH_COOKIE);
        assert!(cookie.secure().unwrap_or(false));
        assert_eq!(cookie.max_age(), Some(time::Duration::days(30)));
    }

    #[test]
    fn test_removal_cookie_matches_path_and_domain() {
        let cookie = removal_cookie(AUTH_COOKIE, "localhost");
        assert_eq!(cookie.name(), AUTH_COOKIE);
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.domain(), Some("localhost"));
    }
}
