//! Kakao login over OpenID Connect.

pub mod client;
pub mod routes;
pub mod service;

pub use client::{OpenIdClient, create_oidc_client};
pub use routes::routes;
