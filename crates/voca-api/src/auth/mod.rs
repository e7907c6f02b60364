pub mod cookies;
pub mod jwt;
pub mod kakao;
pub mod middleware;
pub mod models;
pub mod refresh_token;
pub mod routes;

pub use middleware::AuthUser;
pub use routes::routes;
