pub mod ai;
pub mod auth;
pub mod config;
pub mod error;
pub mod group;
pub mod jobs;
pub mod metrics;
pub mod middleware;
pub mod preference;
pub mod quiz;
pub mod router;
pub mod state;
pub mod tracing;
pub mod v1;
pub mod validation;
pub mod word;

pub use config::ApiConfig;
pub use state::{ApiState, AuthConfig};
