pub mod model;
pub mod routes;
pub mod scoring;

pub use routes::routes;
