pub mod corrections;
pub mod model;
pub mod routes;

pub use routes::routes;
