//! API Layer
//!
//! HTTP API endpoints and request handling for the account service.

pub mod handlers;
pub mod routes;

// Re-export commonly used types
pub use handlers::{AppState, SuccessResponse};
pub use routes::{create_readonly_routes, create_routes, RouterBuilder};
