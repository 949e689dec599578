//! Data Models Module
//!
//! Account records, authentication outcomes, and request/response payloads.

pub mod auth;
pub mod requests;
pub mod user;

// Re-export commonly used types
pub use auth::CredentialCheck;
pub use requests::*;
pub use user::User;
