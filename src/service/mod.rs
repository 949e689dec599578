//! Service Layer
//!
//! Business logic and data access layer for the account service.

pub mod email_service;
pub mod notifier;
pub mod user;

// Re-export services
pub use email_service::EmailService;
pub use notifier::{LogNotifier, RegistrationNotifier};
pub use user::{UserService, UserServiceError, UserServiceResult};
