//! Account Service Library
//!
//! A small user-account service: registration, duplicate-email checks,
//! credential validation and profile lookups over a pooled SQL connection.
//!
//! # Features
//!
//! - **Registration**: validated input, bcrypt-hashed passwords, atomic
//!   duplicate detection on the email key
//! - **Credential Checks**: one generic denial for unknown emails and wrong
//!   passwords
//! - **Connection Provider**: lazily created pool over PostgreSQL or SQLite,
//!   selected by configuration
//! - **Notifications**: registration emails over SMTP, or log-only
//! - **HTTP API**: configurable endpoints via the RouterBuilder pattern
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use account_service::{
//!     database::{ensure_schema, ConnectionProvider, DatabaseConfig},
//!     UserService,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = ConnectionProvider::connect(DatabaseConfig::from_env()?).await?;
//!     ensure_schema(&provider).await?;
//!
//!     let service = UserService::new(provider);
//!     let user = service
//!         .register_user(
//!             "Alice Smith",
//!             9876543210,
//!             "alice@example.com",
//!             "12 High Street",
//!             560001,
//!             "SecurePass123!",
//!         )
//!         .await?;
//!
//!     println!("Hello {}", user.first_name());
//!     Ok(())
//! }
//! ```
//!
//! # Router Builder Examples
//!
//! ```rust,no_run
//! use account_service::api::RouterBuilder;
//!
//! // Full service with all endpoints
//! let full_router = RouterBuilder::with_all_routes().build();
//!
//! // Lookups only
//! let directory_router = RouterBuilder::with_readonly_routes().build();
//!
//! // Login service
//! let auth_router = RouterBuilder::new()
//!     .health_check(true)
//!     .login(true)
//!     .build();
//! ```

/// HTTP API layer with handlers and configurable routing
pub mod api;

/// Configuration management for all service settings
pub mod config;

/// Database connection management and schema
pub mod database;

/// Data models and request/response structures
pub mod models;

/// Business logic and account services
pub mod service;

/// Shared utilities for security, validation, and error handling
pub mod utils;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export commonly used types for convenient access
pub use api::{create_routes, AppState, RouterBuilder};
pub use models::{
    auth::CredentialCheck,
    requests::{LoginRequest, RegisterUserRequest},
    user::User,
};
pub use service::{
    EmailService, LogNotifier, RegistrationNotifier, UserService, UserServiceError,
    UserServiceResult,
};
pub use utils::error::{AppError, AppResult, ErrorResponse};

// Re-export database utilities for configuration
pub use database::{ConnectionProvider, DatabaseConfig, DatabaseDriver, DatabasePool};

// Re-export configuration system
pub use config::{env, AppConfig, ConfigError, EmailConfig, ServerConfig};

/// Library version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
