//! Database Module
//!
//! Connection provider and schema management for the account service.

pub mod connection;
pub mod schema;

// Re-export commonly used types
pub use connection::{
    ConnectionError, ConnectionProvider, DatabaseConfig, DatabaseConnection, DatabaseDriver,
    DatabasePool,
};
pub use schema::ensure_schema;
