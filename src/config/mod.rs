//! Configuration Module
//!
//! Environment-driven configuration for the server, the database connection
//! provider, and the optional SMTP notifier.

use thiserror::Error;

use crate::database::DatabaseConfig;

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {value} - {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation error: {0}")]
    ValidationError(String),
}

/// Environment variable helpers
pub mod env {
    use std::env;

    use super::ConfigError;

    /// Get environment variable as string with default
    pub fn get_string(key: &str, default: &str) -> String {
        env::var(key).unwrap_or_else(|_| default.to_string())
    }

    /// Get optional environment variable, treating empty values as unset
    pub fn get_optional(key: &str) -> Option<String> {
        env::var(key).ok().filter(|v| !v.is_empty())
    }

    /// Get environment variable as boolean with default
    pub fn get_bool(key: &str, default: bool) -> bool {
        env::var(key)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Get environment variable as u32 with default
    pub fn get_u32(key: &str, default: u32) -> u32 {
        env::var(key)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Get environment variable as u16 with default
    pub fn get_u16(key: &str, default: u16) -> u16 {
        env::var(key)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Get environment variable as u64 with default
    pub fn get_u64(key: &str, default: u64) -> u64 {
        env::var(key)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Check if environment variable is set
    pub fn is_set(key: &str) -> bool {
        env::var(key).is_ok()
    }

    /// Get required environment variable
    pub fn get_required(key: &str) -> Result<String, ConfigError> {
        env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
    }
}

/// Application configuration combining all service configurations
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Email configuration; `None` when SMTP is not configured
    pub email: Option<EmailConfig>,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

/// Email service configuration
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub smtp_use_tls: bool,
    pub from_name: String,
    pub from_email: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: env::get_string("SERVER_HOST", "0.0.0.0"),
            port: env::get_u16("SERVER_PORT", 3000),
            log_level: env::get_string("LOG_LEVEL", "info"),
        }
    }
}

impl ServerConfig {
    /// Socket address string the HTTP server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl EmailConfig {
    /// Load SMTP settings; `Ok(None)` when `SMTP_HOST` is absent
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        if !env::is_set("SMTP_HOST") {
            return Ok(None);
        }

        Ok(Some(Self {
            smtp_host: env::get_required("SMTP_HOST")?,
            smtp_port: env::get_u16("SMTP_PORT", 587),
            smtp_username: env::get_required("SMTP_USERNAME")?,
            smtp_password: env::get_required("SMTP_PASSWORD")?,
            smtp_use_tls: env::get_bool("SMTP_USE_TLS", true),
            from_name: env::get_string("SMTP_FROM_NAME", "Account Service"),
            from_email: env::get_required("SMTP_FROM_EMAIL")?,
        }))
    }
}

impl AppConfig {
    /// Load complete application configuration from environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::from_env()?,
            email: EmailConfig::from_env()?,
        })
    }

    /// Validate the complete configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        self.database.validate()?;

        if let Some(email) = &self.email {
            if email.from_email.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "SMTP from address cannot be empty".to_string(),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_bind_addr() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            log_level: "debug".to_string(),
        };
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_env_helpers() {
        assert!(env::get_bool("ACCOUNT_SERVICE_NONEXISTENT_BOOL", true));
        assert!(!env::get_bool("ACCOUNT_SERVICE_NONEXISTENT_BOOL", false));
        assert_eq!(env::get_u32("ACCOUNT_SERVICE_NONEXISTENT_U32", 42), 42);
        assert_eq!(
            env::get_string("ACCOUNT_SERVICE_NONEXISTENT_STRING", "default"),
            "default"
        );
        assert_eq!(env::get_optional("ACCOUNT_SERVICE_NONEXISTENT_STRING"), None);
    }

    #[test]
    fn test_get_required_reports_missing_key() {
        assert_eq!(
            env::get_required("ACCOUNT_SERVICE_NONEXISTENT_REQUIRED"),
            Err(ConfigError::MissingEnvVar(
                "ACCOUNT_SERVICE_NONEXISTENT_REQUIRED".to_string()
            ))
        );
    }

    #[test]
    fn test_validate_rejects_zero_port() {
        let config = AppConfig {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 0,
                log_level: "info".to_string(),
            },
            database: DatabaseConfig::default(),
            email: None,
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validate_accepts_defaults() {
        let config = AppConfig {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                log_level: "info".to_string(),
            },
            database: DatabaseConfig::default(),
            email: None,
        };
        assert!(config.validate().is_ok());
    }
}
