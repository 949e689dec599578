//! Database Connection Management
//!
//! Driver selection, pool configuration, and the connection provider the
//! services acquire their connections from.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::any::AnyPoolOptions;
use sqlx::pool::PoolConnection;
use sqlx::{Any, AnyPool};
use thiserror::Error;
use tokio::sync::OnceCell;

use crate::config::{env, ConfigError};

/// Database connection pool type alias for convenience
pub type DatabasePool = AnyPool;

/// Pooled connection handed out by [`ConnectionProvider::acquire`].
/// Dropping it returns the connection to the pool.
pub type DatabaseConnection = PoolConnection<Any>;

/// Supported database drivers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseDriver {
    Postgres,
    Sqlite,
}

impl DatabaseDriver {
    pub fn name(&self) -> &'static str {
        match self {
            DatabaseDriver::Postgres => "postgres",
            DatabaseDriver::Sqlite => "sqlite",
        }
    }

    /// Infer the driver from a connection string's scheme
    pub fn from_url(url: &str) -> Option<Self> {
        let scheme = url.split(':').next()?;
        scheme.parse().ok()
    }
}

impl FromStr for DatabaseDriver {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(DatabaseDriver::Postgres),
            "sqlite" => Ok(DatabaseDriver::Sqlite),
            other => Err(ConfigError::InvalidValue {
                key: "DB_DRIVER".to_string(),
                value: other.to_string(),
                reason: "supported drivers are postgres and sqlite".to_string(),
            }),
        }
    }
}

impl fmt::Display for DatabaseDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Database configuration for connection setup
#[derive(Clone)]
pub struct DatabaseConfig {
    pub driver: DatabaseDriver,
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("driver", &self.driver)
            .field("url", &self.redacted_url())
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "********"))
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("connect_timeout", &self.connect_timeout)
            .field("idle_timeout", &self.idle_timeout)
            .field("max_lifetime", &self.max_lifetime)
            .finish()
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            driver: DatabaseDriver::Postgres,
            url: "postgres://localhost/account_service".to_string(),
            username: None,
            password: None,
            max_connections: 10,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            max_lifetime: Duration::from_secs(3600),
        }
    }
}

impl DatabaseConfig {
    /// Create database configuration from environment variables.
    ///
    /// `DATABASE_URL` is required. `DB_DRIVER` falls back to the URL scheme
    /// when unset; `DB_USERNAME` and `DB_PASSWORD` are merged into the URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        let url = env::get_required("DATABASE_URL")?;

        let driver = match env::get_optional("DB_DRIVER") {
            Some(name) => name.parse()?,
            None => DatabaseDriver::from_url(&url).ok_or_else(|| ConfigError::InvalidValue {
                key: "DATABASE_URL".to_string(),
                value: url.clone(),
                reason: "cannot infer driver from scheme, set DB_DRIVER".to_string(),
            })?,
        };

        let config = Self {
            driver,
            url,
            username: env::get_optional("DB_USERNAME"),
            password: env::get_optional("DB_PASSWORD"),
            max_connections: env::get_u32("DB_MAX_CONNECTIONS", 10),
            min_connections: env::get_u32("DB_MIN_CONNECTIONS", 1),
            connect_timeout: Duration::from_secs(env::get_u64("DB_CONNECT_TIMEOUT", 30)),
            idle_timeout: Duration::from_secs(env::get_u64("DB_IDLE_TIMEOUT", 600)),
            max_lifetime: Duration::from_secs(env::get_u64("DB_MAX_LIFETIME", 3600)),
        };

        config.validate()?;
        Ok(config)
    }

    /// Configuration for a private in-memory SQLite database
    pub fn in_memory() -> Self {
        Self {
            driver: DatabaseDriver::Sqlite,
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_connections == 0 {
            return Err(ConfigError::ValidationError(
                "Database max_connections must be greater than 0".to_string(),
            ));
        }

        if self.min_connections > self.max_connections {
            return Err(ConfigError::ValidationError(
                "Database min_connections cannot be greater than max_connections".to_string(),
            ));
        }

        match DatabaseDriver::from_url(&self.url) {
            Some(scheme_driver) if scheme_driver == self.driver => Ok(()),
            _ => Err(ConfigError::InvalidValue {
                key: "DATABASE_URL".to_string(),
                value: self.redacted_url(),
                reason: format!("connection string does not match driver {}", self.driver),
            }),
        }
    }

    /// Whether the URL names an in-memory SQLite database, which lives only
    /// as long as its single connection
    pub fn is_in_memory(&self) -> bool {
        self.driver == DatabaseDriver::Sqlite
            && (self.url.contains(":memory:") || self.url.contains("mode=memory"))
    }

    /// Connection string with `username`/`password` merged in
    pub fn connection_url(&self) -> Result<String, ConfigError> {
        if self.driver == DatabaseDriver::Sqlite
            || (self.username.is_none() && self.password.is_none())
        {
            return Ok(self.url.clone());
        }

        let invalid = |reason: &str| ConfigError::InvalidValue {
            key: "DATABASE_URL".to_string(),
            value: self.redacted_url(),
            reason: reason.to_string(),
        };

        let mut url = url::Url::parse(&self.url).map_err(|e| invalid(&e.to_string()))?;

        if let Some(username) = &self.username {
            url.set_username(username)
                .map_err(|_| invalid("cannot carry a username"))?;
        }
        if let Some(password) = &self.password {
            url.set_password(Some(password))
                .map_err(|_| invalid("cannot carry a password"))?;
        }

        Ok(url.to_string())
    }

    fn redacted_url(&self) -> String {
        match url::Url::parse(&self.url) {
            Ok(mut url) if url.password().is_some() => {
                let _ = url.set_password(Some("********"));
                url.to_string()
            }
            _ => self.url.clone(),
        }
    }

    /// Create a database connection pool from this configuration
    pub async fn create_pool(&self) -> Result<AnyPool, ConnectionError> {
        sqlx::any::install_default_drivers();

        let url = self.connection_url()?;

        let mut options = AnyPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(self.connect_timeout)
            .test_before_acquire(true);

        options = if self.is_in_memory() {
            options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            options
                .idle_timeout(self.idle_timeout)
                .max_lifetime(self.max_lifetime)
        };

        let pool = options.connect(&url).await.map_err(|e| {
            log::error!("Failed to connect to {} database: {}", self.driver, e);
            ConnectionError::Unavailable(e)
        })?;

        log::info!(
            "Connected to {} database (max {} connections)",
            self.driver,
            if self.is_in_memory() { 1 } else { self.max_connections }
        );

        Ok(pool)
    }
}

/// Failures while obtaining a connection
#[derive(Error, Debug)]
pub enum ConnectionError {
    #[error("Invalid database configuration: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Database unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),
}

/// Hands out pooled connections.
///
/// The pool is created on the first [`acquire`](Self::acquire) unless the
/// provider was built with [`connect`](Self::connect) or
/// [`from_pool`](Self::from_pool). Clones share the same pool.
#[derive(Clone)]
pub struct ConnectionProvider {
    inner: Arc<ProviderInner>,
}

struct ProviderInner {
    config: DatabaseConfig,
    pool: OnceCell<AnyPool>,
}

impl ConnectionProvider {
    /// Provider that connects lazily on first use
    pub fn new(config: DatabaseConfig) -> Self {
        Self {
            inner: Arc::new(ProviderInner {
                config,
                pool: OnceCell::new(),
            }),
        }
    }

    /// Provider with its pool connected up front
    pub async fn connect(config: DatabaseConfig) -> Result<Self, ConnectionError> {
        let provider = Self::new(config);
        provider.pool().await?;
        Ok(provider)
    }

    /// Provider around an existing pool
    pub fn from_pool(config: DatabaseConfig, pool: AnyPool) -> Self {
        Self {
            inner: Arc::new(ProviderInner {
                config,
                pool: OnceCell::new_with(Some(pool)),
            }),
        }
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.inner.config
    }

    /// The underlying pool, created on first call
    pub async fn pool(&self) -> Result<&AnyPool, ConnectionError> {
        self.inner
            .pool
            .get_or_try_init(|| self.inner.config.create_pool())
            .await
    }

    /// Acquire a validated connection from the pool
    pub async fn acquire(&self) -> Result<DatabaseConnection, ConnectionError> {
        let pool = self.pool().await?;

        pool.acquire().await.map_err(|e| {
            log::error!("Failed to acquire database connection: {}", e);
            ConnectionError::Unavailable(e)
        })
    }

    /// Close every pooled connection. Later acquires fail.
    pub async fn close(&self) {
        if let Some(pool) = self.inner.pool.get() {
            pool.close().await;
            log::info!("Database pool closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_parsing() {
        assert_eq!("postgres".parse(), Ok(DatabaseDriver::Postgres));
        assert_eq!("PostgreSQL".parse(), Ok(DatabaseDriver::Postgres));
        assert_eq!("sqlite".parse(), Ok(DatabaseDriver::Sqlite));
        assert!("com.mysql.cj.jdbc.Driver".parse::<DatabaseDriver>().is_err());
    }

    #[test]
    fn test_driver_from_url() {
        assert_eq!(
            DatabaseDriver::from_url("postgres://localhost/db"),
            Some(DatabaseDriver::Postgres)
        );
        assert_eq!(
            DatabaseDriver::from_url("sqlite::memory:"),
            Some(DatabaseDriver::Sqlite)
        );
        assert_eq!(DatabaseDriver::from_url("mysql://localhost/db"), None);
    }

    #[test]
    fn test_database_config_default() {
        let config = DatabaseConfig::default();
        assert_eq!(config.driver, DatabaseDriver::Postgres);
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 1);
        assert_eq!(config.connect_timeout, Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_driver_mismatch() {
        let config = DatabaseConfig {
            driver: DatabaseDriver::Sqlite,
            ..DatabaseConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_bad_pool_bounds() {
        let config = DatabaseConfig {
            max_connections: 2,
            min_connections: 5,
            ..DatabaseConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_connection_url_merges_credentials() {
        let config = DatabaseConfig {
            url: "postgres://db.internal:5432/accounts".to_string(),
            username: Some("svc".to_string()),
            password: Some("p@ss word".to_string()),
            ..DatabaseConfig::default()
        };

        let url = config.connection_url().unwrap();
        assert!(url.starts_with("postgres://svc:"));
        assert!(url.ends_with("@db.internal:5432/accounts"));
        assert!(!url.contains("p@ss word"));
    }

    #[test]
    fn test_connection_url_untouched_for_sqlite() {
        let config = DatabaseConfig {
            username: Some("ignored".to_string()),
            ..DatabaseConfig::in_memory()
        };
        assert_eq!(config.connection_url().unwrap(), "sqlite::memory:");
        assert!(config.is_in_memory());
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = DatabaseConfig {
            password: Some("hunter2".to_string()),
            ..DatabaseConfig::default()
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("********"));
    }

    #[tokio::test]
    async fn test_lazy_provider_connects_on_first_acquire() {
        let provider = ConnectionProvider::new(DatabaseConfig::in_memory());
        assert!(provider.inner.pool.get().is_none());

        let conn = provider.acquire().await.unwrap();
        drop(conn);
        assert!(provider.inner.pool.get().is_some());

        // the released connection is reused, not closed
        let again = provider.acquire().await;
        assert!(again.is_ok());
    }

    #[tokio::test]
    async fn test_acquire_after_close_fails() {
        let provider = ConnectionProvider::connect(DatabaseConfig::in_memory())
            .await
            .unwrap();
        provider.close().await;

        assert!(matches!(
            provider.acquire().await,
            Err(ConnectionError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_database_is_unavailable() {
        let config = DatabaseConfig {
            driver: DatabaseDriver::Sqlite,
            url: "sqlite:///nonexistent-dir/for-sure/accounts.db".to_string(),
            connect_timeout: Duration::from_secs(2),
            ..DatabaseConfig::default()
        };
        let provider = ConnectionProvider::new(config);

        assert!(matches!(
            provider.acquire().await,
            Err(ConnectionError::Unavailable(_))
        ));
    }
}
