//! User Service Implementation
//!
//! Core business logic for account registration, credential checks and
//! profile lookups.

use log::{error, info, warn};
use std::sync::{Arc, OnceLock};
use thiserror::Error;
use validator::Validate;

use crate::config::ConfigError;
use crate::database::{ConnectionError, ConnectionProvider};
use crate::models::{
    auth::{CredentialCheck, ALREADY_REGISTERED},
    requests::{describe_validation_errors, RegisterUserRequest},
    user::{User, UserWithPassword},
};
use crate::service::notifier::{LogNotifier, RegistrationNotifier};
use crate::utils::{
    error::AppError,
    security::{dummy_password_hash, hash_password_with_cost, verify_password, DEFAULT_BCRYPT_COST},
    validation::{first_name, normalize_email, password_fits_bcrypt},
};

const INSERT_USER: &str = r#"
    INSERT INTO users (email, name, mobile, address, pincode, password_hash)
    VALUES ($1, $2, $3, $4, $5, $6)
    ON CONFLICT (email) DO NOTHING
"#;

const SELECT_USER_WITH_PASSWORD: &str = r#"
    SELECT name, mobile, email, address, pincode, password_hash
    FROM users
    WHERE email = $1
"#;

/// Custom error types for the user service
#[derive(Error, Debug)]
pub enum UserServiceError {
    /// Attempted to register an email that already has an account
    #[error("Email Id Already Registered!")]
    EmailAlreadyRegistered,

    /// Input validation failed with detailed error message
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// No database connection could be obtained
    #[error("Database unavailable: {0}")]
    ConnectionUnavailable(#[source] sqlx::Error),

    /// Database operation failed
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    /// Database configuration is unusable
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// Password hashing operation failed
    #[error("Password hashing error: {0}")]
    HashingError(#[from] bcrypt::BcryptError),

    /// Unexpected internal server error
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl From<ConnectionError> for UserServiceError {
    fn from(err: ConnectionError) -> Self {
        match err {
            ConnectionError::Configuration(e) => UserServiceError::Configuration(e),
            ConnectionError::Unavailable(e) => UserServiceError::ConnectionUnavailable(e),
        }
    }
}

impl From<UserServiceError> for AppError {
    fn from(err: UserServiceError) -> Self {
        match err {
            UserServiceError::EmailAlreadyRegistered => {
                AppError::Conflict(ALREADY_REGISTERED.to_string())
            }
            UserServiceError::ValidationError(msg) => AppError::Validation(msg),
            UserServiceError::ConnectionUnavailable(e) => {
                AppError::Unavailable(format!("Database unavailable: {}", e))
            }
            UserServiceError::DatabaseError(e) => AppError::Database(e),
            UserServiceError::Configuration(e) => AppError::Configuration(e.to_string()),
            UserServiceError::HashingError(e) => AppError::HashingError(e),
            UserServiceError::InternalError(msg) => AppError::Internal(msg),
        }
    }
}

/// Result type for user service operations
pub type UserServiceResult<T> = Result<T, UserServiceError>;

/// Account operations over a shared connection provider
#[derive(Clone)]
pub struct UserService {
    /// Source of pooled database connections
    db: ConnectionProvider,

    /// bcrypt cost factor for password hashing (higher = more secure but slower)
    bcrypt_cost: u32,

    /// Told about every successful registration
    notifier: Arc<dyn RegistrationNotifier>,

    /// Hash verified against when the email is unknown
    dummy_hash: Arc<OnceLock<String>>,
}

impl UserService {
    /// Creates a service that only logs registration notices
    pub fn new(db: ConnectionProvider) -> Self {
        Self::with_notifier(db, Arc::new(LogNotifier))
    }

    /// Creates a service announcing registrations through `notifier`
    pub fn with_notifier(db: ConnectionProvider, notifier: Arc<dyn RegistrationNotifier>) -> Self {
        Self {
            db,
            bcrypt_cost: DEFAULT_BCRYPT_COST,
            notifier,
            dummy_hash: Arc::new(OnceLock::new()),
        }
    }

    /// Overrides the bcrypt cost used for new password hashes
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self.dummy_hash = Arc::new(OnceLock::new());
        self
    }

    pub fn connection_provider(&self) -> &ConnectionProvider {
        &self.db
    }

    /// Whether an account exists for the email
    pub async fn is_registered(&self, email: &str) -> UserServiceResult<bool> {
        let email = normalize_email(email);
        let mut conn = self.db.acquire().await?;

        let row = sqlx::query("SELECT email FROM users WHERE email = $1")
            .bind(&email)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(row.is_some())
    }

    /// Registers a new account and announces it through the notifier
    pub async fn register(&self, request: RegisterUserRequest) -> UserServiceResult<User> {
        request.validate().map_err(|e| {
            UserServiceError::ValidationError(format!(
                "Invalid user data: {}",
                describe_validation_errors(&e)
            ))
        })?;

        // Only the email is normalized; every other field is stored as given
        let user = User {
            name: request.name,
            mobile: request.mobile,
            email: normalize_email(&request.email),
            address: request.address,
            pincode: request.pincode,
        };

        let password_hash = self.hash_password(request.password).await?;

        let mut conn = self.db.acquire().await?;
        let result = sqlx::query(INSERT_USER)
            .bind(&user.email)
            .bind(&user.name)
            .bind(user.mobile)
            .bind(&user.address)
            .bind(user.pincode)
            .bind(&password_hash)
            .execute(&mut *conn)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db_err) => {
                    if db_err.is_unique_violation() {
                        UserServiceError::EmailAlreadyRegistered
                    } else {
                        UserServiceError::DatabaseError(sqlx::Error::Database(db_err))
                    }
                }
                _ => UserServiceError::DatabaseError(e),
            });
        drop(conn);

        let inserted = match result {
            Ok(done) => done.rows_affected() > 0,
            Err(UserServiceError::EmailAlreadyRegistered) => false,
            Err(e) => return Err(e),
        };

        if !inserted {
            warn!("Registration rejected, email already registered: {}", user.email);
            return Err(UserServiceError::EmailAlreadyRegistered);
        }

        info!("Registered user: {}", user.email);

        if let Err(e) = self
            .notifier
            .registration_success(&user.email, user.first_name())
            .await
        {
            error!("Registration notice for {} failed: {}", user.email, e);
        }

        Ok(user)
    }

    /// Registers an account from its individual fields
    pub async fn register_user(
        &self,
        name: &str,
        mobile: i64,
        email: &str,
        address: &str,
        pincode: i64,
        password: &str,
    ) -> UserServiceResult<User> {
        self.register(RegisterUserRequest {
            name: name.to_string(),
            mobile,
            email: email.to_string(),
            address: address.to_string(),
            pincode,
            password: password.to_string(),
        })
        .await
    }

    /// Checks an email/password pair without revealing which half was wrong
    pub async fn validate_credential(
        &self,
        email: &str,
        password: &str,
    ) -> UserServiceResult<CredentialCheck> {
        let check = match self.authenticate(email, password).await? {
            Some(_) => CredentialCheck::Valid,
            None => CredentialCheck::Denied,
        };

        Ok(check)
    }

    /// Full account record for a matching email/password pair
    pub async fn get_user_details(
        &self,
        email: &str,
        password: &str,
    ) -> UserServiceResult<Option<User>> {
        self.authenticate(email, password).await
    }

    /// First token of the stored name
    pub async fn get_first_name(&self, email: &str) -> UserServiceResult<Option<String>> {
        let name = self
            .fetch_text("SELECT name FROM users WHERE email = $1", email)
            .await?;
        Ok(name.map(|name| first_name(&name).to_string()))
    }

    /// Stored postal address
    pub async fn get_address(&self, email: &str) -> UserServiceResult<Option<String>> {
        self.fetch_text("SELECT address FROM users WHERE email = $1", email)
            .await
    }

    /// Health check for the service
    pub async fn health_check(&self) -> UserServiceResult<()> {
        let mut conn = self.db.acquire().await?;

        sqlx::query("SELECT 1")
            .execute(&mut *conn)
            .await
            .map_err(UserServiceError::DatabaseError)?;

        Ok(())
    }

    /// Single text column of the row for `email`, bound as `$1`
    async fn fetch_text(&self, sql: &'static str, email: &str) -> UserServiceResult<Option<String>> {
        let email = normalize_email(email);
        let mut conn = self.db.acquire().await?;

        let value = sqlx::query_scalar::<_, String>(sql)
            .bind(&email)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(value)
    }

    async fn find_with_password(&self, email: &str) -> UserServiceResult<Option<UserWithPassword>> {
        let mut conn = self.db.acquire().await?;

        let user = sqlx::query_as::<_, UserWithPassword>(SELECT_USER_WITH_PASSWORD)
            .bind(email)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(user)
    }

    /// Passwords bcrypt would truncate never match
    async fn authenticate(&self, email: &str, password: &str) -> UserServiceResult<Option<User>> {
        let email = normalize_email(email);

        match self.find_with_password(&email).await? {
            Some(stored) if password_fits_bcrypt(password) => {
                let hash = stored.password_hash.clone();
                if Self::verify_blocking(password, hash).await? {
                    Ok(Some(stored.into()))
                } else {
                    warn!("Login denied for {}", email);
                    Ok(None)
                }
            }
            _ => {
                let hash = self.dummy_hash().await?;
                Self::verify_blocking(password, hash).await?;
                warn!("Login denied for {}", email);
                Ok(None)
            }
        }
    }

    async fn hash_password(&self, password: String) -> UserServiceResult<String> {
        let cost = self.bcrypt_cost;
        let hash = tokio::task::spawn_blocking(move || hash_password_with_cost(&password, cost))
            .await
            .map_err(|e| UserServiceError::InternalError(format!("Hashing task failed: {}", e)))??;

        Ok(hash)
    }

    async fn verify_blocking(password: &str, hash: String) -> UserServiceResult<bool> {
        let password = password.to_string();
        let matches = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| {
                UserServiceError::InternalError(format!("Verification task failed: {}", e))
            })??;

        Ok(matches)
    }

    async fn dummy_hash(&self) -> UserServiceResult<String> {
        if let Some(hash) = self.dummy_hash.get() {
            return Ok(hash.clone());
        }

        let cost = self.bcrypt_cost;
        let hash = tokio::task::spawn_blocking(move || dummy_password_hash(cost))
            .await
            .map_err(|e| UserServiceError::InternalError(format!("Hashing task failed: {}", e)))??;

        Ok(self.dummy_hash.get_or_init(|| hash).clone())
    }
}
