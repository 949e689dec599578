//! Database Schema
//!
//! The `users` table definition, created on startup when absent. The DDL is
//! plain enough to run unchanged on every supported driver.

use super::connection::{ConnectionError, ConnectionProvider};

/// Table holding one row per registered account
pub const USERS_TABLE: &str = "users";

const CREATE_USERS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        email TEXT NOT NULL PRIMARY KEY,
        name TEXT NOT NULL,
        mobile BIGINT NOT NULL,
        address TEXT NOT NULL,
        pincode BIGINT NOT NULL,
        password_hash TEXT NOT NULL
    )
"#;

/// Expected columns of the users table, in declaration order
pub const USERS_COLUMNS: [&str; 6] = [
    "email",
    "name",
    "mobile",
    "address",
    "pincode",
    "password_hash",
];

/// Create the users table if it does not exist yet
pub async fn ensure_schema(provider: &ConnectionProvider) -> Result<(), ConnectionError> {
    let mut conn = provider.acquire().await?;

    sqlx::query(CREATE_USERS_TABLE)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            log::error!("Failed to create {} table: {}", USERS_TABLE, e);
            ConnectionError::Unavailable(e)
        })?;

    log::info!("Schema ready: {} table present", USERS_TABLE);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::DatabaseConfig;
    use sqlx::Row;

    #[tokio::test]
    async fn test_ensure_schema_is_idempotent() {
        let provider = ConnectionProvider::connect(DatabaseConfig::in_memory())
            .await
            .unwrap();

        ensure_schema(&provider).await.unwrap();
        ensure_schema(&provider).await.unwrap();
    }

    #[tokio::test]
    async fn test_users_table_has_expected_columns() {
        let provider = ConnectionProvider::connect(DatabaseConfig::in_memory())
            .await
            .unwrap();
        ensure_schema(&provider).await.unwrap();

        let mut conn = provider.acquire().await.unwrap();
        let rows = sqlx::query("SELECT name FROM pragma_table_info('users') ORDER BY cid")
            .fetch_all(&mut *conn)
            .await
            .unwrap();

        let columns: Vec<String> = rows.iter().map(|row| row.get::<String, _>(0)).collect();
        assert_eq!(columns, USERS_COLUMNS);
    }
}
