//! Registration Notifications
//!
//! Boundary for the side effect triggered by a successful registration.

use async_trait::async_trait;
use log::info;

use crate::utils::error::AppResult;

/// Receives "account created" events
#[async_trait]
pub trait RegistrationNotifier: Send + Sync {
    /// Tell `email` their registration went through, greeting them by `first_name`
    async fn registration_success(&self, email: &str, first_name: &str) -> AppResult<()>;
}

/// Notifier that only writes to the log; used when SMTP is not configured
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl RegistrationNotifier for LogNotifier {
    async fn registration_success(&self, email: &str, first_name: &str) -> AppResult<()> {
        info!(
            "Registration notice for {} (greeting: {}) not sent: email delivery disabled",
            email, first_name
        );
        Ok(())
    }
}
