//! Shared fixtures for unit tests

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::database::{ensure_schema, ConnectionProvider, DatabaseConfig};
use crate::models::RegisterUserRequest;
use crate::service::{RegistrationNotifier, UserService};
use crate::utils::error::{AppError, AppResult};

/// Fresh in-memory database with the users table in place
pub(crate) async fn test_provider() -> ConnectionProvider {
    let provider = ConnectionProvider::connect(DatabaseConfig::in_memory())
        .await
        .expect("in-memory database should open");
    ensure_schema(&provider)
        .await
        .expect("schema should be created");
    provider
}

/// Service over a fresh database with a recording notifier and a cheap bcrypt cost
pub(crate) async fn test_user_service() -> (UserService, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    let service =
        UserService::with_notifier(test_provider().await, notifier.clone()).with_bcrypt_cost(4);
    (service, notifier)
}

pub(crate) fn register_request(name: &str, email: &str) -> RegisterUserRequest {
    RegisterUserRequest {
        name: name.to_string(),
        mobile: 9876543210,
        email: email.to_string(),
        address: "221B Baker Street, London".to_string(),
        pincode: 560001,
        password: "SecurePass123!".to_string(),
    }
}

/// Notifier remembering every (email, first name) it was given
#[derive(Default)]
pub(crate) struct RecordingNotifier {
    sent: Mutex<Vec<(String, String)>>,
    fail_next: Mutex<bool>,
}

impl RecordingNotifier {
    pub(crate) fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    /// Make the next notification fail after being recorded
    pub(crate) fn fail_next(&self) {
        *self.fail_next.lock().unwrap() = true;
    }
}

#[async_trait]
impl RegistrationNotifier for RecordingNotifier {
    async fn registration_success(&self, email: &str, first_name: &str) -> AppResult<()> {
        self.sent
            .lock()
            .unwrap()
            .push((email.to_string(), first_name.to_string()));

        let mut fail = self.fail_next.lock().unwrap();
        if *fail {
            *fail = false;
            return Err(AppError::ExternalService("mail server down".to_string()));
        }
        Ok(())
    }
}
