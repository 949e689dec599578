//! Authentication Models
//!
//! Outcomes of credential checks and the status messages paired with them.

use serde::Serialize;

/// Status message for a completed registration
pub const REGISTRATION_SUCCESS: &str = "User Registered Successfully!";

/// Status message when the email already belongs to an account
pub const ALREADY_REGISTERED: &str = "Email Id Already Registered!";

/// Status message for accepted credentials
pub const CREDENTIALS_VALID: &str = "valid";

/// Status message for every rejected login. Deliberately the same whether
/// the email is unknown or the password is wrong.
pub const LOGIN_DENIED: &str = "Login Denied! Incorrect Username or Password";

/// Result of checking an email/password pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialCheck {
    Valid,
    Denied,
}

impl CredentialCheck {
    pub fn is_valid(&self) -> bool {
        matches!(self, CredentialCheck::Valid)
    }

    /// Human-readable status for this outcome
    pub fn as_status(&self) -> &'static str {
        match self {
            CredentialCheck::Valid => CREDENTIALS_VALID,
            CredentialCheck::Denied => LOGIN_DENIED,
        }
    }
}
