//! Request and Response Models
//!
//! Data structures for API request and response payloads with validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use crate::models::{CredentialCheck, User};
use crate::utils::validation::{
    address_validator, email_validator, messages, mobile_validator, name_validator,
    password_validator, pincode_validator,
};

/// Request payload for registering a new account
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterUserRequest {
    /// Full name (1-255 characters)
    #[validate(custom(function = "name_validator"))]
    pub name: String,

    /// Mobile number
    #[validate(custom(function = "mobile_validator"))]
    pub mobile: i64,

    /// Email address (must be unique and valid format)
    #[validate(custom(function = "email_validator"))]
    pub email: String,

    /// Postal address
    #[validate(length(
        min = 1,
        max = 500,
        message = "Address must be between 1 and 500 characters"
    ))]
    #[validate(custom(function = "address_validator"))]
    pub address: String,

    /// Postal code
    #[validate(custom(function = "pincode_validator"))]
    pub pincode: i64,

    /// Password (8-128 characters, at most 72 bytes)
    #[validate(length(
        min = 8,
        max = 128,
        message = "Password must be between 8 and 128 characters"
    ))]
    #[validate(custom(function = "password_validator"))]
    pub password: String,
}

/// Request payload for logging in
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email cannot be empty"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password cannot be empty"))]
    #[validate(custom(function = "password_validator"))]
    pub password: String,
}

/// Response for a completed registration
#[derive(Debug, Serialize)]
pub struct RegisterUserResponse {
    pub message: String,
    pub user: User,
}

/// Response for a login attempt that was accepted
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub status: String,
    pub result: CredentialCheck,
    pub user: User,
}

/// Response for the duplicate-email check
#[derive(Debug, Serialize)]
pub struct RegisteredResponse {
    pub email: String,
    pub registered: bool,
}

/// Response carrying a user's first name
#[derive(Debug, Serialize)]
pub struct FirstNameResponse {
    pub email: String,
    pub first_name: String,
}

/// Response carrying a user's postal address
#[derive(Debug, Serialize)]
pub struct AddressResponse {
    pub email: String,
    pub address: String,
}

/// Response for health check
#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

/// Flatten validator errors into one readable message
pub fn describe_validation_errors(err: &ValidationErrors) -> String {
    let mut descriptions: Vec<String> = err
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                let message = match &error.message {
                    Some(message) => message.to_string(),
                    None => default_message(field, &error.code),
                };
                format!("{}: {}", field, message)
            })
        })
        .collect();

    descriptions.sort();
    descriptions.join(", ")
}

fn default_message(field: &str, code: &str) -> String {
    match code {
        "invalid_email" => messages::INVALID_EMAIL.to_string(),
        "invalid_name" => messages::INVALID_NAME.to_string(),
        "blank_address" => messages::INVALID_ADDRESS.to_string(),
        "invalid_mobile" => messages::INVALID_MOBILE.to_string(),
        "invalid_pincode" => messages::INVALID_PINCODE.to_string(),
        "password_too_long" => messages::PASSWORD_TOO_LONG.to_string(),
        _ => format!("Invalid value for field '{}'", field),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> RegisterUserRequest {
        RegisterUserRequest {
            name: "Jane Doe".to_string(),
            mobile: 9876543210,
            email: "jane@example.com".to_string(),
            address: "221B Baker Street, London".to_string(),
            pincode: 560001,
            password: "SecurePass123!".to_string(),
        }
    }

    #[test]
    fn test_valid_register_request() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_register_request_rejects_bad_fields() {
        let mut request = valid_request();
        request.email = "not-an-email".to_string();
        let err = request.validate().unwrap_err();
        assert!(describe_validation_errors(&err).contains(messages::INVALID_EMAIL));

        let mut request = valid_request();
        request.mobile = 0;
        let err = request.validate().unwrap_err();
        assert!(describe_validation_errors(&err).contains(messages::INVALID_MOBILE));

        let mut request = valid_request();
        request.pincode = -5;
        let err = request.validate().unwrap_err();
        assert!(describe_validation_errors(&err).contains(messages::INVALID_PINCODE));

        let mut request = valid_request();
        request.address = "   ".to_string();
        let err = request.validate().unwrap_err();
        assert!(describe_validation_errors(&err).contains(messages::INVALID_ADDRESS));

        let mut request = valid_request();
        request.password = "short".to_string();
        let err = request.validate().unwrap_err();
        assert!(describe_validation_errors(&err).contains(messages::INVALID_PASSWORD));
    }

    #[test]
    fn test_validation_messages_name_fields() {
        let mut request = valid_request();
        request.name = "R2-D2".to_string();
        request.email = "nope".to_string();

        let description = describe_validation_errors(&request.validate().unwrap_err());
        assert!(description.contains("email: "));
        assert!(description.contains("name: "));
    }

    #[test]
    fn test_passwords_over_bcrypt_limit_rejected() {
        let mut request = valid_request();
        request.password = format!("{}{}", "a".repeat(72), "REAL-SECRET");
        let err = request.validate().unwrap_err();
        assert!(describe_validation_errors(&err).contains(messages::PASSWORD_TOO_LONG));

        let login = LoginRequest {
            email: "jane@example.com".to_string(),
            password: "a".repeat(73),
        };
        assert!(login.validate().is_err());
    }

    #[test]
    fn test_login_request_requires_both_fields() {
        let request = LoginRequest {
            email: "".to_string(),
            password: "x".to_string(),
        };
        assert!(request.validate().is_err());
    }
}
