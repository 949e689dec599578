//! Validation Utilities
//!
//! Input validation and normalization for account data.

use regex::Regex;
use std::borrow::Borrow;
use std::sync::OnceLock;
use validator::ValidationError;

/// Validates email address format
pub fn validate_email(email: &str) -> bool {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    regex.is_match(email.trim())
}

/// Normalizes email address to lowercase and removes whitespace
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validates that a name contains only letters, spaces, hyphens, dots and
/// apostrophes, and is between 1 and 255 characters
pub fn validate_name(name: &str) -> bool {
    let trimmed = name.trim();

    if trimmed.is_empty() || trimmed.chars().count() > 255 {
        return false;
    }

    static NAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = NAME_REGEX
        .get_or_init(|| Regex::new(r"^[\p{L}\s\-'.]+$").expect("Failed to compile name regex"));

    regex.is_match(trimmed)
}

/// First whitespace-delimited token of a full name
pub fn first_name(full_name: &str) -> &str {
    full_name.split_whitespace().next().unwrap_or_default()
}

/// Custom validator for email fields using the validator crate
pub fn email_validator(email: &str) -> Result<(), ValidationError> {
    if validate_email(email) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_email"))
    }
}

/// Custom validator for name fields using the validator crate
pub fn name_validator(name: &str) -> Result<(), ValidationError> {
    if validate_name(name) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_name"))
    }
}

/// Custom validator rejecting blank addresses
pub fn address_validator(address: &str) -> Result<(), ValidationError> {
    if address.trim().is_empty() {
        Err(ValidationError::new("blank_address"))
    } else {
        Ok(())
    }
}

/// Longest password bcrypt hashes without truncation
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Whether bcrypt would see the whole password
pub fn password_fits_bcrypt(password: &str) -> bool {
    password.len() <= MAX_PASSWORD_BYTES
}

/// Custom validator capping passwords at the bcrypt input limit
pub fn password_validator(password: &str) -> Result<(), ValidationError> {
    if password_fits_bcrypt(password) {
        Ok(())
    } else {
        Err(ValidationError::new("password_too_long"))
    }
}

/// Custom validator for mobile numbers: positive, at most 15 digits
pub fn mobile_validator<N: Borrow<i64>>(mobile: N) -> Result<(), ValidationError> {
    if (1..=999_999_999_999_999).contains(mobile.borrow()) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_mobile"))
    }
}

/// Custom validator for postal codes: positive, at most 8 digits
pub fn pincode_validator<N: Borrow<i64>>(pincode: N) -> Result<(), ValidationError> {
    if (1..=99_999_999).contains(pincode.borrow()) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_pincode"))
    }
}

/// Validation error messages for user-friendly responses
pub mod messages {
    pub const INVALID_EMAIL: &str = "Please enter a valid email address";
    pub const INVALID_NAME: &str =
        "Name must contain only letters, spaces, hyphens, dots, and apostrophes";
    pub const INVALID_MOBILE: &str = "Mobile number must be a positive number of up to 15 digits";
    pub const INVALID_PINCODE: &str = "Postal code must be a positive number of up to 8 digits";
    pub const INVALID_ADDRESS: &str = "Address must be between 1 and 500 characters";
    pub const INVALID_PASSWORD: &str = "Password must be between 8 and 128 characters";
    pub const PASSWORD_TOO_LONG: &str = "Password must be at most 72 bytes";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("user@example.com"));
        assert!(validate_email("test.user+tag@domain.co.uk"));
        assert!(validate_email("  padded@example.com "));
        assert!(!validate_email("invalid.email"));
        assert!(!validate_email("@domain.com"));
        assert!(!validate_email("user@"));
        assert!(!validate_email(""));
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  USER@EXAMPLE.COM  "), "user@example.com");
        assert_eq!(normalize_email("Test@Domain.org"), "test@domain.org");
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Jane Doe"));
        assert!(validate_name("Mary-Jane O'Connor"));
        assert!(validate_name("José Álvarez"));
        assert!(validate_name("J. R. Smith"));
        assert!(!validate_name(""));
        assert!(!validate_name("   "));
        assert!(!validate_name("John123"));
        assert!(!validate_name("John@Doe"));
        assert!(!validate_name(&"a".repeat(256)));
    }

    #[test]
    fn test_first_name() {
        assert_eq!(first_name("Jane Doe"), "Jane");
        assert_eq!(first_name("  Jane   Doe "), "Jane");
        assert_eq!(first_name("Cher"), "Cher");
        assert_eq!(first_name(""), "");
    }

    #[test]
    fn test_numeric_validators() {
        assert!(mobile_validator(9876543210i64).is_ok());
        assert!(mobile_validator(&0i64).is_err());
        assert!(mobile_validator(1_000_000_000_000_000i64).is_err());
        assert!(pincode_validator(&560001i64).is_ok());
        assert!(pincode_validator(-1i64).is_err());
    }

    #[test]
    fn test_password_validator_counts_bytes() {
        assert!(password_validator(&"a".repeat(72)).is_ok());
        assert!(password_validator(&"a".repeat(73)).is_err());
        // 36 two-byte characters fill the limit exactly
        assert!(password_validator(&"é".repeat(36)).is_ok());
        assert!(password_validator(&"é".repeat(37)).is_err());
    }

    #[test]
    fn test_address_validator() {
        assert!(address_validator("12 Baker Street").is_ok());
        assert!(address_validator("   ").is_err());
    }
}
