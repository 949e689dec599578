//! User Model
//!
//! Account record and its storage representation.

use serde::{Deserialize, Serialize};

/// Account record returned to callers
///
/// Carries every profile field of a stored account. The password never
/// leaves the storage layer, not even as a hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Full name as registered, e.g. "Jane Doe"
    pub name: String,

    /// Mobile number
    pub mobile: i64,

    /// Email address (unique, normalized); identifies the account
    pub email: String,

    /// Postal address
    pub address: String,

    /// Postal code
    pub pincode: i64,
}

impl User {
    /// First whitespace-delimited token of the name
    pub fn first_name(&self) -> &str {
        crate::utils::validation::first_name(&self.name)
    }
}

/// Internal user representation including the bcrypt password hash
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct UserWithPassword {
    pub name: String,
    pub mobile: i64,
    pub email: String,
    pub address: String,
    pub pincode: i64,
    pub password_hash: String,
}

impl From<UserWithPassword> for User {
    /// Strips the password hash
    fn from(user_with_password: UserWithPassword) -> Self {
        User {
            name: user_with_password.name,
            mobile: user_with_password.mobile,
            email: user_with_password.email,
            address: user_with_password.address,
            pincode: user_with_password.pincode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_with_password_conversion() {
        let user_with_password = UserWithPassword {
            name: "Jane Doe".to_string(),
            mobile: 9876543210,
            email: "jane@example.com".to_string(),
            address: "221B Baker Street".to_string(),
            pincode: 560001,
            password_hash: "$2b$04$hash".to_string(),
        };

        let user: User = user_with_password.into();

        assert_eq!(user.name, "Jane Doe");
        assert_eq!(user.mobile, 9876543210);
        assert_eq!(user.email, "jane@example.com");
        assert_eq!(user.address, "221B Baker Street");
        assert_eq!(user.pincode, 560001);
        assert_eq!(user.first_name(), "Jane");
    }

    #[test]
    fn test_serialized_user_has_no_password() {
        let user = User {
            name: "Jane Doe".to_string(),
            mobile: 1,
            email: "jane@example.com".to_string(),
            address: "x".to_string(),
            pincode: 1,
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "jane@example.com");
    }
}
