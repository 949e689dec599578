//! Security Utilities
//!
//! Password hashing and verification.

use bcrypt::{hash, verify, DEFAULT_COST};

/// Default bcrypt cost for password hashing
pub const DEFAULT_BCRYPT_COST: u32 = DEFAULT_COST;

/// Hash a password with custom bcrypt cost
pub fn hash_password_with_cost(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    hash(password, cost)
}

/// Verify a password against its hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(password, hash)
}

/// Hash of a throwaway password, verified against when a login names an
/// unknown email so both denial paths cost one bcrypt round.
pub fn dummy_password_hash(cost: u32) -> Result<String, bcrypt::BcryptError> {
    hash("account-service-dummy-password", cost)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hashing() {
        let password = "test_password_123";
        let hash = hash_password_with_cost(password, 4).unwrap();

        assert_ne!(hash, password);
        assert!(verify_password(password, &hash).unwrap());
        assert!(!verify_password("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_password_with_cost("same", 4).unwrap();
        let second = hash_password_with_cost("same", 4).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_dummy_hash_rejects_user_passwords() {
        let dummy = dummy_password_hash(4).unwrap();
        assert!(!verify_password("SecurePass123!", &dummy).unwrap());
        assert!(!verify_password("", &dummy).unwrap());
    }

    #[test]
    fn test_bcrypt_cost_bounds() {
        #[allow(clippy::assertions_on_constants)]
        {
            assert!(DEFAULT_BCRYPT_COST >= 4, "bcrypt cost too low for security");
            assert!(DEFAULT_BCRYPT_COST <= 31, "bcrypt cost too high");
        }
    }
}
