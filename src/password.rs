//! Password hashing for user registration and login.
//!
//! Passwords are always stored as salted bcrypt hashes; the login endpoint
//! compares hashes, never plaintext.

use std::fmt::Display;

use bcrypt::{BcryptError, hash, verify};
use serde::{Deserialize, Serialize};

use crate::Error;

/// The minimum length accepted for a raw password.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// A salted and hashed password.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// An alias for the default encryption cost for hashing passwords.
    pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

    /// Hash a raw password with the specified `cost`.
    ///
    /// `cost` increases the rounds of hashing and therefore the time needed to
    /// verify a password. Pass in [PasswordHash::DEFAULT_COST] to use the
    /// recommended cost; tests use a lower cost to stay fast.
    ///
    /// # Errors
    ///
    /// Returns [Error::PasswordTooShort] if the password is shorter than
    /// [MIN_PASSWORD_LENGTH], or [Error::HashingError] if hashing failed.
    pub fn from_raw_password(raw_password: &str, cost: u32) -> Result<Self, Error> {
        if raw_password.len() < MIN_PASSWORD_LENGTH {
            return Err(Error::PasswordTooShort(MIN_PASSWORD_LENGTH));
        }

        match hash(raw_password, cost) {
            Ok(password_hash) => Ok(Self(password_hash)),
            Err(error) => Err(Error::HashingError(error.to_string())),
        }
    }

    /// Create a new `PasswordHash` without any validation.
    ///
    /// The caller should ensure that `raw_password_hash` is a valid password
    /// hash (e.g., one read back from the database).
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because
    /// if an invalid hash is provided it will cause incorrect behaviour but
    /// not affect memory safety.
    pub fn new_unchecked(raw_password_hash: &str) -> Self {
        Self(raw_password_hash.to_string())
    }

    /// Check that `raw_password` matches the stored password.
    pub fn verify(&self, raw_password: &str) -> Result<bool, BcryptError> {
        verify(raw_password, &self.0)
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod password_hash_tests {
    use crate::Error;

    use super::{MIN_PASSWORD_LENGTH, PasswordHash};

    const TEST_COST: u32 = 4;

    #[test]
    fn from_raw_password_rejects_short_passwords() {
        let result = PasswordHash::from_raw_password("hunter2", TEST_COST);

        assert_eq!(result, Err(Error::PasswordTooShort(MIN_PASSWORD_LENGTH)));
    }

    #[test]
    fn hash_verifies_against_original_password() {
        let hash = PasswordHash::from_raw_password("averygoodpassword", TEST_COST).unwrap();

        assert!(hash.verify("averygoodpassword").unwrap());
        assert!(!hash.verify("anincorrectpassword").unwrap());
    }

    #[test]
    fn hash_is_not_the_plaintext_password() {
        let hash = PasswordHash::from_raw_password("averygoodpassword", TEST_COST).unwrap();

        assert_ne!(hash.as_ref(), "averygoodpassword");
    }
}
