//! Authentication Module
//!
//! Credential verification for the registry's single staff account.
//! Passwords are never stored or compared in plaintext: the configured
//! secret is a hex SHA-256 digest of `salt || password`, and verification
//! recomputes the digest and compares it in constant time.

use sha2::{Digest, Sha256};

/// Authentication configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Staff account name.
    pub username: String,
    /// Salt prepended to the password before hashing.
    pub password_salt: String,
    /// Hex-encoded SHA-256 of `salt || password`.
    pub password_hash: String,
}

impl AuthConfig {
    /// Load credentials from environment variables.
    ///
    /// - `GEMCERT_ADMIN_USERNAME` (default: "admin")
    /// - `GEMCERT_ADMIN_SALT` (default: empty)
    /// - `GEMCERT_ADMIN_PASSWORD_HASH` (required in production; empty
    ///   default disables login entirely rather than admitting everyone)
    pub fn from_env() -> Self {
        Self {
            username: std::env::var("GEMCERT_ADMIN_USERNAME")
                .unwrap_or_else(|_| "admin".to_string()),
            password_salt: std::env::var("GEMCERT_ADMIN_SALT").unwrap_or_default(),
            password_hash: std::env::var("GEMCERT_ADMIN_PASSWORD_HASH").unwrap_or_default(),
        }
    }

    /// Build a config from a plaintext password (tests and provisioning).
    pub fn with_password(username: &str, salt: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password_salt: salt.to_string(),
            password_hash: hash_password(salt, password),
        }
    }

    /// Verify a login attempt. Always runs the hash comparison so a wrong
    /// username costs the same as a wrong password.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        if self.password_hash.is_empty() {
            return false;
        }
        let computed = hash_password(&self.password_salt, password);
        let hash_ok = constant_time_eq(computed.as_bytes(), self.password_hash.as_bytes());
        let user_ok = constant_time_eq(username.as_bytes(), self.username.as_bytes());
        hash_ok && user_ok
    }
}

/// Hex SHA-256 of `salt || password`.
pub fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_correct_credentials() {
        let config = AuthConfig::with_password("admin", "pepper", "s3cret");
        assert!(config.verify("admin", "s3cret"));
    }

    #[test]
    fn test_verify_rejects_wrong_password() {
        let config = AuthConfig::with_password("admin", "pepper", "s3cret");
        assert!(!config.verify("admin", "wrong"));
        assert!(!config.verify("admin", ""));
    }

    #[test]
    fn test_verify_rejects_wrong_username() {
        let config = AuthConfig::with_password("admin", "pepper", "s3cret");
        assert!(!config.verify("root", "s3cret"));
    }

    #[test]
    fn test_empty_hash_disables_login() {
        let config = AuthConfig {
            username: "admin".to_string(),
            password_salt: String::new(),
            password_hash: String::new(),
        };
        assert!(!config.verify("admin", ""));
        assert!(!config.verify("admin", "anything"));
    }

    #[test]
    fn test_salt_changes_hash() {
        assert_ne!(hash_password("a", "pw"), hash_password("b", "pw"));
    }
}
