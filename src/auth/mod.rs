use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::domain::User;

/// Hash a password into a lowercase hex SHA-256 digest. This mirrors what
/// the mobile clients send over the wire; the digest is what the store
/// compares against. Hashing strength is an explicit non-goal here.
pub fn hash_password(password: &str) -> String {
    format!("{:x}", Sha256::digest(password.as_bytes()))
}

/// Check a plaintext password against a stored digest.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    hash_password(password) == stored_hash
}

/// An authenticated user. Created by login, dropped by logout; there is no
/// ambient current-user state anywhere else.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub started_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user: User) -> Self {
        Self {
            user,
            started_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_is_hex_sha256() {
        let hash = hash_password("secret123");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        // Deterministic
        assert_eq!(hash, hash_password("secret123"));
    }

    #[test]
    fn test_verify_password() {
        let hash = hash_password("secret123");
        assert!(verify_password("secret123", &hash));
        assert!(!verify_password("secret124", &hash));
    }
}
