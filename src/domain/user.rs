use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type UserId = Uuid;

/// Registration input: everything a user provides except the password.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
}

/// An account holder. The password is stored only as a hex digest; the
/// plaintext never reaches the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(profile: UserProfile, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name: profile.first_name,
            last_name: profile.last_name,
            username: profile.username,
            email: profile.email,
            password_hash,
            created_at: Utc::now(),
        }
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_profile() -> UserProfile {
        UserProfile {
            first_name: "Ana".into(),
            last_name: "Quispe".into(),
            username: "anaq".into(),
            email: "ana@example.com".into(),
        }
    }

    #[test]
    fn test_new_user_from_profile() {
        let user = User::new(sample_profile(), "cafe01".into());
        assert_eq!(user.email, "ana@example.com");
        assert_eq!(user.password_hash, "cafe01");
        assert_eq!(user.display_name(), "Ana Quispe");
    }
}
