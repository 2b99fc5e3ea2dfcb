//! Authentication types for JWT sessions.
//!
//! Tokens are issued by the external auth provider. They identify the user
//! and carry the email used for admin allowlist promotion; they never carry
//! a role, which is always re-read from the users table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims for access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: Uuid,
    /// Email address of the authenticated user.
    #[serde(default)]
    pub email: Option<String>,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(user_id: Uuid, email: Option<&str>, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            email: email.map(str::to_string),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.sub
    }

    /// Returns the email from claims, if the provider included one.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}

/// Update own profile request.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProfileRequest {
    /// Display name (optional).
    pub full_name: Option<String>,
    /// Avatar URL (optional, empty string clears it).
    pub avatar_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn claims_sets_expiration_and_iat() {
        let user = Uuid::new_v4();
        let expires_at = Utc::now() + Duration::minutes(30);
        let before = Utc::now().timestamp();
        let claims = Claims::new(user, Some("me@example.com"), expires_at);
        let after = Utc::now().timestamp();

        assert_eq!(claims.user_id(), user);
        assert_eq!(claims.email(), Some("me@example.com"));
        assert!(claims.iat >= before);
        assert!(claims.iat <= after);
        assert_eq!(claims.exp, expires_at.timestamp());
    }

    #[test]
    fn claims_without_email_deserialize() {
        let user = Uuid::new_v4();
        let json = format!(r#"{{"sub":"{user}","iat":1,"exp":2}}"#);
        let claims: Claims = serde_json::from_str(&json).unwrap();
        assert_eq!(claims.user_id(), user);
        assert!(claims.email().is_none());
    }
}
