//! Roles and admin access decisions.
//!
//! Every admin request re-reads the caller's role from the users table; a
//! token only proves identity. Accounts whose email is on the allowlist are
//! promoted to admin when their profile is ensured.

mod allowlist;

pub use allowlist::AdminAllowlist;

use serde::{Deserialize, Serialize};

use folio_shared::types::UserId;

/// User roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Signed-in visitor.
    User,
    /// Site owner: manages content, apps, and messages.
    Admin,
}

impl UserRole {
    /// Returns true if this role can use the admin API.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// The caller as known to the record store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// User ID (token subject).
    pub user_id: UserId,
    /// Email on the profile.
    pub email: Option<String>,
    /// Role read from the store.
    pub role: UserRole,
}

/// Outcome of an admin authorization check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// Caller is an admin.
    Granted(Principal),
    /// No valid session.
    Unauthenticated,
    /// Signed in but not an admin.
    Forbidden,
}

impl AccessDecision {
    /// Decide admin access from the caller's stored profile.
    #[must_use]
    pub fn for_admin(principal: Option<Principal>) -> Self {
        match principal {
            None => Self::Unauthenticated,
            Some(p) if p.role.is_admin() => Self::Granted(p),
            Some(_) => Self::Forbidden,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(role: UserRole) -> Principal {
        Principal {
            user_id: UserId::new(),
            email: Some("me@example.com".into()),
            role,
        }
    }

    #[test]
    fn test_admin_granted() {
        let p = principal(UserRole::Admin);
        assert_eq!(
            AccessDecision::for_admin(Some(p.clone())),
            AccessDecision::Granted(p)
        );
    }

    #[test]
    fn test_user_forbidden() {
        assert_eq!(
            AccessDecision::for_admin(Some(principal(UserRole::User))),
            AccessDecision::Forbidden
        );
    }

    #[test]
    fn test_missing_principal_unauthenticated() {
        assert_eq!(
            AccessDecision::for_admin(None),
            AccessDecision::Unauthenticated
        );
    }

    #[test]
    fn test_role_serde() {
        assert_eq!(serde_json::to_string(&UserRole::Admin).unwrap(), "\"admin\"");
        let role: UserRole = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(role, UserRole::User);
    }
}
