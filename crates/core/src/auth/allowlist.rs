//! Admin email allowlist.

use std::collections::HashSet;

use super::UserRole;

/// Emails promoted to admin, compared case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct AdminAllowlist {
    emails: HashSet<String>,
}

impl AdminAllowlist {
    /// Parse a comma-separated list; entries are trimmed and lowercased.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let emails = raw
            .split(',')
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        Self { emails }
    }

    /// Whether the email is on the list.
    #[must_use]
    pub fn contains(&self, email: &str) -> bool {
        self.emails.contains(&email.trim().to_lowercase())
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.emails.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }

    /// Role to store after a sign-in. Promotes, never demotes.
    #[must_use]
    pub fn resolve_role(&self, current: UserRole, email: Option<&str>) -> UserRole {
        match email {
            Some(email) if self.contains(email) => UserRole::Admin,
            _ => current,
        }
    }
}
