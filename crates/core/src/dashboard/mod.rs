//! Admin dashboard counters.

use serde::{Deserialize, Serialize};

/// Overview shown on the admin landing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    /// All visitor messages.
    pub total_messages: u64,
    /// Messages without a reply.
    pub unreplied_messages: u64,
    /// Apps in the catalog.
    pub total_apps: u64,
}

impl DashboardStats {
    /// Messages that have a reply.
    #[must_use]
    pub const fn replied_messages(&self) -> u64 {
        self.total_messages.saturating_sub(self.unreplied_messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replied_messages() {
        let stats = DashboardStats {
            total_messages: 10,
            unreplied_messages: 3,
            total_apps: 6,
        };
        assert_eq!(stats.replied_messages(), 7);
    }

    #[test]
    fn test_serializes_snake_case() {
        let stats = DashboardStats {
            total_messages: 1,
            unreplied_messages: 1,
            total_apps: 0,
        };
        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["unreplied_messages"], 1);
    }
}
