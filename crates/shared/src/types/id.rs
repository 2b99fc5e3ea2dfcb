//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `MessageId` where an `AppId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s.trim())?))
            }
        }
    };
}

typed_id!(AppId, "Unique identifier for an app in the catalog.");
typed_id!(MessageId, "Unique identifier for a visitor message.");
typed_id!(UserId, "Unique identifier for a user profile.");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display_round_trip() {
        let raw = "0190f3a4-7b7e-7c3a-9d2e-1f2a3b4c5d6e";
        let id: AppId = raw.parse().unwrap();
        assert_eq!(id.to_string(), raw);
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let id: AppId = " 0190f3a4-7b7e-7c3a-9d2e-1f2a3b4c5d6e ".parse().unwrap();
        assert_eq!(id.to_string(), "0190f3a4-7b7e-7c3a-9d2e-1f2a3b4c5d6e");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("not-an-id".parse::<AppId>().is_err());
        assert!("".parse::<MessageId>().is_err());
    }

    #[test]
    fn test_serde_is_transparent() {
        let uuid = Uuid::new_v4();
        let json = serde_json::to_string(&UserId::from_uuid(uuid)).unwrap();
        assert_eq!(json, format!("\"{uuid}\""));
    }

    #[test]
    fn test_new_ids_are_distinct() {
        assert_ne!(AppId::new(), AppId::new());
    }
}
