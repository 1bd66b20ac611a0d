//! Strongly-typed ID wrappers for all entity types
//!
//! Using newtype wrappers prevents accidentally mixing up IDs from different
//! entity types at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Get the underlying UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Parse an ID from a full UUID string
            pub fn parse(s: &str) -> Result<Self, uuid::Error> {
                Ok(Self(Uuid::parse_str(s)?))
            }

            /// Check whether a user-typed identifier refers to this ID
            ///
            /// Accepts the full UUID, the short display form (`cli-1a2b3c4d`)
            /// or the bare short hex prefix.
            pub fn matches(&self, identifier: &str) -> bool {
                let identifier = identifier.trim().to_lowercase();
                let full = self.0.to_string();
                if identifier == full {
                    return true;
                }
                let short = identifier
                    .strip_prefix($display_prefix)
                    .unwrap_or(identifier.as_str());
                short.len() >= 8 && full.starts_with(short)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(&format!("{}{}", $display_prefix, &self.0.to_string()[..8]))
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                if let Ok(uuid) = Uuid::parse_str(s) {
                    return Ok(Self(uuid));
                }
                let s = s.strip_prefix($display_prefix).unwrap_or(s);
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

define_id!(ClientId, "cli-");
define_id!(ProductId, "prd-");
define_id!(ServiceId, "srv-");
define_id!(OrderId, "os-");
define_id!(LineItemId, "itm-");
define_id!(PaymentId, "pay-");
define_id!(StatusChangeId, "hs-");
define_id!(CashFlowId, "cf-");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_creation() {
        let id = ClientId::new();
        assert!(!id.as_uuid().is_nil());
    }

    #[test]
    fn test_id_display() {
        let id = OrderId::new();
        let display = id.to_string();
        assert!(display.starts_with("os-"));
        assert_eq!(display.len(), 11);
    }

    #[test]
    fn test_id_uniqueness() {
        let id1 = PaymentId::new();
        let id2 = id1;
        assert_eq!(id1, id2);
        assert_ne!(id1, PaymentId::new());
    }

    #[test]
    fn test_id_serialization() {
        let id = CashFlowId::new();
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: CashFlowId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn test_id_parse() {
        let uuid_str = "550e8400-e29b-41d4-a716-446655440000";
        let id = ClientId::parse(uuid_str).unwrap();
        assert_eq!(id.as_uuid().to_string(), uuid_str);
    }

    #[test]
    fn test_matches_short_forms() {
        let id = ClientId::parse("550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert!(id.matches("550e8400-e29b-41d4-a716-446655440000"));
        assert!(id.matches("cli-550e8400"));
        assert!(id.matches("550E8400"));
        assert!(!id.matches("550e"));
        assert!(!id.matches("cli-deadbeef"));
    }
}
