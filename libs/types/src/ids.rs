//! Identifier types for simulator entities
//!
//! Identifiers are opaque strings on the wire. Seeded accounts carry fixed
//! human-readable ids (`teacher-1`, `student-1`), while everything created at
//! runtime gets a UUID v7 so ids sort roughly by creation time.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generate a fresh time-sortable id
            pub fn new() -> Self {
                Self(Uuid::now_v7().to_string())
            }

            /// Get the id string
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }
    };
}

string_id!(
    /// Identifier of a registered user (teacher or student)
    UserId
);

string_id!(
    /// Identifier of a student storefront
    BusinessId
);

string_id!(
    /// Identifier of a product, unique within its business
    ProductId
);

string_id!(
    /// Identifier of a ledger record
    TransactionId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        let id1 = BusinessId::new();
        let id2 = BusinessId::new();
        assert_ne!(id1, id2, "BusinessIds should be unique");
    }

    #[test]
    fn test_seeded_id_keeps_its_text() {
        let id = UserId::from("student-1");
        assert_eq!(id.as_str(), "student-1");
        assert_eq!(id.to_string(), "student-1");
        assert!(id == *"student-1");
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = ProductId::from("p-42");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"p-42\"");

        let back: ProductId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_generated_id_is_uuid() {
        let id = TransactionId::new();
        assert!(Uuid::parse_str(id.as_str()).is_ok());
    }
}
