//! Strongly-typed identifiers used across the domain.
//!
//! Records owned by the backend carry numeric keys; `0` is never a valid key
//! and stands for "nothing selected" in form state. Transaction lines get a
//! client-side UUID so per-line UI state can be keyed before anything is saved.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Identifier of a product.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u64);

/// Identifier of a product category.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(u64);

/// Identifier of a salesman (supplier-side contact on purchases).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SalesmanId(u64);

/// Identifier of a transaction recorded by the backend.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(u64);

/// Client-side identifier of a transaction line inside a dialog.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(Uuid);

macro_rules! impl_record_id {
    ($t:ty, $name:literal) => {
        impl $t {
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            pub const fn get(self) -> u64 {
                self.0
            }

            /// Whether this identifier points at a record (`0` means unset).
            pub const fn is_set(self) -> bool {
                self.0 != 0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<u64> for $t {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl From<$t> for u64 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let raw = s
                    .trim()
                    .parse::<u64>()
                    .map_err(|e| DomainError::invalid_id(format!("{}: {}", $name, e)))?;
                if raw == 0 {
                    return Err(DomainError::invalid_id(format!("{}: must be non-zero", $name)));
                }
                Ok(Self(raw))
            }
        }
    };
}

impl_record_id!(ProductId, "ProductId");
impl_record_id!(CategoryId, "CategoryId");
impl_record_id!(SalesmanId, "SalesmanId");
impl_record_id!(TransactionId, "TransactionId");

impl LineId {
    /// Create a new line identifier.
    ///
    /// Uses UUIDv7 (time-ordered), so lines sort in creation order.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for LineId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for LineId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for LineId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uuid =
            Uuid::from_str(s).map_err(|e| DomainError::invalid_id(format!("LineId: {e}")))?;
        Ok(Self(uuid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numeric_ids_and_trims_whitespace() {
        let id: ProductId = " 42 ".parse().unwrap();
        assert_eq!(id.get(), 42);
        assert!(id.is_set());
    }

    #[test]
    fn zero_is_not_a_valid_record_id() {
        let err = "0".parse::<CategoryId>().unwrap_err();
        assert!(matches!(err, DomainError::InvalidId(msg) if msg.contains("CategoryId")));
        assert!(!SalesmanId::new(0).is_set());
    }

    #[test]
    fn non_numeric_id_is_rejected() {
        assert!("abc".parse::<ProductId>().is_err());
        assert!("-3".parse::<TransactionId>().is_err());
    }

    #[test]
    fn record_ids_serialize_as_bare_numbers() {
        let json = serde_json::to_string(&ProductId::new(7)).unwrap();
        assert_eq!(json, "7");
        let back: ProductId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ProductId::new(7));
    }

    #[test]
    fn line_ids_are_unique() {
        assert_ne!(LineId::new(), LineId::new());
        let id = LineId::new();
        let parsed: LineId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }
}
