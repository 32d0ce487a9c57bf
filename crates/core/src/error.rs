//! Errors raised by the catalog and transaction rules.

use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

/// Deterministic failures of domain logic. Network and configuration
/// failures have their own types in `stockhub-client`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Malformed or out-of-range input.
    #[error("validation failed: {0}")]
    Validation(String),

    /// State that the rules guarantee cannot happen, happened.
    #[error("broken invariant: {0}")]
    Invariant(String),

    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// Lookup of a record the snapshot does not hold.
    #[error("unknown record: {0}")]
    Unknown(String),

    /// Two records share one identifier.
    #[error("duplicate record: {0}")]
    Duplicate(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::Invariant(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn unknown(what: impl Into<String>) -> Self {
        Self::Unknown(what.into())
    }

    pub fn duplicate(what: impl Into<String>) -> Self {
        Self::Duplicate(what.into())
    }
}
