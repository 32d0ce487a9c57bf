//! `stockhub-core`: domain building blocks.
//!
//! This crate contains **pure domain** primitives shared by the catalog,
//! transaction and reporting crates (no IO, no HTTP).

pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{CategoryId, LineId, ProductId, SalesmanId, TransactionId};
pub use value_object::Money;
