//! Catalog domain module.
//!
//! Products, categories and salesmen as read from the backend, plus the
//! in-memory `ProductCatalog` snapshot that transaction validation and
//! aggregation read from. Deterministic domain logic only (no IO).

pub mod catalog;
pub mod category;
pub mod directory;
pub mod product;
pub mod salesman;

pub use catalog::ProductCatalog;
pub use category::Category;
pub use directory::Directory;
pub use product::{Product, Unit};
pub use salesman::{ContactInfo, Salesman};
