//! Transaction recording rules.
//!
//! How a purchase or a sale is checked against the catalog snapshot
//! ([`validate`]), previewed ([`aggregate`]) and packaged into a typed request
//! for the backend ([`SubmitRequest`]). Everything here is pure; the network
//! round trip lives in `stockhub-client`.

pub mod aggregate;
pub mod batch;
pub mod record;
pub mod request;
pub mod validate;

pub use aggregate::{BatchSummary, LineSummary, aggregate};
pub use batch::{TransactionBatch, TransactionKind, TransactionLine};
pub use record::TransactionRecord;
pub use request::{LinePayload, RequestBody, SubmitRequest};
pub use validate::{ValidatedBatch, Violation, Violations, validate};
