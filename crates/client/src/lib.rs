//! `stockhub-client`
//!
//! **Responsibility:** the client side of recording purchases and sales.
//!
//! This crate provides:
//! - Environment-driven configuration
//! - The persistence collaborator as a trait, plus an HTTP implementation
//! - The submitter (one round trip, no automatic retry)
//! - The per-dialog state record with an explicit submission state machine
//!
//! The backend stays the authority on stock; after a successful submission
//! the caller refreshes its catalog snapshot.

pub mod config;
pub mod dialog;
pub mod gateway;
pub mod http;
pub mod snapshot;
pub mod submitter;

pub use config::{ClientConfig, ConfigError};
pub use dialog::{DialogError, DialogMode, DialogState, LineDraft, LineUiState, SubmitOutcome, TransactionDialog};
pub use gateway::{FieldErrors, GatewayError, SubmitAck, TransactionGateway};
pub use http::HttpGateway;
pub use snapshot::Snapshot;
