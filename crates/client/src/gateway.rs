//! The persistence collaborator.
//!
//! Everything durable happens behind this trait. The HTTP implementation lives
//! in [`crate::http`]; tests plug in in-memory fakes.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use stockhub_catalog::{Category, Product, Salesman};
use stockhub_core::DomainError;
use stockhub_transactions::{SubmitRequest, TransactionKind, TransactionRecord};

/// Successful submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitAck {
    /// Human-readable confirmation from the backend, if it sent one.
    pub message: Option<String>,
}

/// Field → message pairs from a rejected submission, in the order received.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<(String, String)>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.push(field, message);
        self
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push((field.into(), message.into()));
    }

    /// The message a form shows.
    pub fn first_message(&self) -> Option<&str> {
        self.0.first().map(|(_, m)| m.as_str())
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, m)| m.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(f, m)| (f.as_str(), m.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse a validation-failure body.
    ///
    /// Accepts `{"errors": {"field": ["msg", ...]}}` as well as a flat
    /// `{"field": "msg"}` map. A body with no field entries but a top-level
    /// `"message"` yields that message under the `message` field.
    pub fn from_body(body: &Value) -> Self {
        let mut out = FieldErrors::new();
        let Some(obj) = body.as_object() else {
            return out;
        };

        let fields = match obj.get("errors").and_then(Value::as_object) {
            Some(errors) => errors.iter().collect::<Vec<_>>(),
            None => obj.iter().filter(|(k, _)| k.as_str() != "message").collect(),
        };

        for (field, value) in fields {
            let message = match value {
                Value::String(s) => Some(s.clone()),
                Value::Array(items) => items.iter().find_map(|v| v.as_str().map(str::to_string)),
                _ => None,
            };
            if let Some(message) = message {
                out.push(field.clone(), message);
            }
        }

        if out.is_empty() {
            if let Some(message) = obj.get("message").and_then(Value::as_str) {
                out.push("message", message);
            }
        }
        out
    }
}

#[derive(Debug, Error)]
pub enum GatewayError {
    /// The backend refused the request with field-level messages.
    #[error("{}", .0.first_message().unwrap_or("submission rejected"))]
    Rejected(FieldErrors),
    #[error("network error: {0}")]
    Network(String),
    #[error("API error ({0}): {1}")]
    Api(u16, String),
    #[error("parse error: {0}")]
    Parse(String),
    /// The backend returned records that break domain invariants.
    #[error("invalid data from backend: {0}")]
    InvalidData(#[from] DomainError),
}

impl GatewayError {
    /// Message suitable for showing inline in a form.
    pub fn user_message(&self) -> String {
        match self {
            GatewayError::Rejected(fields) => fields
                .first_message()
                .unwrap_or("submission rejected")
                .to_string(),
            other => other.to_string(),
        }
    }
}

#[async_trait]
pub trait TransactionGateway: Send + Sync {
    /// Send one request. One attempt; retrying is the user's call.
    async fn submit(&self, request: &SubmitRequest) -> Result<SubmitAck, GatewayError>;

    async fn products(&self) -> Result<Vec<Product>, GatewayError>;

    async fn categories(&self) -> Result<Vec<Category>, GatewayError>;

    async fn salesmen(&self) -> Result<Vec<Salesman>, GatewayError>;

    /// Recorded transactions of one kind.
    async fn transactions(&self, kind: TransactionKind) -> Result<Vec<TransactionRecord>, GatewayError>;
}
