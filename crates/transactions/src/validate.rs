//! Local checks run before a batch may be submitted.
//!
//! The checks run against the last catalog snapshot the caller holds, so a
//! stock check that passes here can still be refused by the backend.

use thiserror::Error;

use stockhub_catalog::ProductCatalog;
use stockhub_core::LineId;

use crate::batch::{TransactionBatch, TransactionKind};

/// A single reason a batch cannot be submitted.
///
/// `line` is the 1-based position of the offending line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("no items")]
    NoItems,

    #[error("line {line}: select a product")]
    MissingProduct { line: usize },

    #[error("line {line}: quantity must be a positive whole number")]
    InvalidQuantity { line: usize },

    #[error("line {line}: purchase price must be greater than zero")]
    InvalidPrice { line: usize },

    #[error("line {line}: not enough stock for {product} (available: {available})")]
    InsufficientStock {
        line: usize,
        product: String,
        available: u64,
        requested: i64,
    },
}

impl Violation {
    /// 1-based line position, `None` for batch-level violations.
    pub fn line(&self) -> Option<usize> {
        match self {
            Violation::NoItems => None,
            Violation::MissingProduct { line }
            | Violation::InvalidQuantity { line }
            | Violation::InvalidPrice { line }
            | Violation::InsufficientStock { line, .. } => Some(*line),
        }
    }
}

/// Non-empty list of violations, in line order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violations(Vec<Violation>);

impl Violations {
    /// The violation a form shows.
    pub fn first(&self) -> &Violation {
        &self.0[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }

    /// Violations attached to the line with `line_id` in `batch`.
    pub fn for_line<'a>(
        &'a self,
        batch: &'a TransactionBatch,
        line_id: LineId,
    ) -> impl Iterator<Item = &'a Violation> + 'a {
        let position = batch
            .lines()
            .iter()
            .position(|l| l.line_id == line_id)
            .map(|i| i + 1);
        self.0
            .iter()
            .filter(move |v| position.is_some() && v.line() == position)
    }

    pub fn into_vec(self) -> Vec<Violation> {
        self.0
    }
}

impl core::fmt::Display for Violations {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(self.first(), f)
    }
}

impl std::error::Error for Violations {}

/// Check `batch` against `catalog`.
///
/// Each sale line is checked against the product's stock on its own; the
/// catalog snapshot is not drawn down by earlier lines.
pub fn validate(batch: &TransactionBatch, catalog: &ProductCatalog) -> Result<(), Violations> {
    if batch.is_empty() {
        return Err(Violations(vec![Violation::NoItems]));
    }

    let mut found = Vec::new();

    for (i, line) in batch.lines().iter().enumerate() {
        let position = i + 1;
        let product = line.selected_product().and_then(|id| catalog.get(id));

        if product.is_none() {
            found.push(Violation::MissingProduct { line: position });
        }

        let quantity_ok = line.quantity > 0;
        if !quantity_ok {
            found.push(Violation::InvalidQuantity { line: position });
        }

        match batch.kind {
            TransactionKind::Purchase => {
                if !line.unit_price.is_some_and(|p| p.is_positive()) {
                    found.push(Violation::InvalidPrice { line: position });
                }
            }
            TransactionKind::Sale => {
                if let (Some(product), true) = (product, quantity_ok) {
                    if line.quantity > product.stock() {
                        found.push(Violation::InsufficientStock {
                            line: position,
                            product: product.name.clone(),
                            available: product.quantity,
                            requested: line.quantity,
                        });
                    }
                }
            }
        }
    }

    if found.is_empty() {
        Ok(())
    } else {
        Err(Violations(found))
    }
}

/// A batch that passed [`validate`] against some catalog snapshot.
///
/// Requests are only built from this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedBatch {
    batch: TransactionBatch,
}

impl ValidatedBatch {
    pub fn new(batch: TransactionBatch, catalog: &ProductCatalog) -> Result<Self, Violations> {
        validate(&batch, catalog)?;
        Ok(Self { batch })
    }

    pub fn batch(&self) -> &TransactionBatch {
        &self.batch
    }

    pub fn kind(&self) -> TransactionKind {
        self.batch.kind
    }

    pub fn len(&self) -> usize {
        self.batch.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batch.is_empty()
    }

    pub fn into_inner(self) -> TransactionBatch {
        self.batch
    }
}
