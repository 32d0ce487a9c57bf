//! Amounts, totals and stock-after previews for a batch.
//!
//! Recomputed on every input change, so it must accept invalid batches:
//! unresolved products contribute nothing, and a negative stock-after is only
//! flagged. Blocking is `validate`'s job.

use serde::Serialize;

use stockhub_catalog::ProductCatalog;
use stockhub_core::{LineId, Money, ProductId};

use crate::batch::{TransactionBatch, TransactionKind};

/// Preview of one line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineSummary {
    pub line_id: LineId,
    pub product_id: Option<ProductId>,
    pub quantity: i64,
    /// Sale: product price. Purchase: entered price (zero when missing).
    pub unit_price: Money,
    pub amount: Money,
    /// `None` when the product is not in the catalog.
    pub stock_before: Option<i64>,
    pub stock_after: Option<i64>,
}

impl LineSummary {
    /// Whether applying this line alone would take stock below zero.
    pub fn goes_negative(&self) -> bool {
        self.stock_after.is_some_and(|s| s < 0)
    }
}

/// Preview of a whole batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub kind: TransactionKind,
    pub lines: Vec<LineSummary>,
    pub total: Money,
    pub total_quantity: i64,
}

impl BatchSummary {
    pub fn item_count(&self) -> usize {
        self.lines.len()
    }

    pub fn has_negative_stock(&self) -> bool {
        self.lines.iter().any(LineSummary::goes_negative)
    }

    pub fn negative_lines(&self) -> impl Iterator<Item = &LineSummary> {
        self.lines.iter().filter(|l| l.goes_negative())
    }

    pub fn line(&self, line_id: LineId) -> Option<&LineSummary> {
        self.lines.iter().find(|l| l.line_id == line_id)
    }
}

/// Compute per-line amounts, the batch total and stock-after previews.
pub fn aggregate(batch: &TransactionBatch, catalog: &ProductCatalog) -> BatchSummary {
    let lines: Vec<LineSummary> = batch
        .lines()
        .iter()
        .map(|line| {
            let product = line.selected_product().and_then(|id| catalog.get(id));

            let unit_price = match batch.kind {
                TransactionKind::Sale => product.map(|p| p.price).unwrap_or(Money::ZERO),
                TransactionKind::Purchase => line.unit_price.unwrap_or(Money::ZERO),
            };

            let stock_before = product.map(|p| p.stock());
            let stock_after =
                stock_before.map(|s| s.saturating_add(batch.kind.stock_delta(line.quantity)));

            LineSummary {
                line_id: line.line_id,
                product_id: line.selected_product(),
                quantity: line.quantity,
                unit_price,
                amount: unit_price.times(line.quantity),
                stock_before,
                stock_after,
            }
        })
        .collect();

    let total = lines.iter().map(|l| l.amount).sum();
    let total_quantity = lines
        .iter()
        .fold(0i64, |acc, l| acc.saturating_add(l.quantity));

    BatchSummary {
        kind: batch.kind,
        lines,
        total,
        total_quantity,
    }
}
