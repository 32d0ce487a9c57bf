use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use stockhub_core::{LineId, Money, ProductId, SalesmanId};

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Goods bought in; increases stock.
    Purchase,
    /// Goods sold; decreases stock.
    Sale,
}

impl TransactionKind {
    /// Signed stock change for `quantity` units of this kind.
    pub fn stock_delta(self, quantity: i64) -> i64 {
        match self {
            TransactionKind::Purchase => quantity,
            TransactionKind::Sale => quantity.saturating_neg(),
        }
    }

    /// Collection name used by the backend routes.
    pub fn resource(self) -> &'static str {
        match self {
            TransactionKind::Purchase => "purchases",
            TransactionKind::Sale => "sales",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Purchase => "purchase",
            TransactionKind::Sale => "sale",
        }
    }
}

impl core::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One product + quantity (+ price) entry of a batch.
///
/// Lines are transient: they are built from dialog input and may be invalid
/// (unset product, non-positive quantity) until `validate` says otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionLine {
    #[serde(default)]
    pub line_id: LineId,
    pub product_id: Option<ProductId>,
    pub quantity: i64,
    /// Entered unit price. Required for purchases; sales use the product price.
    #[serde(default)]
    pub unit_price: Option<Money>,
    pub date: NaiveDate,
    /// Purchases only.
    #[serde(default)]
    pub salesman_id: Option<SalesmanId>,
}

impl TransactionLine {
    pub fn sale(product_id: ProductId, quantity: i64, date: NaiveDate) -> Self {
        Self {
            line_id: LineId::new(),
            product_id: Some(product_id),
            quantity,
            unit_price: None,
            date,
            salesman_id: None,
        }
    }

    pub fn purchase(product_id: ProductId, quantity: i64, unit_price: Money, date: NaiveDate) -> Self {
        Self {
            line_id: LineId::new(),
            product_id: Some(product_id),
            quantity,
            unit_price: Some(unit_price),
            date,
            salesman_id: None,
        }
    }

    pub fn with_salesman(mut self, salesman_id: SalesmanId) -> Self {
        self.salesman_id = Some(salesman_id);
        self
    }

    /// Product reference, if one is actually selected.
    pub fn selected_product(&self) -> Option<ProductId> {
        self.product_id.filter(|id| id.is_set())
    }
}

/// Ordered lines of one kind, submitted together as a unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionBatch {
    pub kind: TransactionKind,
    pub lines: Vec<TransactionLine>,
}

impl TransactionBatch {
    pub fn new(kind: TransactionKind) -> Self {
        Self {
            kind,
            lines: Vec::new(),
        }
    }

    pub fn with_lines(kind: TransactionKind, lines: Vec<TransactionLine>) -> Self {
        Self { kind, lines }
    }

    pub fn push(&mut self, line: TransactionLine) {
        self.lines.push(line);
    }

    pub fn lines(&self) -> &[TransactionLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
