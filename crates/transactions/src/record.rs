use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use stockhub_core::{Money, ProductId, SalesmanId, TransactionId};

use crate::batch::TransactionKind;

/// A purchase or sale as recorded by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: TransactionId,
    pub kind: TransactionKind,
    pub product_id: ProductId,
    pub quantity: u64,
    pub unit_price: Money,
    pub total: Money,
    pub date: NaiveDate,
    #[serde(default)]
    pub salesman_id: Option<SalesmanId>,
}

impl TransactionRecord {
    /// Record with `total` derived from quantity and unit price.
    pub fn new(
        id: TransactionId,
        kind: TransactionKind,
        product_id: ProductId,
        quantity: u64,
        unit_price: Money,
        date: NaiveDate,
    ) -> Self {
        let total = unit_price.times(i64::try_from(quantity).unwrap_or(i64::MAX));
        Self {
            id,
            kind,
            product_id,
            quantity,
            unit_price,
            total,
            date,
            salesman_id: None,
        }
    }

    pub fn with_salesman(mut self, salesman_id: SalesmanId) -> Self {
        self.salesman_id = Some(salesman_id);
        self
    }
}
