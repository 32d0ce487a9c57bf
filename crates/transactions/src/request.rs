//! Typed request schema sent to the backend.
//!
//! Built only from a [`ValidatedBatch`], so every payload has a resolved
//! product, a positive quantity and (for purchases) a positive price.

use chrono::NaiveDate;
use serde::Serialize;

use stockhub_core::{DomainError, DomainResult, Money, ProductId, SalesmanId};

use crate::batch::{TransactionKind, TransactionLine};
use crate::validate::ValidatedBatch;

/// Wire shape of one line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinePayload {
    pub product_id: ProductId,
    pub quantity: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salesman_id: Option<SalesmanId>,
    pub date: NaiveDate,
}

impl LinePayload {
    fn from_line(kind: TransactionKind, line: &TransactionLine) -> DomainResult<Self> {
        let product_id = line
            .selected_product()
            .ok_or_else(|| DomainError::invariant("validated line without product"))?;
        let quantity = u64::try_from(line.quantity)
            .map_err(|_| DomainError::invariant("validated line with negative quantity"))?;

        // Sales are priced server-side from the product; salesmen only apply to purchases.
        let (unit_price, salesman_id) = match kind {
            TransactionKind::Purchase => (line.unit_price, line.salesman_id),
            TransactionKind::Sale => (None, None),
        };

        Ok(Self {
            product_id,
            quantity,
            unit_price,
            salesman_id,
            date: line.date,
        })
    }
}

/// One submission: either a single line or a bulk list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitRequest {
    Single {
        kind: TransactionKind,
        line: LinePayload,
    },
    Bulk {
        kind: TransactionKind,
        items: Vec<LinePayload>,
    },
}

/// JSON body of a [`SubmitRequest`].
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum RequestBody<'a> {
    Single(&'a LinePayload),
    Bulk { items: &'a [LinePayload] },
}

impl SubmitRequest {
    /// Single-line request. The batch must hold exactly one line.
    pub fn single(batch: &ValidatedBatch) -> DomainResult<Self> {
        let kind = batch.kind();
        match batch.batch().lines() {
            [line] => Ok(SubmitRequest::Single {
                kind,
                line: LinePayload::from_line(kind, line)?,
            }),
            lines => Err(DomainError::validation(format!(
                "single {kind} request needs exactly one line, got {}",
                lines.len()
            ))),
        }
    }

    pub fn bulk(batch: &ValidatedBatch) -> DomainResult<Self> {
        let kind = batch.kind();
        let items = batch
            .batch()
            .lines()
            .iter()
            .map(|line| LinePayload::from_line(kind, line))
            .collect::<DomainResult<Vec<_>>>()?;
        Ok(SubmitRequest::Bulk { kind, items })
    }

    pub fn kind(&self) -> TransactionKind {
        match self {
            SubmitRequest::Single { kind, .. } | SubmitRequest::Bulk { kind, .. } => *kind,
        }
    }

    pub fn item_count(&self) -> usize {
        match self {
            SubmitRequest::Single { .. } => 1,
            SubmitRequest::Bulk { items, .. } => items.len(),
        }
    }

    /// Route relative to the API base, e.g. `purchases/bulk`.
    pub fn path(&self) -> String {
        match self {
            SubmitRequest::Single { kind, .. } => kind.resource().to_string(),
            SubmitRequest::Bulk { kind, .. } => format!("{}/bulk", kind.resource()),
        }
    }

    pub fn body(&self) -> RequestBody<'_> {
        match self {
            SubmitRequest::Single { line, .. } => RequestBody::Single(line),
            SubmitRequest::Bulk { items, .. } => RequestBody::Bulk {
                items: items.as_slice(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::TransactionBatch;
    use serde_json::json;
    use stockhub_catalog::{Product, ProductCatalog, Unit};
    use stockhub_core::CategoryId;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()
    }

    fn catalog() -> ProductCatalog {
        ProductCatalog::from_products([Product::new(
            ProductId::new(3),
            "Flour",
            "FL-1",
            CategoryId::new(1),
            Unit::Kg,
            Money::new(12_000),
            40,
        )
        .unwrap()])
        .unwrap()
    }

    #[test]
    fn single_purchase_body_is_flat() {
        let line = TransactionLine::purchase(ProductId::new(3), 2, Money::new(11_000), date())
            .with_salesman(SalesmanId::new(5));
        let batch = TransactionBatch::with_lines(TransactionKind::Purchase, vec![line]);
        let validated = ValidatedBatch::new(batch, &catalog()).unwrap();

        let req = SubmitRequest::single(&validated).unwrap();
        assert_eq!(req.path(), "purchases");
        assert_eq!(
            serde_json::to_value(req.body()).unwrap(),
            json!({
                "product_id": 3,
                "quantity": 2,
                "unit_price": 11000,
                "salesman_id": 5,
                "date": "2024-07-01"
            })
        );
    }

    #[test]
    fn bulk_sale_drops_price_and_salesman() {
        let mut line = TransactionLine::sale(ProductId::new(3), 1, date()).with_salesman(SalesmanId::new(5));
        line.unit_price = Some(Money::new(1));
        let batch = TransactionBatch::with_lines(TransactionKind::Sale, vec![line.clone(), line]);
        let validated = ValidatedBatch::new(batch, &catalog()).unwrap();

        let req = SubmitRequest::bulk(&validated).unwrap();
        assert_eq!(req.path(), "sales/bulk");
        assert_eq!(req.item_count(), 2);
        assert_eq!(
            serde_json::to_value(req.body()).unwrap(),
            json!({
                "items": [
                    {"product_id": 3, "quantity": 1, "date": "2024-07-01"},
                    {"product_id": 3, "quantity": 1, "date": "2024-07-01"}
                ]
            })
        );
    }

    #[test]
    fn single_request_needs_exactly_one_line() {
        let line = TransactionLine::sale(ProductId::new(3), 1, date());
        let batch = TransactionBatch::with_lines(TransactionKind::Sale, vec![line.clone(), line]);
        let validated = ValidatedBatch::new(batch, &catalog()).unwrap();
        assert!(SubmitRequest::single(&validated).is_err());
    }
}
