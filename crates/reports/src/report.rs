//! Transaction reports: filtered rows with totals.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use stockhub_catalog::{Directory, ProductCatalog, Salesman};
use stockhub_core::{CategoryId, DomainError, DomainResult, Money, ProductId, SalesmanId, TransactionId};
use stockhub_transactions::{TransactionKind, TransactionRecord};

/// Which recorded transactions a report covers. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFilter {
    pub kind: Option<TransactionKind>,
    /// Inclusive.
    pub from: Option<NaiveDate>,
    /// Inclusive.
    pub to: Option<NaiveDate>,
    pub product_id: Option<ProductId>,
    pub category_id: Option<CategoryId>,
    pub salesman_id: Option<SalesmanId>,
}

impl ReportFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn between(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    pub fn product(mut self, product_id: ProductId) -> Self {
        self.product_id = Some(product_id);
        self
    }

    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn salesman(mut self, salesman_id: SalesmanId) -> Self {
        self.salesman_id = Some(salesman_id);
        self
    }

    pub fn check(&self) -> DomainResult<()> {
        if let (Some(from), Some(to)) = (self.from, self.to) {
            if from > to {
                return Err(DomainError::validation(format!(
                    "report range starts after it ends ({from} > {to})"
                )));
            }
        }
        Ok(())
    }

    /// Category filtering resolves the product through `catalog`; records
    /// for products no longer in the catalog never match a category.
    pub fn matches(&self, record: &TransactionRecord, catalog: &ProductCatalog) -> bool {
        self.kind.is_none_or(|k| record.kind == k)
            && self.from.is_none_or(|d| record.date >= d)
            && self.to.is_none_or(|d| record.date <= d)
            && self.product_id.is_none_or(|p| record.product_id == p)
            && self.salesman_id.is_none_or(|s| record.salesman_id == Some(s))
            && self.category_id.is_none_or(|c| {
                catalog
                    .get(record.product_id)
                    .is_some_and(|p| p.category_id == c)
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub id: TransactionId,
    pub date: NaiveDate,
    pub kind: TransactionKind,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u64,
    pub unit_price: Money,
    pub total: Money,
    pub salesman: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductBreakdown {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u64,
    pub amount: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Oldest first; ties keep input order.
    pub rows: Vec<ReportRow>,
    pub total_quantity: u64,
    pub total_amount: Money,
    /// Highest amount first.
    pub by_product: Vec<ProductBreakdown>,
}

impl Report {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

pub fn build_report(
    records: &[TransactionRecord],
    catalog: &ProductCatalog,
    salesmen: &Directory<Salesman>,
    filter: &ReportFilter,
) -> DomainResult<Report> {
    filter.check()?;

    let product_name = |id: ProductId| {
        catalog
            .get(id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| format!("#{id}"))
    };

    let mut rows: Vec<ReportRow> = records
        .iter()
        .filter(|r| filter.matches(r, catalog))
        .map(|r| ReportRow {
            id: r.id,
            date: r.date,
            kind: r.kind,
            product_id: r.product_id,
            product_name: product_name(r.product_id),
            quantity: r.quantity,
            unit_price: r.unit_price,
            total: r.total,
            salesman: r
                .salesman_id
                .and_then(|s| salesmen.get(s))
                .map(|s| s.name.clone()),
        })
        .collect();
    rows.sort_by_key(|r| r.date);

    let mut breakdown: Vec<ProductBreakdown> = Vec::new();
    let mut slot: HashMap<ProductId, usize> = HashMap::new();
    for row in &rows {
        let i = *slot.entry(row.product_id).or_insert_with(|| {
            breakdown.push(ProductBreakdown {
                product_id: row.product_id,
                product_name: row.product_name.clone(),
                quantity: 0,
                amount: Money::ZERO,
            });
            breakdown.len() - 1
        });
        breakdown[i].quantity = breakdown[i].quantity.saturating_add(row.quantity);
        breakdown[i].amount += row.total;
    }
    breakdown.sort_by(|a, b| b.amount.cmp(&a.amount));

    Ok(Report {
        total_quantity: rows.iter().fold(0u64, |acc, r| acc.saturating_add(r.quantity)),
        total_amount: rows.iter().map(|r| r.total).sum(),
        rows,
        by_product: breakdown,
    })
}
