//! Dashboard summary.
//!
//! Counts and totals over a catalog snapshot plus the recorded transactions.

use serde::Serialize;

use stockhub_catalog::{Category, Directory, ProductCatalog, Salesman, Unit};
use stockhub_core::{Money, ProductId};
use stockhub_transactions::{TransactionKind, TransactionRecord};

/// Default on-hand level at or below which a product is listed as low stock.
pub const DEFAULT_LOW_STOCK_THRESHOLD: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LowStockItem {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u64,
    pub unit: Unit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub product_count: usize,
    pub category_count: usize,
    pub salesman_count: usize,
    pub total_units: u64,
    /// Σ price × on-hand quantity.
    pub stock_value: Money,
    pub low_stock_threshold: u64,
    /// Lowest stock first.
    pub low_stock: Vec<LowStockItem>,
    pub purchase_count: usize,
    pub purchases_total: Money,
    pub sale_count: usize,
    pub sales_total: Money,
    /// Sales total minus purchases total.
    pub gross_margin: Money,
}

impl DashboardSummary {
    pub fn build(
        catalog: &ProductCatalog,
        categories: &Directory<Category>,
        salesmen: &Directory<Salesman>,
        records: &[TransactionRecord],
        low_stock_threshold: u64,
    ) -> Self {
        let low_stock = catalog
            .low_stock(low_stock_threshold)
            .into_iter()
            .map(|p| LowStockItem {
                product_id: p.id,
                name: p.name.clone(),
                quantity: p.quantity,
                unit: p.unit,
            })
            .collect();

        let of_kind = |kind: TransactionKind| records.iter().filter(move |r| r.kind == kind);

        let purchases_total: Money = of_kind(TransactionKind::Purchase).map(|r| r.total).sum();
        let sales_total: Money = of_kind(TransactionKind::Sale).map(|r| r.total).sum();

        Self {
            product_count: catalog.len(),
            category_count: categories.len(),
            salesman_count: salesmen.len(),
            total_units: catalog.total_units(),
            stock_value: catalog.stock_value(),
            low_stock_threshold,
            low_stock,
            purchase_count: of_kind(TransactionKind::Purchase).count(),
            purchases_total,
            sale_count: of_kind(TransactionKind::Sale).count(),
            sales_total,
            gross_margin: Money::new(
                sales_total
                    .minor_units()
                    .saturating_sub(purchases_total.minor_units()),
            ),
        }
    }
}
