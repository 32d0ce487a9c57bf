//! In-memory product catalog snapshot.
//!
//! The snapshot is whatever the caller last fetched from the backend. The
//! transaction core only reads it; refreshing after a successful submission is
//! the caller's job.

use stockhub_core::{CategoryId, DomainResult, Money, ProductId};

use crate::directory::Directory;
use crate::product::Product;

/// Read-only view over the products the backend returned.
#[derive(Debug, Clone, Default)]
pub struct ProductCatalog {
    products: Directory<Product>,
}

impl ProductCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog, checking each product and rejecting duplicate ids.
    pub fn from_products(products: impl IntoIterator<Item = Product>) -> DomainResult<Self> {
        let mut products_dir = Directory::new();
        for product in products {
            product.check()?;
            products_dir.insert(product)?;
        }
        Ok(Self {
            products: products_dir,
        })
    }

    pub fn get(&self, id: ProductId) -> Option<&Product> {
        if !id.is_set() {
            return None;
        }
        self.products.get(id)
    }

    pub fn require(&self, id: ProductId) -> DomainResult<&Product> {
        self.products.require(id)
    }

    pub fn find_by_code(&self, code: &str) -> Option<&Product> {
        let code = code.trim();
        self.products
            .iter()
            .find(|p| p.code.eq_ignore_ascii_case(code))
    }

    /// Products whose name or code contains `needle`, in catalog order.
    pub fn search<'a>(&'a self, needle: &'a str) -> impl Iterator<Item = &'a Product> + 'a {
        self.products.iter().filter(move |p| p.matches(needle))
    }

    pub fn in_category(&self, category: CategoryId) -> impl Iterator<Item = &Product> {
        self.products
            .iter()
            .filter(move |p| p.category_id == category)
    }

    /// Products at or below `threshold`, lowest stock first.
    ///
    /// Ties keep catalog order.
    pub fn low_stock(&self, threshold: u64) -> Vec<&Product> {
        let mut low: Vec<&Product> = self
            .products
            .iter()
            .filter(|p| p.is_low_stock(threshold))
            .collect();
        low.sort_by_key(|p| p.quantity);
        low
    }

    pub fn total_units(&self) -> u64 {
        self.products
            .iter()
            .fold(0u64, |acc, p| acc.saturating_add(p.quantity))
    }

    pub fn stock_value(&self) -> Money {
        self.products.iter().map(Product::stock_value).sum()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }
}
