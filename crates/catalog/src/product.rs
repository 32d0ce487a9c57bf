use serde::{Deserialize, Serialize};

use stockhub_core::{CategoryId, DomainError, DomainResult, Entity, Money, ProductId};

/// Unit of measure a product is stocked and sold in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Pcs,
    Box,
    Pack,
    Dozen,
    Kg,
    Gram,
    Liter,
    Ml,
    Meter,
}

impl Unit {
    pub const ALL: [Unit; 9] = [
        Unit::Pcs,
        Unit::Box,
        Unit::Pack,
        Unit::Dozen,
        Unit::Kg,
        Unit::Gram,
        Unit::Liter,
        Unit::Ml,
        Unit::Meter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Pcs => "pcs",
            Unit::Box => "box",
            Unit::Pack => "pack",
            Unit::Dozen => "dozen",
            Unit::Kg => "kg",
            Unit::Gram => "gram",
            Unit::Liter => "liter",
            Unit::Ml => "ml",
            Unit::Meter => "meter",
        }
    }
}

impl core::fmt::Display for Unit {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for Unit {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Unit::ALL
            .into_iter()
            .find(|u| u.as_str() == wanted)
            .ok_or_else(|| DomainError::validation(format!("unknown unit '{}'", s.trim())))
    }
}

/// A product as exposed by the catalog endpoint.
///
/// `quantity` is the on-hand stock. It only changes when the backend applies
/// a purchase or a sale; the client treats it as read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub code: String,
    pub category_id: CategoryId,
    pub unit: Unit,
    /// Price in smallest currency unit.
    pub price: Money,
    pub quantity: u64,
}

impl Product {
    /// Build a product, enforcing the invariants the backend guarantees.
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        code: impl Into<String>,
        category_id: CategoryId,
        unit: Unit,
        price: Money,
        quantity: u64,
    ) -> DomainResult<Self> {
        let product = Self {
            id,
            name: name.into(),
            code: code.into(),
            category_id,
            unit,
            price,
            quantity,
        };
        product.check()?;
        Ok(product)
    }

    /// Check invariants on a record that came from elsewhere (e.g. JSON).
    pub fn check(&self) -> DomainResult<()> {
        if !self.id.is_set() {
            return Err(DomainError::invalid_id("product id cannot be zero"));
        }
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("product name cannot be empty"));
        }
        if self.price.minor_units() < 0 {
            return Err(DomainError::validation("product price cannot be negative"));
        }
        Ok(())
    }

    /// On-hand quantity as a signed value, for stock arithmetic.
    pub fn stock(&self) -> i64 {
        i64::try_from(self.quantity).unwrap_or(i64::MAX)
    }

    /// Value of the on-hand stock at the current price.
    pub fn stock_value(&self) -> Money {
        self.price.times(self.stock())
    }

    pub fn is_low_stock(&self, threshold: u64) -> bool {
        self.quantity <= threshold
    }

    /// Case-insensitive match on name or code, as used by the product picker.
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        needle.is_empty()
            || self.name.to_lowercase().contains(&needle)
            || self.code.to_lowercase().contains(&needle)
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> ProductId {
        self.id
    }

    fn label(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Product {
        Product::new(
            ProductId::new(1),
            "Mineral Water 600ml",
            "MW-600",
            CategoryId::new(3),
            Unit::Pcs,
            Money::new(3500),
            24,
        )
        .unwrap()
    }

    #[test]
    fn new_rejects_blank_name_and_unset_id() {
        let err = Product::new(
            ProductId::new(1),
            "  ",
            "X",
            CategoryId::new(1),
            Unit::Box,
            Money::new(1),
            0,
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = Product::new(
            ProductId::new(0),
            "Tea",
            "T",
            CategoryId::new(1),
            Unit::Box,
            Money::new(1),
            0,
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::InvalidId(_)));
    }

    #[test]
    fn stock_value_is_price_times_quantity() {
        assert_eq!(sample().stock_value(), Money::new(84_000));
    }

    #[test]
    fn matches_name_or_code_case_insensitively() {
        let p = sample();
        assert!(p.matches("mineral"));
        assert!(p.matches("mw-6"));
        assert!(p.matches(""));
        assert!(!p.matches("coffee"));
    }

    #[test]
    fn low_stock_threshold_is_inclusive() {
        let p = sample();
        assert!(p.is_low_stock(24));
        assert!(!p.is_low_stock(23));
    }

    #[test]
    fn product_deserializes_from_api_shape() {
        let json = r#"{
            "id": 9, "name": "Rice 5kg", "code": "RC-5", "category_id": 2,
            "unit": "kg", "price": 72000, "quantity": 4
        }"#;
        let p: Product = serde_json::from_str(json).unwrap();
        assert_eq!(p.unit, Unit::Kg);
        assert_eq!(p.price, Money::new(72000));
        assert!(p.check().is_ok());
    }

    #[test]
    fn unit_parses_from_text() {
        assert_eq!("  Liter ".parse::<Unit>().unwrap(), Unit::Liter);
        assert!("bucket".parse::<Unit>().is_err());
    }
}
