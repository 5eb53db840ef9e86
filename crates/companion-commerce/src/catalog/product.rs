//! Product records as seen by the offer engine.

use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A companion ("extra") product that can be bundled with a primary product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompanionProduct {
    /// Product identifier; also the key of the offer selling it.
    pub id: ProductId,
    /// Display name, used for fee labels.
    pub name: String,
    /// Regular price charged once per cart line.
    pub price: Money,
    /// Whether the product can currently be sold.
    pub in_stock: bool,
}

impl CompanionProduct {
    /// Create an in-stock companion product.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Money) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            in_stock: true,
        }
    }

    /// Mark the product as out of stock.
    pub fn out_of_stock(mut self) -> Self {
        self.in_stock = false;
        self
    }
}

/// A primary product sold in bulk units.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrimaryProduct {
    /// Product identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: Money,
    /// Category slugs the product belongs to.
    pub categories: Vec<String>,
    /// Minimum quantity imposed by an unrelated quantity-rules source.
    pub min_qty: Option<i64>,
}

impl PrimaryProduct {
    /// Create a primary product without categories.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Money) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            categories: Vec::new(),
            min_qty: None,
        }
    }

    /// Add a category to this product.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        let category = category.into();
        if !self.categories.contains(&category) {
            self.categories.push(category);
        }
        self
    }

    /// Set the external minimum quantity.
    pub fn with_min_qty(mut self, min_qty: i64) -> Self {
        self.min_qty = Some(min_qty);
        self
    }

    /// Check category membership.
    pub fn in_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    #[test]
    fn test_category_membership() {
        let product = PrimaryProduct::new("10", "Perfume", Money::new(500, Currency::UAH))
            .with_category("rozpyv")
            .with_category("rozpyv");
        assert!(product.in_category("rozpyv"));
        assert!(!product.in_category("test"));
        assert_eq!(product.categories.len(), 1);
    }

    #[test]
    fn test_companion_stock_flag() {
        let flacon = CompanionProduct::new("140", "Flacon 5ml", Money::new(1500, Currency::UAH));
        assert!(flacon.in_stock);
        assert!(!flacon.out_of_stock().in_stock);
    }
}
