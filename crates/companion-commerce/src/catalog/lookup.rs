//! Storefront collaborators consulted by the offer engine.
//!
//! The engine never owns product data. It asks these traits and treats a
//! miss as "not available" rather than as a failure.

use std::collections::HashMap;

use crate::catalog::{CompanionProduct, PrimaryProduct};
use crate::ids::ProductId;

/// Read-only lookup of companion products.
pub trait ProductLookup: Send + Sync {
    /// Fetch a companion product, or `None` if the storefront cannot resolve it.
    fn get_product(&self, id: &ProductId) -> Option<CompanionProduct>;
}

/// Decides whether the companion-offer feature applies to a primary product.
pub trait EligibilityGate: Send + Sync {
    fn is_eligible_product(&self, product_id: &ProductId) -> bool;
}

/// External minimum purchase quantity for a primary product.
pub trait MinQuantitySource: Send + Sync {
    fn external_min_qty(&self, product_id: &ProductId) -> Option<i64>;
}

/// In-memory storefront backing all collaborator traits.
///
/// Used by the CLI and by tests; a real host wires its own catalog instead.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorefront {
    target_category: String,
    companions: HashMap<ProductId, CompanionProduct>,
    products: HashMap<ProductId, PrimaryProduct>,
}

impl InMemoryStorefront {
    /// Create an empty storefront gating on the given category.
    pub fn new(target_category: impl Into<String>) -> Self {
        Self {
            target_category: target_category.into(),
            companions: HashMap::new(),
            products: HashMap::new(),
        }
    }

    /// Register a companion product.
    pub fn add_companion(&mut self, product: CompanionProduct) {
        self.companions.insert(product.id.clone(), product);
    }

    /// Register a primary product.
    pub fn add_product(&mut self, product: PrimaryProduct) {
        self.products.insert(product.id.clone(), product);
    }

    /// Builder-style companion registration.
    pub fn with_companion(mut self, product: CompanionProduct) -> Self {
        self.add_companion(product);
        self
    }

    /// Builder-style primary product registration.
    pub fn with_product(mut self, product: PrimaryProduct) -> Self {
        self.add_product(product);
        self
    }

    /// Look up a primary product.
    pub fn primary(&self, id: &ProductId) -> Option<&PrimaryProduct> {
        self.products.get(id)
    }

    /// The category that enables the feature.
    pub fn target_category(&self) -> &str {
        &self.target_category
    }
}

impl ProductLookup for InMemoryStorefront {
    fn get_product(&self, id: &ProductId) -> Option<CompanionProduct> {
        self.companions.get(id).cloned()
    }
}

impl EligibilityGate for InMemoryStorefront {
    fn is_eligible_product(&self, product_id: &ProductId) -> bool {
        self.products
            .get(product_id)
            .map(|p| p.in_category(&self.target_category))
            .unwrap_or(false)
    }
}

impl MinQuantitySource for InMemoryStorefront {
    fn external_min_qty(&self, product_id: &ProductId) -> Option<i64> {
        self.products.get(product_id).and_then(|p| p.min_qty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::{Currency, Money};

    fn storefront() -> InMemoryStorefront {
        InMemoryStorefront::new("rozpyv")
            .with_product(
                PrimaryProduct::new("10", "Perfume", Money::new(500, Currency::UAH))
                    .with_category("rozpyv")
                    .with_min_qty(4),
            )
            .with_product(PrimaryProduct::new("11", "Candle", Money::new(900, Currency::UAH)))
            .with_companion(CompanionProduct::new(
                "140",
                "Flacon 5ml",
                Money::new(1500, Currency::UAH),
            ))
    }

    #[test]
    fn test_gate_uses_target_category() {
        let store = storefront();
        assert!(store.is_eligible_product(&ProductId::new("10")));
        assert!(!store.is_eligible_product(&ProductId::new("11")));
        assert!(!store.is_eligible_product(&ProductId::new("missing")));
    }

    #[test]
    fn test_lookup_miss_is_none() {
        let store = storefront();
        assert!(store.get_product(&ProductId::new("140")).is_some());
        assert!(store.get_product(&ProductId::new("999")).is_none());
    }

    #[test]
    fn test_external_min_qty() {
        let store = storefront();
        assert_eq!(store.external_min_qty(&ProductId::new("10")), Some(4));
        assert_eq!(store.external_min_qty(&ProductId::new("11")), None);
    }
}
