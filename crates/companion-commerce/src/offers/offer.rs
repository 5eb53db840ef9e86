//! Offer definitions and the validated offer catalog.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::offers::Quantity;

/// A companion offer: which quantities it is shown for and when it is free.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Offer {
    /// Companion product sold by this offer.
    pub id: ProductId,
    /// Smallest quantity the offer applies to. `None` is unbounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<Quantity>,
    /// Largest quantity the offer applies to. `None` is unbounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Quantity>,
    /// Quantity at or above which the companion is free.
    #[serde(
        default,
        rename = "free",
        alias = "free_threshold",
        skip_serializing_if = "Option::is_none"
    )]
    pub free_threshold: Option<Quantity>,
}

impl Offer {
    /// Create an offer for the given range.
    pub fn new(id: impl Into<ProductId>, min: Option<Quantity>, max: Option<Quantity>) -> Self {
        Self {
            id: id.into(),
            min,
            max,
            free_threshold: None,
        }
    }

    /// Create an offer bounded on both sides.
    pub fn bounded(id: impl Into<ProductId>, min: Quantity, max: Quantity) -> Self {
        Self::new(id, Some(min), Some(max))
    }

    /// Set the free threshold.
    pub fn free_from(mut self, threshold: Quantity) -> Self {
        self.free_threshold = Some(threshold);
        self
    }

    /// Whether the companion is free at this quantity.
    pub fn is_free_at(&self, quantity: Quantity) -> bool {
        self.free_threshold
            .map(|threshold| quantity >= threshold)
            .unwrap_or(false)
    }

    fn validate(&self) -> Result<(), CommerceError> {
        let invalid = |reason: String| CommerceError::InvalidOffer {
            id: self.id.to_string(),
            reason,
        };

        if self.id.as_str().trim().is_empty() {
            return Err(invalid("empty identifier".to_string()));
        }
        for (name, value) in [
            ("min", self.min),
            ("max", self.max),
            ("free", self.free_threshold),
        ] {
            if let Some(v) = value {
                if v <= 0 {
                    return Err(invalid(format!("{} must be positive, got {}", name, v)));
                }
            }
        }
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(invalid(format!("min {} exceeds max {}", min, max)));
            }
        }
        Ok(())
    }
}

/// Ordered, validated list of offers.
///
/// Order is significant: it is the display order and the first eligible
/// offer is the default selection. A catalog is immutable; configuration
/// changes build a new one, which carries a new [`version`](Self::version).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OfferCatalog {
    offers: Vec<Offer>,
    version: u64,
}

impl OfferCatalog {
    /// Validate offers and build a catalog.
    ///
    /// Fails on non-positive bounds, `min > max`, or duplicate ids.
    pub fn new(offers: Vec<Offer>) -> Result<Self, CommerceError> {
        let mut seen = HashSet::new();
        for offer in &offers {
            offer.validate()?;
            if !seen.insert(offer.id.clone()) {
                return Err(CommerceError::InvalidOffer {
                    id: offer.id.to_string(),
                    reason: "duplicate offer id".to_string(),
                });
            }
        }

        let mut hasher = DefaultHasher::new();
        offers.hash(&mut hasher);
        let version = hasher.finish();

        Ok(Self { offers, version })
    }

    /// An empty catalog.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Content fingerprint, used to key memoized values.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Offers in catalog order.
    pub fn offers(&self) -> &[Offer] {
        &self.offers
    }

    /// Iterate offers in catalog order.
    pub fn iter(&self) -> std::slice::Iter<'_, Offer> {
        self.offers.iter()
    }

    /// Find an offer by companion id.
    pub fn get(&self, id: &ProductId) -> Option<&Offer> {
        self.offers.iter().find(|o| &o.id == id)
    }

    pub fn len(&self) -> usize {
        self.offers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }
}

impl<'a> IntoIterator for &'a OfferCatalog {
    type Item = &'a Offer;
    type IntoIter = std::slice::Iter<'a, Offer>;

    fn into_iter(self) -> Self::IntoIter {
        self.offers.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_rejects_inverted_range() {
        let result = OfferCatalog::new(vec![Offer::bounded("63", 15, 2)]);
        assert!(matches!(result, Err(CommerceError::InvalidOffer { .. })));
    }

    #[test]
    fn test_catalog_rejects_duplicates() {
        let result = OfferCatalog::new(vec![
            Offer::bounded("63", 2, 15),
            Offer::bounded("63", 16, 30),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_catalog_rejects_non_positive_threshold() {
        let result = OfferCatalog::new(vec![Offer::bounded("63", 2, 15).free_from(0)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_version_tracks_content() {
        let a = OfferCatalog::new(vec![Offer::bounded("63", 2, 15)]).unwrap();
        let b = OfferCatalog::new(vec![Offer::bounded("63", 2, 15)]).unwrap();
        let c = OfferCatalog::new(vec![Offer::bounded("63", 2, 16)]).unwrap();
        assert_eq!(a.version(), b.version());
        assert_ne!(a.version(), c.version());
    }

    #[test]
    fn test_free_threshold_is_inclusive() {
        let offer = Offer::bounded("1", 2, 15).free_from(3);
        assert!(!offer.is_free_at(2));
        assert!(offer.is_free_at(3));
        assert!(offer.is_free_at(4));
        assert!(!Offer::bounded("2", 16, 30).is_free_at(30));
    }

    #[test]
    fn test_offer_deserializes_free_key() {
        let offer: Offer = serde_json::from_str(r#"{"id":"140","min":2,"max":50,"free":5}"#).unwrap();
        assert_eq!(offer.free_threshold, Some(5));
        assert_eq!(offer.min, Some(2));
    }
}
