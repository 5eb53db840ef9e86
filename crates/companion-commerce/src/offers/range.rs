//! Purchase quantity range and clamping.

use std::collections::HashMap;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::ids::ProductId;
use crate::offers::{OfferCatalog, Quantity};

/// Fallback bounds used when no offer declares a bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeDefaults {
    pub min: Quantity,
    pub max: Quantity,
}

impl Default for RangeDefaults {
    fn default() -> Self {
        Self { min: 1, max: 100 }
    }
}

/// Allowed purchase quantities for a primary product, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuantityRange {
    pub min: Quantity,
    pub max: Quantity,
}

impl QuantityRange {
    pub fn new(min: Quantity, max: Quantity) -> Self {
        Self { min, max }
    }

    /// Check whether a quantity lies in the range.
    pub fn contains(&self, quantity: Quantity) -> bool {
        quantity >= self.min && quantity <= self.max
    }

    /// Force a quantity into the range. Idempotent.
    pub fn clamp(&self, requested: Quantity) -> Quantity {
        clamp(requested, self)
    }

    /// Every selectable quantity, used for the quantity buttons.
    pub fn values(&self) -> RangeInclusive<Quantity> {
        self.min..=self.max
    }
}

/// Derive the quantity range from the catalog and an external minimum.
///
/// The minimum is the smallest declared offer minimum (or the default),
/// raised to `external_min` when that is larger. The maximum is the largest
/// declared offer maximum (or the default). A maximum below the resolved
/// minimum is lifted to the minimum so the range is never empty.
pub fn resolve_range(
    catalog: &OfferCatalog,
    external_min: Option<Quantity>,
    defaults: RangeDefaults,
) -> QuantityRange {
    if catalog.is_empty() {
        tracing::warn!(
            min = defaults.min,
            max = defaults.max,
            "offer catalog is empty, using default quantity range"
        );
    }

    let custom_min = catalog
        .iter()
        .filter_map(|o| o.min)
        .min()
        .unwrap_or(defaults.min);
    let custom_max = catalog
        .iter()
        .filter_map(|o| o.max)
        .max()
        .unwrap_or(defaults.max);

    let min = custom_min.max(external_min.unwrap_or(0));
    let max = if custom_max < min {
        tracing::warn!(
            min,
            max = custom_max,
            "external minimum exceeds catalog maximum, widening range"
        );
        min
    } else {
        custom_max
    };

    QuantityRange { min, max }
}

/// `max(range.min, min(requested, range.max))`.
pub fn clamp(requested: Quantity, range: &QuantityRange) -> Quantity {
    range.min.max(requested.min(range.max))
}

/// Memoized quantity ranges keyed by catalog version and product.
#[derive(Debug, Clone, Default)]
pub struct RangeCache {
    entries: HashMap<(u64, ProductId), QuantityRange>,
}

impl RangeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached range, computing it on a miss.
    pub fn get_or_insert_with(
        &mut self,
        version: u64,
        product_id: &ProductId,
        compute: impl FnOnce() -> QuantityRange,
    ) -> QuantityRange {
        *self
            .entries
            .entry((version, product_id.clone()))
            .or_insert_with(compute)
    }

    /// Drop every entry computed for another catalog version.
    pub fn retain_version(&mut self, version: u64) {
        self.entries.retain(|(v, _), _| *v == version);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::offers::Offer;

    fn catalog() -> OfferCatalog {
        OfferCatalog::new(vec![
            Offer::bounded("63", 2, 15).free_from(3),
            Offer::bounded("64", 16, 30),
            Offer::bounded("1946", 2, 40),
        ])
        .unwrap()
    }

    #[test]
    fn test_range_from_catalog() {
        let range = resolve_range(&catalog(), None, RangeDefaults::default());
        assert_eq!(range, QuantityRange::new(2, 40));
    }

    #[test]
    fn test_empty_catalog_uses_defaults() {
        let range = resolve_range(&OfferCatalog::empty(), None, RangeDefaults::default());
        assert_eq!(range, QuantityRange::new(1, 100));
    }

    #[test]
    fn test_unbounded_offers_fall_back_per_side() {
        let catalog = OfferCatalog::new(vec![Offer::new("1", None, Some(20))]).unwrap();
        let range = resolve_range(&catalog, None, RangeDefaults::default());
        assert_eq!(range, QuantityRange::new(1, 20));
    }

    #[test]
    fn test_external_min_raises_minimum() {
        let range = resolve_range(&catalog(), Some(5), RangeDefaults::default());
        assert_eq!(range.min, 5);

        let range = resolve_range(&catalog(), Some(1), RangeDefaults::default());
        assert_eq!(range.min, 2);
    }

    #[test]
    fn test_external_min_above_max_keeps_range_valid() {
        let range = resolve_range(&catalog(), Some(50), RangeDefaults::default());
        assert_eq!(range, QuantityRange::new(50, 50));
    }

    #[test]
    fn test_clamp() {
        let range = QuantityRange::new(2, 40);
        assert_eq!(clamp(1, &range), 2);
        assert_eq!(clamp(41, &range), 40);
        assert_eq!(clamp(20, &range), 20);
        assert_eq!(clamp(clamp(-7, &range), &range), clamp(-7, &range));
    }

    #[test]
    fn test_values() {
        let range = QuantityRange::new(2, 5);
        assert_eq!(range.values().collect::<Vec<_>>(), vec![2, 3, 4, 5]);
    }

    #[test]
    fn test_cache_memoizes_and_invalidates() {
        let mut cache = RangeCache::new();
        let product = ProductId::new("10");
        let mut calls = 0;

        for _ in 0..3 {
            cache.get_or_insert_with(1, &product, || {
                calls += 1;
                QuantityRange::new(2, 40)
            });
        }
        assert_eq!(calls, 1);

        cache.get_or_insert_with(2, &product, || QuantityRange::new(3, 10));
        assert_eq!(cache.len(), 2);

        cache.retain_version(2);
        assert_eq!(cache.len(), 1);
    }
}
