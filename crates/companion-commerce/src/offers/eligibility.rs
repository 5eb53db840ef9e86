//! Which offers apply at a given quantity.

use crate::ids::ProductId;
use crate::offers::{Offer, OfferCatalog, Quantity};

impl Offer {
    /// An offer is eligible when its declared bounds contain the quantity.
    pub fn is_eligible_at(&self, quantity: Quantity) -> bool {
        self.min.map_or(true, |min| quantity >= min) && self.max.map_or(true, |max| quantity <= max)
    }
}

/// Offers whose range contains `quantity`, in catalog order.
///
/// An empty result means "no offer available", not an error.
pub fn eligible_offers(catalog: &OfferCatalog, quantity: Quantity) -> Vec<&Offer> {
    catalog
        .iter()
        .filter(|offer| offer.is_eligible_at(quantity))
        .collect()
}

/// Ids of the eligible offers, in catalog order.
pub fn eligible_ids(catalog: &OfferCatalog, quantity: Quantity) -> Vec<ProductId> {
    eligible_offers(catalog, quantity)
        .into_iter()
        .map(|offer| offer.id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> OfferCatalog {
        OfferCatalog::new(vec![
            Offer::bounded("1", 2, 15).free_from(3),
            Offer::bounded("2", 16, 30),
            Offer::new("3", Some(10), None),
            Offer::new("4", None, None),
        ])
        .unwrap()
    }

    fn ids(q: Quantity) -> Vec<String> {
        eligible_ids(&catalog(), q)
            .into_iter()
            .map(ProductId::into_inner)
            .collect()
    }

    #[test]
    fn test_bounds_are_inclusive() {
        assert_eq!(ids(2), vec!["1", "4"]);
        assert_eq!(ids(15), vec!["1", "3", "4"]);
        assert_eq!(ids(16), vec!["2", "3", "4"]);
        assert_eq!(ids(30), vec!["2", "3", "4"]);
    }

    #[test]
    fn test_unbounded_sides() {
        assert_eq!(ids(1), vec!["4"]);
        assert_eq!(ids(1000), vec!["3", "4"]);
    }

    #[test]
    fn test_nothing_matches() {
        let catalog = OfferCatalog::new(vec![Offer::bounded("1", 2, 15)]).unwrap();
        assert!(eligible_offers(&catalog, 16).is_empty());
        assert!(eligible_offers(&OfferCatalog::empty(), 5).is_empty());
    }
}
