//! Companion pricing, including free-threshold promotions.

use serde::{Deserialize, Serialize};

use crate::catalog::{CompanionProduct, ProductLookup};
use crate::ids::ProductId;
use crate::money::Money;
use crate::offers::{Offer, Quantity};

/// An eligible offer with its companion product resolved and priced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedOffer {
    /// Offer / companion product id.
    pub offer_id: ProductId,
    /// Companion display name.
    pub name: String,
    /// Companion's regular price.
    pub base_price: Money,
    /// Price charged at the evaluated quantity.
    pub price: Money,
    /// Companion stock state as reported by the lookup.
    pub in_stock: bool,
}

impl PricedOffer {
    /// Whether the free threshold was met.
    pub fn is_free(&self) -> bool {
        self.price.is_zero()
    }
}

impl Offer {
    /// Price of this offer for `quantity` given the companion's base price.
    ///
    /// The fee is flat per cart line; it is not multiplied by quantity.
    pub fn price_at(&self, quantity: Quantity, base_price: Money) -> Money {
        if self.is_free_at(quantity) {
            Money::zero(base_price.currency)
        } else {
            base_price
        }
    }

    fn priced(&self, quantity: Quantity, companion: CompanionProduct) -> PricedOffer {
        PricedOffer {
            offer_id: self.id.clone(),
            price: self.price_at(quantity, companion.price),
            base_price: companion.price,
            name: companion.name,
            in_stock: companion.in_stock,
        }
    }
}

/// Resolve the companion and price the offer.
///
/// Returns `None` when the companion cannot be looked up; callers exclude
/// such offers from display and from fees.
pub fn resolve_price(
    offer: &Offer,
    quantity: Quantity,
    lookup: &dyn ProductLookup,
) -> Option<PricedOffer> {
    match lookup.get_product(&offer.id) {
        Some(companion) => Some(offer.priced(quantity, companion)),
        None => {
            tracing::debug!(offer_id = %offer.id, "companion product unavailable, skipping offer");
            None
        }
    }
}

/// Price each offer, dropping those whose companion is unavailable.
pub fn price_offers<'a>(
    offers: impl IntoIterator<Item = &'a Offer>,
    quantity: Quantity,
    lookup: &dyn ProductLookup,
) -> Vec<PricedOffer> {
    offers
        .into_iter()
        .filter_map(|offer| resolve_price(offer, quantity, lookup))
        .collect()
}
