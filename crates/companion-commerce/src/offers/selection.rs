//! Per cart line offer selection and its reconciliation.

use serde::{Deserialize, Serialize};

use crate::ids::ProductId;
use crate::offers::PricedOffer;

/// Which offer a cart line currently carries.
///
/// `last_user_chosen_offer_id` is the user's own pick. It is kept apart from
/// `chosen_offer_id` so that a pick that became ineligible can be restored
/// when the quantity moves back into its range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    #[serde(default)]
    pub chosen_offer_id: Option<ProductId>,
    #[serde(default)]
    pub last_user_chosen_offer_id: Option<ProductId>,
}

impl Selection {
    /// No selection yet.
    pub fn none() -> Self {
        Self::default()
    }

    /// A selection captured from the user's radio choice.
    pub fn user_choice(offer_id: Option<ProductId>) -> Self {
        Self {
            chosen_offer_id: offer_id.clone(),
            last_user_chosen_offer_id: offer_id,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.chosen_offer_id.is_none()
    }
}

/// Decide which offer stays selected for a freshly computed eligible set.
///
/// 1. Nothing eligible: clear the choice, keep the user's pick.
/// 2. Current choice still eligible: keep it.
/// 3. User's pick eligible: restore it.
/// 4. Otherwise the first eligible offer.
pub fn reconcile(eligible: &[ProductId], current: &Selection) -> Selection {
    let last_user_chosen_offer_id = current.last_user_chosen_offer_id.clone();
    let is_eligible = |id: &Option<ProductId>| id.as_ref().filter(|id| eligible.contains(id)).cloned();

    let chosen_offer_id = if eligible.is_empty() {
        None
    } else {
        is_eligible(&current.chosen_offer_id)
            .or_else(|| is_eligible(&current.last_user_chosen_offer_id))
            .or_else(|| eligible.first().cloned())
    };

    Selection {
        chosen_offer_id,
        last_user_chosen_offer_id,
    }
}

/// Steer the selection away from an out-of-stock companion.
///
/// When the chosen offer is out of stock, the other eligible offers are
/// scanned in catalog order for the first one in stock. If none is, the
/// choice is cleared. The user's pick is never touched.
pub fn fallback_to_in_stock(offers: &[PricedOffer], selection: Selection) -> Selection {
    let Some(chosen) = selection.chosen_offer_id.as_ref() else {
        return selection;
    };

    let chosen_in_stock = offers
        .iter()
        .find(|o| &o.offer_id == chosen)
        .map(|o| o.in_stock)
        .unwrap_or(false);
    if chosen_in_stock {
        return selection;
    }

    let alternative = offers
        .iter()
        .find(|o| o.in_stock && &o.offer_id != chosen)
        .map(|o| o.offer_id.clone());

    if alternative.is_none() {
        tracing::warn!(offer_id = %chosen, "no in-stock companion left, clearing selection");
    }

    Selection {
        chosen_offer_id: alternative,
        last_user_chosen_offer_id: selection.last_user_chosen_offer_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::{Currency, Money};

    fn id(s: &str) -> ProductId {
        ProductId::new(s)
    }

    fn sel(chosen: Option<&str>, last: Option<&str>) -> Selection {
        Selection {
            chosen_offer_id: chosen.map(id),
            last_user_chosen_offer_id: last.map(id),
        }
    }

    fn priced(offer_id: &str, in_stock: bool) -> PricedOffer {
        let price = Money::new(1000, Currency::USD);
        PricedOffer {
            offer_id: id(offer_id),
            name: format!("Flacon {}", offer_id),
            base_price: price,
            price,
            in_stock,
        }
    }

    #[test]
    fn test_empty_eligible_clears_choice_keeps_user_pick() {
        let result = reconcile(&[], &sel(Some("A"), Some("A")));
        assert_eq!(result, sel(None, Some("A")));
    }

    #[test]
    fn test_still_eligible_choice_is_kept() {
        let result = reconcile(&[id("A"), id("B")], &sel(Some("B"), Some("A")));
        assert_eq!(result.chosen_offer_id, Some(id("B")));
    }

    #[test]
    fn test_user_pick_is_restored() {
        let result = reconcile(&[id("A"), id("B")], &sel(Some("C"), Some("B")));
        assert_eq!(result, sel(Some("B"), Some("B")));
    }

    #[test]
    fn test_first_eligible_is_default() {
        assert_eq!(
            reconcile(&[id("A"), id("B")], &Selection::none()).chosen_offer_id,
            Some(id("A"))
        );
        assert_eq!(
            reconcile(&[id("A"), id("B")], &sel(Some("C"), Some("D"))),
            sel(Some("A"), Some("D"))
        );
    }

    #[test]
    fn test_pick_survives_ineligible_detour() {
        let picked = Selection::user_choice(Some(id("A")));
        let detour = reconcile(&[id("B")], &picked);
        assert_eq!(detour, sel(Some("B"), Some("A")));

        let back = reconcile(&[id("A"), id("B")], &detour);
        // B is still eligible, so stability wins over restoration.
        assert_eq!(back.chosen_offer_id, Some(id("B")));

        let gone = reconcile(&[], &detour);
        let restored = reconcile(&[id("A"), id("B")], &gone);
        assert_eq!(restored.chosen_offer_id, Some(id("A")));
    }

    #[test]
    fn test_stock_fallback_picks_next_in_stock() {
        let offers = [priced("A", false), priced("B", false), priced("C", true)];
        let result = fallback_to_in_stock(&offers, sel(Some("A"), Some("A")));
        assert_eq!(result, sel(Some("C"), Some("A")));
    }

    #[test]
    fn test_stock_fallback_keeps_in_stock_choice() {
        let offers = [priced("A", true), priced("B", true)];
        let result = fallback_to_in_stock(&offers, sel(Some("B"), None));
        assert_eq!(result.chosen_offer_id, Some(id("B")));
    }

    #[test]
    fn test_stock_fallback_exhausted() {
        let offers = [priced("A", false), priced("B", false)];
        let result = fallback_to_in_stock(&offers, sel(Some("A"), Some("B")));
        assert_eq!(result, sel(None, Some("B")));
    }
}
