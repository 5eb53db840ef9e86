//! Property tests for the offer decision functions.

use companion_commerce::offers::{
    clamp, eligible_offers, reconcile, resolve_range, Offer, OfferCatalog, Quantity,
    QuantityRange, RangeDefaults, Selection,
};
use companion_commerce::ProductId;
use proptest::prelude::*;

fn arb_offer(index: usize) -> impl Strategy<Value = Offer> {
    (
        proptest::option::of(1..50i64),
        proptest::option::of(0..50i64),
        proptest::option::of(1..60i64),
    )
        .prop_map(move |(min, span, free)| {
            let max = match (min, span) {
                (Some(min), Some(span)) => Some(min + span),
                (None, Some(span)) => Some(span + 1),
                (_, None) => None,
            };
            Offer {
                id: ProductId::from(index as u64),
                min,
                max,
                free_threshold: free,
            }
        })
}

fn arb_catalog() -> impl Strategy<Value = OfferCatalog> {
    (0..8usize)
        .prop_flat_map(|len| (0..len).map(arb_offer).collect::<Vec<_>>())
        .prop_map(|offers| OfferCatalog::new(offers).unwrap())
}

fn id(n: u8) -> ProductId {
    ProductId::from(u64::from(n))
}

proptest! {
    #[test]
    fn eligible_offers_are_an_ordered_subsequence(catalog in arb_catalog(), q in -5..120i64) {
        let eligible = eligible_offers(&catalog, q);

        let positions = eligible
            .iter()
            .map(|o| catalog.iter().position(|c| c.id == o.id).unwrap());
        let mut last = None;
        for pos in positions {
            prop_assert!(last.map_or(true, |l| pos > l));
            last = Some(pos);
        }

        for offer in eligible {
            prop_assert!(offer.min.map_or(true, |min| q >= min));
            prop_assert!(offer.max.map_or(true, |max| q <= max));
        }
    }

    #[test]
    fn range_min_is_monotonic_in_external_min(
        catalog in arb_catalog(),
        a in proptest::option::of(0..200i64),
        b in proptest::option::of(0..200i64),
    ) {
        let (low, high) = if a.unwrap_or(0) <= b.unwrap_or(0) { (a, b) } else { (b, a) };
        let defaults = RangeDefaults::default();
        let low_range = resolve_range(&catalog, low, defaults);
        let high_range = resolve_range(&catalog, high, defaults);
        prop_assert!(low_range.min <= high_range.min);
        prop_assert!(high_range.min <= high_range.max);
    }

    #[test]
    fn clamp_is_idempotent_and_bounded(min in 1..100i64, span in 0..100i64, q in any::<i32>()) {
        let range = QuantityRange::new(min, min + span);
        let once = clamp(Quantity::from(q), &range);
        prop_assert_eq!(clamp(once, &range), once);
        prop_assert!(range.contains(once));
    }

    #[test]
    fn reconcile_keeps_an_eligible_choice(
        eligible in proptest::collection::vec(0..10u8, 1..6),
        pick in any::<prop::sample::Index>(),
        last in proptest::option::of(0..10u8),
    ) {
        let eligible: Vec<ProductId> = eligible.into_iter().map(id).collect();
        let chosen = pick.get(&eligible).clone();
        let current = Selection {
            chosen_offer_id: Some(chosen.clone()),
            last_user_chosen_offer_id: last.map(id),
        };

        let next = reconcile(&eligible, &current);
        prop_assert_eq!(next.chosen_offer_id, Some(chosen));
        prop_assert_eq!(next.last_user_chosen_offer_id, current.last_user_chosen_offer_id);
    }

    #[test]
    fn reconcile_choice_is_always_eligible(
        eligible in proptest::collection::vec(0..10u8, 0..6),
        chosen in proptest::option::of(0..10u8),
        last in proptest::option::of(0..10u8),
    ) {
        let eligible: Vec<ProductId> = eligible.into_iter().map(id).collect();
        let current = Selection {
            chosen_offer_id: chosen.map(id),
            last_user_chosen_offer_id: last.map(id),
        };

        let next = reconcile(&eligible, &current);
        match next.chosen_offer_id {
            Some(chosen) => prop_assert!(eligible.contains(&chosen)),
            None => prop_assert!(eligible.is_empty()),
        }
    }
}
