//! Quantity-gated companion offers.
//!
//! The decision functions ([`resolve_range`], [`eligible_offers`],
//! [`resolve_price`], [`reconcile`], [`clamp`]) are pure. [`OfferEngine`]
//! wires them to a catalog and the storefront collaborators and exposes one
//! method per [`ExtensionPoint`].

mod eligibility;
mod engine;
mod offer;
mod pipeline;
mod price;
mod range;
mod refresh;
mod selection;
mod transport;

/// A purchase quantity. Signed so that invalid input can be represented
/// and rejected.
pub type Quantity = i64;

pub use eligibility::{eligible_ids, eligible_offers};
pub use engine::{
    AddToCart, CartRecalculation, EngineSettings, OfferEngine, OfferView, QuantityInput,
    QuantityRepair, SelectionChange,
};
pub use offer::{Offer, OfferCatalog};
pub use pipeline::{ExtensionPoint, Stage};
pub use price::{price_offers, resolve_price, PricedOffer};
pub use range::{clamp, resolve_range, QuantityRange, RangeCache, RangeDefaults};
pub use refresh::{RefreshGate, DEFAULT_QUIET_PERIOD};
pub use selection::{fallback_to_in_stock, reconcile, Selection};
pub use transport::{OfferOption, OfferRequest, OfferResponse};
