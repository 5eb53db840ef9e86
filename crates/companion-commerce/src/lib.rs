//! Quantity-gated companion offers for bulk storefronts.
//!
//! A primary product sold in bulk units (perfume decants, for example) can
//! be bundled with one companion product (a flacon). Which companions are
//! offered, and whether they are free, depends on the purchase quantity:
//!
//! - **Offers**: catalog, range resolution, eligibility, pricing,
//!   selection reconciliation and the [`OfferEngine`](offers::OfferEngine)
//! - **Catalog**: companion and primary products, storefront lookup traits
//! - **Cart**: cart lines carrying a selection, aggregated companion fees
//! - **Checkout**: orders persisting the chosen companion
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use companion_commerce::prelude::*;
//!
//! let storefront = InMemoryStorefront::new("rozpyv")
//!     .with_product(
//!         PrimaryProduct::new("10", "Perfume", Money::new(500, Currency::USD))
//!             .with_category("rozpyv"),
//!     )
//!     .with_companion(CompanionProduct::new("63", "Flacon 5ml", Money::new(1000, Currency::USD)));
//! let catalog = OfferCatalog::new(vec![Offer::bounded("63", 2, 15).free_from(3)]).unwrap();
//! let engine = OfferEngine::new(catalog, Arc::new(storefront), EngineSettings::default());
//!
//! let view = engine.render(&ProductId::new("10"), 3, &Selection::none()).unwrap();
//! assert!(view.offers[0].is_free());
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod offers;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{
        CompanionProduct, EligibilityGate, InMemoryStorefront, MinQuantitySource, PrimaryProduct,
        ProductLookup,
    };

    // Cart
    pub use crate::cart::{Cart, CartFee, CartLine, CartPricing};

    // Checkout
    pub use crate::checkout::{CompanionRecord, Order, OrderLineItem, OrderStatus};

    // Offers
    pub use crate::config::OffersConfig;
    pub use crate::offers::{
        AddToCart, EngineSettings, ExtensionPoint, Offer, OfferCatalog, OfferEngine, OfferRequest,
        OfferResponse, OfferView, Quantity, QuantityRange, Selection,
    };
}
