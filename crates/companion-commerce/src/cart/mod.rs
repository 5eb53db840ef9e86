//! Shopping cart module.
//!
//! Contains the cart, its lines, companion fees and pricing.

mod cart;
mod fees;
mod pricing;

pub use cart::{Cart, CartLine};
pub(crate) use cart::current_timestamp;
pub use fees::{fee_total, CartFee, FeeAggregator};
pub use pricing::CartPricing;
