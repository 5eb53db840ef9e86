//! Checkout module.
//!
//! Orders created from a reconciled cart.

mod order;

pub use order::{CompanionRecord, Order, OrderLineItem, OrderStatus};
