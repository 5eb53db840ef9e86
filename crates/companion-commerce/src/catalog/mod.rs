//! Product catalog module.
//!
//! Product records and the lookup traits the offer engine depends on.

mod lookup;
mod product;

pub use lookup::{EligibilityGate, InMemoryStorefront, MinQuantitySource, ProductLookup};
pub use product::{CompanionProduct, PrimaryProduct};
