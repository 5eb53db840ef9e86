//! Commerce error types.

use thiserror::Error;

/// Errors that can occur while evaluating companion offers.
///
/// Conditions the storefront treats as normal outcomes (an empty offer
/// catalog, a companion that cannot be looked up, a quantity outside every
/// offer range) are not represented here; they surface as empty results.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Quantity is not a positive number.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Request did not name a primary product.
    #[error("Missing product identifier")]
    MissingProduct,

    /// Cart line not found.
    #[error("Item not in cart: {0}")]
    ItemNotInCart(String),

    /// Checkout attempted on an empty cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Malformed offer entry in the catalog configuration.
    #[error("Invalid offer {id}: {reason}")]
    InvalidOffer { id: String, reason: String },

    /// Unknown currency code in configuration.
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl CommerceError {
    /// Whether this error stems from request input rather than from the
    /// storefront's configuration or data.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            CommerceError::InvalidQuantity(_) | CommerceError::MissingProduct
        )
    }
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::SerializationError(e.to_string())
    }
}

impl From<toml::de::Error> for CommerceError {
    fn from(e: toml::de::Error) -> Self {
        CommerceError::ConfigError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_facing_split() {
        assert!(CommerceError::InvalidQuantity(0).is_user_facing());
        assert!(CommerceError::MissingProduct.is_user_facing());
        assert!(!CommerceError::Overflow.is_user_facing());
        assert!(!CommerceError::CurrencyMismatch {
            expected: "UAH".to_string(),
            got: "USD".to_string(),
        }
        .is_user_facing());
    }
}
