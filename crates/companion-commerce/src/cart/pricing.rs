//! Cart pricing breakdown.

use crate::cart::CartFee;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Pricing breakdown for a cart, including companion fees.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartPricing {
    /// Sum of primary product lines.
    pub subtotal: Money,
    /// Aggregated companion fees.
    pub fees: Vec<CartFee>,
    /// Sum of all fees.
    pub fee_total: Money,
    /// subtotal + fee_total.
    pub grand_total: Money,
}

impl CartPricing {
    /// Check if any companion is charged.
    pub fn has_fees(&self) -> bool {
        !self.fees.is_empty()
    }

    /// Number of charged companions across all fee lines.
    pub fn charged_companions(&self) -> u32 {
        self.fees.iter().map(|f| f.count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    #[test]
    fn test_charged_companions() {
        let fee = |count| CartFee {
            name: "Flacon 5ml".to_string(),
            label: String::new(),
            price: Money::new(1000, Currency::USD),
            count,
        };
        let pricing = CartPricing {
            subtotal: Money::new(5000, Currency::USD),
            fees: vec![fee(2), fee(1)],
            fee_total: Money::new(2000, Currency::USD),
            grand_total: Money::new(7000, Currency::USD),
        };
        assert!(pricing.has_fees());
        assert_eq!(pricing.charged_companions(), 3);
    }
}
