//! Companion fee aggregation.
//!
//! Each cart line with a charged companion contributes one fee; lines that
//! chose the same companion are folded into a single fee line labelled with
//! the count.

use serde::{Deserialize, Serialize};

use crate::error::CommerceError;
use crate::money::{Currency, Money};

/// One aggregated fee line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartFee {
    /// Companion product name.
    pub name: String,
    /// Display label, e.g. "Flacon: Flacon 5ml x 2".
    pub label: String,
    /// Summed price over all contributing lines.
    pub price: Money,
    /// Number of contributing lines.
    pub count: u32,
}

/// Accumulates per-line companion charges into fee lines.
#[derive(Debug, Clone)]
pub struct FeeAggregator {
    label_prefix: String,
    currency: Currency,
    fees: Vec<CartFee>,
}

impl FeeAggregator {
    pub fn new(label_prefix: impl Into<String>, currency: Currency) -> Self {
        Self {
            label_prefix: label_prefix.into(),
            currency,
            fees: Vec::new(),
        }
    }

    /// Record one line's charge for a companion. Zero charges are ignored.
    pub fn add(&mut self, name: &str, price: Money) -> Result<(), CommerceError> {
        if !price.is_positive() {
            return Ok(());
        }
        if price.currency != self.currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: self.currency.code().to_string(),
                got: price.currency.code().to_string(),
            });
        }

        match self.fees.iter_mut().find(|f| f.name == name) {
            Some(fee) => {
                fee.price = fee.price.try_add(&price).ok_or(CommerceError::Overflow)?;
                fee.count += 1;
            }
            None => self.fees.push(CartFee {
                name: name.to_string(),
                label: String::new(),
                price,
                count: 1,
            }),
        }
        Ok(())
    }

    /// Finish aggregation, in first-seen order.
    pub fn finish(self) -> Vec<CartFee> {
        let prefix = self.label_prefix;
        self.fees
            .into_iter()
            .map(|mut fee| {
                fee.label = format!("{}: {} x {}", prefix, fee.name, fee.count);
                fee
            })
            .collect()
    }
}

/// Total of a set of fee lines.
pub fn fee_total(fees: &[CartFee], currency: Currency) -> Result<Money, CommerceError> {
    Money::try_sum(fees.iter().map(|f| &f.price), currency)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_companion_is_aggregated() {
        let mut fees = FeeAggregator::new("Flacon", Currency::USD);
        fees.add("Flacon 5ml", Money::new(1000, Currency::USD)).unwrap();
        fees.add("Flacon 5ml", Money::new(1000, Currency::USD)).unwrap();

        let fees = fees.finish();
        assert_eq!(fees.len(), 1);
        assert_eq!(fees[0].price.amount_cents, 2000);
        assert_eq!(fees[0].count, 2);
        assert_eq!(fees[0].label, "Flacon: Flacon 5ml x 2");
    }

    #[test]
    fn test_free_lines_are_skipped() {
        let mut fees = FeeAggregator::new("Flacon", Currency::USD);
        fees.add("Flacon 5ml", Money::zero(Currency::USD)).unwrap();
        assert!(fees.finish().is_empty());
    }

    #[test]
    fn test_first_seen_order() {
        let mut fees = FeeAggregator::new("Flacon", Currency::USD);
        fees.add("B", Money::new(100, Currency::USD)).unwrap();
        fees.add("A", Money::new(200, Currency::USD)).unwrap();
        fees.add("B", Money::new(100, Currency::USD)).unwrap();

        let fees = fees.finish();
        let names: Vec<_> = fees.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
        assert_eq!(fee_total(&fees, Currency::USD).unwrap().amount_cents, 400);
    }

    #[test]
    fn test_currency_mismatch() {
        let mut fees = FeeAggregator::new("Flacon", Currency::USD);
        let result = fees.add("A", Money::new(100, Currency::EUR));
        assert!(matches!(result, Err(CommerceError::CurrencyMismatch { .. })));
    }

    #[test]
    fn test_fee_total_in_other_currency() {
        let mut fees = FeeAggregator::new("Flacon", Currency::UAH);
        fees.add("A", Money::new(100, Currency::UAH)).unwrap();
        let result = fee_total(&fees.finish(), Currency::USD);
        assert!(matches!(result, Err(CommerceError::CurrencyMismatch { .. })));
    }
}
