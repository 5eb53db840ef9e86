//! Order types.
//!
//! An order line stores the companion chosen at checkout together with the
//! name and price charged at that moment. Order views read this record and
//! never re-run offer eligibility against the stored quantity.

use crate::cart::{current_timestamp, CartFee};
use crate::ids::{OrderId, OrderLineItemId, ProductId};
use crate::money::{Currency, Money};
use crate::offers::Quantity;
use serde::{Deserialize, Serialize};

/// Order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    /// Order placed, awaiting processing.
    #[default]
    Pending,
    /// Order being prepared.
    Processing,
    /// Order completed.
    Completed,
    /// Order cancelled.
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

/// Companion chosen for an order line, frozen at checkout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompanionRecord {
    /// Offer / companion product id.
    pub offer_id: ProductId,
    /// Companion name at checkout.
    pub name: String,
    /// Price charged at checkout (zero when the free threshold was met).
    pub price: Money,
}

/// A placed order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Unique order identifier.
    pub id: OrderId,
    /// Human-readable order number.
    pub order_number: String,
    /// Customer email.
    pub email: String,
    /// Order status.
    pub status: OrderStatus,
    /// Items in the order.
    pub line_items: Vec<OrderLineItem>,
    /// Companion fee lines as charged.
    pub fees: Vec<CartFee>,
    /// Sum of primary product lines.
    pub subtotal: Money,
    /// Sum of companion fees.
    pub fee_total: Money,
    /// Grand total charged.
    pub grand_total: Money,
    /// Order currency.
    pub currency: Currency,
    /// Unix timestamp of creation.
    pub created_at: i64,
}

impl Order {
    /// Generate a new order number.
    pub fn generate_order_number() -> String {
        format!("ORD-{}", current_timestamp())
    }

    /// Total item count.
    pub fn item_count(&self) -> Quantity {
        self.line_items.iter().map(|i| i.quantity).sum()
    }

    /// `(line name, companion summary)` for every line with a companion.
    ///
    /// Used by confirmation e-mails and the admin order view.
    pub fn companion_lines(&self) -> Vec<(String, String)> {
        self.line_items
            .iter()
            .filter_map(|item| item.companion_summary().map(|s| (item.name.clone(), s)))
            .collect()
    }

    /// Whether any line carries a companion.
    pub fn has_companions(&self) -> bool {
        self.line_items.iter().any(|i| i.companion.is_some())
    }
}

/// A line item in an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLineItem {
    /// Unique line item identifier.
    pub id: OrderLineItemId,
    /// Product ID.
    pub product_id: ProductId,
    /// Product name at time of order.
    pub name: String,
    /// Quantity ordered.
    pub quantity: Quantity,
    /// Unit price at time of order.
    pub unit_price: Money,
    /// Total price for this line.
    pub total_price: Money,
    /// Companion chosen for this line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub companion: Option<CompanionRecord>,
}

impl OrderLineItem {
    /// "Name: price" for the stored companion.
    pub fn companion_summary(&self) -> Option<String> {
        self.companion
            .as_ref()
            .map(|c| format!("{}: {}", c.name, c.price.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(name: &str, companion: Option<CompanionRecord>) -> OrderLineItem {
        OrderLineItem {
            id: OrderLineItemId::generate(),
            product_id: ProductId::new("10"),
            name: name.to_string(),
            quantity: 3,
            unit_price: Money::new(1000, Currency::USD),
            total_price: Money::new(3000, Currency::USD),
            companion,
        }
    }

    #[test]
    fn test_companion_summary() {
        let item = line(
            "Perfume",
            Some(CompanionRecord {
                offer_id: ProductId::new("63"),
                name: "Flacon 5ml".to_string(),
                price: Money::zero(Currency::USD),
            }),
        );
        assert_eq!(item.companion_summary().unwrap(), "Flacon 5ml: $0.00");
        assert!(line("Candle", None).companion_summary().is_none());
    }

    #[test]
    fn test_order_number_generation() {
        assert!(Order::generate_order_number().starts_with("ORD-"));
    }

    #[test]
    fn test_status_as_str() {
        assert_eq!(OrderStatus::default().as_str(), "pending");
    }
}
