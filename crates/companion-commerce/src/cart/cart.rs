//! Cart and cart line types.

use crate::error::CommerceError;
use crate::ids::{CartId, LineItemId, ProductId};
use crate::money::{Currency, Money};
use crate::offers::{Quantity, Selection};
use serde::{Deserialize, Serialize};

/// A shopping cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    /// Unique cart identifier.
    pub id: CartId,
    /// Session ID for anonymous carts.
    pub session_id: String,
    /// Lines in the cart.
    pub items: Vec<CartLine>,
    /// Cart currency.
    pub currency: Currency,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp of last update.
    pub updated_at: i64,
}

impl Cart {
    /// Create a new cart for a session.
    pub fn new(session_id: impl Into<String>) -> Self {
        Self::with_currency(session_id, Currency::default())
    }

    /// Create a new cart in the given currency.
    pub fn with_currency(session_id: impl Into<String>, currency: Currency) -> Self {
        let now = current_timestamp();
        Self {
            id: CartId::generate(),
            session_id: session_id.into(),
            items: Vec::new(),
            currency,
            created_at: now,
            updated_at: now,
        }
    }

    /// Append a line to the cart.
    ///
    /// Lines are never merged: two adds of the same product may carry
    /// different companion choices, so each gets its own line.
    pub fn add_line(
        &mut self,
        product_id: ProductId,
        product_name: impl Into<String>,
        quantity: Quantity,
        unit_price: Money,
        selection: Selection,
    ) -> Result<LineItemId, CommerceError> {
        validate_quantity(quantity)?;

        let line = CartLine::new(product_id, product_name, quantity, unit_price, selection)?;
        let id = line.id.clone();
        self.items.push(line);
        self.updated_at = current_timestamp();
        Ok(id)
    }

    /// Set a line's quantity.
    ///
    /// Returns `Ok(false)` when the line does not exist.
    pub fn set_quantity(
        &mut self,
        line_item_id: &LineItemId,
        quantity: Quantity,
    ) -> Result<bool, CommerceError> {
        validate_quantity(quantity)?;

        match self.items.iter_mut().find(|i| &i.id == line_item_id) {
            Some(item) => {
                item.quantity = quantity;
                item.update_total()?;
                self.updated_at = current_timestamp();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Replace a line's selection.
    pub fn set_selection(
        &mut self,
        line_item_id: &LineItemId,
        selection: Selection,
    ) -> Result<(), CommerceError> {
        let item = self
            .items
            .iter_mut()
            .find(|i| &i.id == line_item_id)
            .ok_or_else(|| CommerceError::ItemNotInCart(line_item_id.to_string()))?;
        item.selection = selection;
        self.updated_at = current_timestamp();
        Ok(())
    }

    /// Remove a line from the cart.
    pub fn remove_item(&mut self, line_item_id: &LineItemId) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| &i.id != line_item_id);
        let removed = self.items.len() < len_before;
        if removed {
            self.updated_at = current_timestamp();
        }
        removed
    }

    /// Total item count (sum of quantities).
    pub fn item_count(&self) -> Quantity {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get a line by ID.
    pub fn get_item(&self, line_item_id: &LineItemId) -> Option<&CartLine> {
        self.items.iter().find(|i| &i.id == line_item_id)
    }

    /// Sum of primary product line totals.
    pub fn subtotal(&self) -> Result<Money, CommerceError> {
        Money::try_sum(self.items.iter().map(|i| &i.total_price), self.currency)
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new("anonymous")
    }
}

/// A line in the cart: a primary product, its quantity and companion selection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLine {
    /// Unique line identifier.
    pub id: LineItemId,
    /// Primary product.
    pub product_id: ProductId,
    /// Product name (denormalized for display).
    pub product_name: String,
    /// Quantity.
    pub quantity: Quantity,
    /// Unit price of the primary product.
    pub unit_price: Money,
    /// Total price (unit_price * quantity).
    pub total_price: Money,
    /// Companion offer selection.
    #[serde(default)]
    pub selection: Selection,
}

impl CartLine {
    /// Create a new line.
    pub fn new(
        product_id: ProductId,
        product_name: impl Into<String>,
        quantity: Quantity,
        unit_price: Money,
        selection: Selection,
    ) -> Result<Self, CommerceError> {
        let total_price = unit_price
            .try_multiply(quantity)
            .ok_or(CommerceError::Overflow)?;
        Ok(Self {
            id: LineItemId::generate(),
            product_id,
            product_name: product_name.into(),
            quantity,
            unit_price,
            total_price,
            selection,
        })
    }

    /// Recompute the total after a quantity change.
    pub fn update_total(&mut self) -> Result<(), CommerceError> {
        self.total_price = self
            .unit_price
            .try_multiply(self.quantity)
            .ok_or(CommerceError::Overflow)?;
        Ok(())
    }

    /// The companion currently chosen for this line.
    pub fn chosen_offer(&self) -> Option<&ProductId> {
        self.selection.chosen_offer_id.as_ref()
    }
}

/// Lines only require a positive quantity; upper bounds come from the
/// resolved offer range.
fn validate_quantity(quantity: Quantity) -> Result<(), CommerceError> {
    if quantity <= 0 {
        return Err(CommerceError::InvalidQuantity(quantity));
    }
    Ok(())
}

/// Get current Unix timestamp.
pub(crate) fn current_timestamp() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
