//! The offer engine: catalog plus collaborators, invoked per extension point.

use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::cart::{fee_total, Cart, CartFee, CartLine, CartPricing, FeeAggregator};
use crate::catalog::{EligibilityGate, MinQuantitySource, ProductLookup};
use crate::checkout::{CompanionRecord, Order, OrderLineItem, OrderStatus};
use crate::error::CommerceError;
use crate::ids::{LineItemId, OrderId, OrderLineItemId, ProductId};
use crate::money::{Currency, Money};
use crate::offers::{
    eligible_offers, fallback_to_in_stock, price_offers, reconcile, resolve_price,
    resolve_range, ExtensionPoint, OfferCatalog, PricedOffer, Quantity, QuantityRange,
    RangeCache, RangeDefaults, Selection, Stage,
};

/// Engine-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Bounds used when no offer declares one.
    pub range_defaults: RangeDefaults,
    /// Steer selections away from out-of-stock companions.
    pub stock_fallback: bool,
    /// Prefix of aggregated fee labels.
    pub fee_label: String,
    /// Currency of carts created by the host.
    pub currency: Currency,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            range_defaults: RangeDefaults::default(),
            stock_fallback: false,
            fee_label: "Flacon".to_string(),
            currency: Currency::default(),
        }
    }
}

/// Values for the product page quantity control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityInput {
    pub min: Quantity,
    pub max: Quantity,
    /// Initial value shown on the product page.
    pub default: Quantity,
}

/// Offers and selection for one primary product at one quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferView {
    pub product_id: ProductId,
    pub quantity: Quantity,
    /// Eligible, resolvable offers in catalog order.
    pub offers: Vec<PricedOffer>,
    pub selection: Selection,
}

impl OfferView {
    fn empty(product_id: ProductId, quantity: Quantity, selection: Selection) -> Self {
        Self {
            product_id,
            quantity,
            offers: Vec::new(),
            selection,
        }
    }

    pub fn selected_offer_id(&self) -> Option<&ProductId> {
        self.selection.chosen_offer_id.as_ref()
    }

    /// Whether there is nothing to offer at this quantity.
    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }
}

/// An add-to-cart submission.
#[derive(Debug, Clone, PartialEq)]
pub struct AddToCart {
    pub product_id: ProductId,
    pub product_name: String,
    pub unit_price: Money,
    pub quantity: Quantity,
    /// Radio choice at submission time.
    pub chosen_offer_id: Option<ProductId>,
}

/// A cart line quantity forced back into range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuantityRepair {
    pub line_id: LineItemId,
    pub from: Quantity,
    pub to: Quantity,
}

/// A cart line whose chosen offer changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionChange {
    pub line_id: LineItemId,
    pub from: Option<ProductId>,
    pub to: Option<ProductId>,
}

/// What a cart recalculation changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CartRecalculation {
    pub repaired: Vec<QuantityRepair>,
    pub reselected: Vec<SelectionChange>,
}

impl CartRecalculation {
    pub fn is_unchanged(&self) -> bool {
        self.repaired.is_empty() && self.reselected.is_empty()
    }
}

/// Result of running one extension point's stages.
struct Evaluation {
    quantity: Quantity,
    offers: Vec<PricedOffer>,
    selection: Selection,
}

impl Evaluation {
    fn into_view(self, product_id: &ProductId) -> OfferView {
        OfferView {
            product_id: product_id.clone(),
            quantity: self.quantity,
            offers: self.offers,
            selection: self.selection,
        }
    }
}

/// Evaluates companion offers for primary products.
///
/// Built once per process (or per request) from a catalog and the
/// storefront collaborators, then shared; every method takes `&self`.
pub struct OfferEngine {
    catalog: Arc<OfferCatalog>,
    products: Arc<dyn ProductLookup>,
    gate: Arc<dyn EligibilityGate>,
    min_source: Arc<dyn MinQuantitySource>,
    settings: EngineSettings,
    ranges: Mutex<RangeCache>,
}

impl OfferEngine {
    /// Build an engine around a storefront implementing every collaborator.
    pub fn new<S>(catalog: OfferCatalog, storefront: Arc<S>, settings: EngineSettings) -> Self
    where
        S: ProductLookup + EligibilityGate + MinQuantitySource + 'static,
    {
        Self::from_parts(
            catalog,
            storefront.clone(),
            storefront.clone(),
            storefront,
            settings,
        )
    }

    /// Build an engine from separate collaborators.
    pub fn from_parts(
        catalog: OfferCatalog,
        products: Arc<dyn ProductLookup>,
        gate: Arc<dyn EligibilityGate>,
        min_source: Arc<dyn MinQuantitySource>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            catalog: Arc::new(catalog),
            products,
            gate,
            min_source,
            settings,
            ranges: Mutex::new(RangeCache::new()),
        }
    }

    pub fn catalog(&self) -> &OfferCatalog {
        &self.catalog
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Swap in a new catalog, dropping ranges memoized for the old one.
    pub fn replace_catalog(&mut self, catalog: OfferCatalog) {
        let version = catalog.version();
        self.catalog = Arc::new(catalog);
        self.ranges
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .retain_version(version);
        tracing::info!(version, offers = self.catalog.len(), "offer catalog replaced");
    }

    /// Whether the feature applies to this primary product.
    pub fn is_enabled(&self, product_id: &ProductId) -> bool {
        self.gate.is_eligible_product(product_id)
    }

    /// Memoized quantity range for a primary product.
    pub fn range(&self, product_id: &ProductId) -> QuantityRange {
        let version = self.catalog.version();
        let mut cache = self.ranges.lock().unwrap_or_else(PoisonError::into_inner);
        cache.get_or_insert_with(version, product_id, || {
            tracing::debug!(product_id = %product_id, "resolving quantity range");
            resolve_range(
                &self.catalog,
                self.min_source.external_min_qty(product_id),
                self.settings.range_defaults,
            )
        })
    }

    /// Quantity control settings for the product page.
    ///
    /// `None` when the feature does not apply to the product.
    pub fn quantity_input(&self, product_id: &ProductId) -> Option<QuantityInput> {
        if !self.is_enabled(product_id) {
            return None;
        }
        let range = self.range(product_id);
        Some(QuantityInput {
            min: range.min,
            max: range.max,
            default: range.clamp(range.min),
        })
    }

    /// Run the stages of an extension point for one primary product.
    ///
    /// Offers whose companion cannot be looked up are neither shown nor
    /// selectable. Without a filter stage, only the previously chosen offer
    /// is priced.
    fn run(
        &self,
        point: ExtensionPoint,
        product_id: &ProductId,
        quantity: Quantity,
        previous: &Selection,
    ) -> Evaluation {
        let mut eval = Evaluation {
            quantity,
            offers: Vec::new(),
            selection: previous.clone(),
        };
        let mut range = None;
        let mut eligible = None;

        for &stage in point.stages() {
            match stage {
                Stage::ComputeRange => range = Some(self.range(product_id)),
                Stage::ClampQuantity => {
                    if let Some(range) = range {
                        eval.quantity = range.clamp(eval.quantity);
                    }
                }
                Stage::FilterEligible => {
                    eligible = Some(eligible_offers(&self.catalog, eval.quantity));
                }
                Stage::ResolvePrice => {
                    eval.offers = match eligible.take() {
                        Some(offers) => price_offers(offers, eval.quantity, self.products.as_ref()),
                        None => previous
                            .chosen_offer_id
                            .as_ref()
                            .and_then(|id| self.catalog.get(id))
                            .and_then(|offer| {
                                resolve_price(offer, eval.quantity, self.products.as_ref())
                            })
                            .into_iter()
                            .collect(),
                    };
                }
                Stage::ReconcileSelection => {
                    let ids: Vec<ProductId> =
                        eval.offers.iter().map(|o| o.offer_id.clone()).collect();
                    eval.selection = reconcile(&ids, previous);
                    if self.settings.stock_fallback {
                        eval.selection = fallback_to_in_stock(&eval.offers, eval.selection);
                    }
                }
            }
            tracing::debug!(
                stage = %stage,
                quantity = eval.quantity,
                offers = eval.offers.len(),
                chosen = ?eval.selection.chosen_offer_id,
            );
        }

        eval
    }

    /// Initial offer list on the product page, at the range minimum.
    pub fn initial_view(&self, product_id: &ProductId) -> Option<OfferView> {
        let point = ExtensionPoint::ProductRender;
        let _span = tracing::debug_span!("offers", point = %point).entered();
        if !self.is_enabled(product_id) {
            return None;
        }
        let start = self.range(product_id).min;
        Some(
            self.run(point, product_id, start, &Selection::none())
                .into_view(product_id),
        )
    }

    /// Offer list after a live quantity edit.
    ///
    /// Rejects non-positive quantities. A product outside the feature gets
    /// an empty view.
    pub fn render(
        &self,
        product_id: &ProductId,
        quantity: Quantity,
        previous: &Selection,
    ) -> Result<OfferView, CommerceError> {
        let point = ExtensionPoint::QuantityChange;
        let _span = tracing::debug_span!("offers", point = %point).entered();
        if quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }
        if !self.is_enabled(product_id) {
            return Ok(OfferView::empty(product_id.clone(), quantity, Selection::none()));
        }

        Ok(self.run(point, product_id, quantity, previous).into_view(product_id))
    }

    /// Empty cart priced in the engine's currency.
    pub fn new_cart(&self, session_id: impl Into<String>) -> Cart {
        Cart::with_currency(session_id, self.settings.currency)
    }

    /// Add a primary product to the cart, capturing the companion choice.
    pub fn add_to_cart(&self, cart: &mut Cart, request: AddToCart) -> Result<LineItemId, CommerceError> {
        let point = ExtensionPoint::AddToCart;
        let _span = tracing::debug_span!("offers", point = %point).entered();
        if request.quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(request.quantity));
        }

        if !self.is_enabled(&request.product_id) {
            return cart.add_line(
                request.product_id,
                request.product_name,
                request.quantity,
                request.unit_price,
                Selection::none(),
            );
        }

        let eval = self.run(
            point,
            &request.product_id,
            request.quantity,
            &Selection::user_choice(request.chosen_offer_id),
        );
        cart.add_line(
            request.product_id,
            request.product_name,
            eval.quantity,
            request.unit_price,
            eval.selection,
        )
    }

    /// Repair quantities and reconcile selections for every eligible line.
    ///
    /// Lines are handled independently; order does not matter.
    pub fn recalculate_cart(&self, cart: &mut Cart) -> Result<CartRecalculation, CommerceError> {
        let point = ExtensionPoint::CartRecalculation;
        let _span = tracing::debug_span!("offers", point = %point).entered();
        let mut report = CartRecalculation::default();

        let lines: Vec<(LineItemId, ProductId, Quantity, Selection)> = cart
            .items
            .iter()
            .filter(|line| self.is_enabled(&line.product_id))
            .map(|line| {
                (
                    line.id.clone(),
                    line.product_id.clone(),
                    line.quantity,
                    line.selection.clone(),
                )
            })
            .collect();

        for (line_id, product_id, quantity, selection) in lines {
            let eval = self.run(point, &product_id, quantity, &selection);
            if eval.quantity != quantity {
                tracing::warn!(
                    line_id = %line_id,
                    from = quantity,
                    to = eval.quantity,
                    "cart line quantity outside allowed range, repairing"
                );
                cart.set_quantity(&line_id, eval.quantity)?;
                report.repaired.push(QuantityRepair {
                    line_id: line_id.clone(),
                    from: quantity,
                    to: eval.quantity,
                });
            }

            if eval.selection != selection {
                if eval.selection.chosen_offer_id != selection.chosen_offer_id {
                    report.reselected.push(SelectionChange {
                        line_id: line_id.clone(),
                        from: selection.chosen_offer_id.clone(),
                        to: eval.selection.chosen_offer_id.clone(),
                    });
                }
                cart.set_selection(&line_id, eval.selection)?;
            }
        }

        Ok(report)
    }

    /// Priced companion for a cart line, if it carries a resolvable one.
    pub fn line_charge(&self, line: &CartLine) -> Option<PricedOffer> {
        if !self.is_enabled(&line.product_id) {
            return None;
        }
        self.run(
            ExtensionPoint::Checkout,
            &line.product_id,
            line.quantity,
            &line.selection,
        )
        .offers
        .into_iter()
        .next()
    }

    /// Aggregated companion fees for the cart.
    pub fn cart_fees(&self, cart: &Cart) -> Result<Vec<CartFee>, CommerceError> {
        let mut fees = FeeAggregator::new(self.settings.fee_label.clone(), cart.currency);
        for line in &cart.items {
            if let Some(charge) = self.line_charge(line) {
                fees.add(&charge.name, charge.price)?;
            }
        }
        Ok(fees.finish())
    }

    /// Cart totals including companion fees.
    pub fn cart_pricing(&self, cart: &Cart) -> Result<CartPricing, CommerceError> {
        let subtotal = cart.subtotal()?;
        let fees = self.cart_fees(cart)?;
        let fee_total = fee_total(&fees, cart.currency)?;
        let grand_total = subtotal.try_add(&fee_total).ok_or(CommerceError::Overflow)?;

        Ok(CartPricing {
            subtotal,
            fees,
            fee_total,
            grand_total,
        })
    }

    /// Create an order, persisting each line's chosen companion.
    ///
    /// The cart is expected to have been recalculated first.
    pub fn checkout(&self, cart: &Cart, email: impl Into<String>) -> Result<Order, CommerceError> {
        let _span = tracing::debug_span!("offers", point = %ExtensionPoint::Checkout).entered();
        if cart.is_empty() {
            return Err(CommerceError::EmptyCart);
        }

        let line_items = cart
            .items
            .iter()
            .map(|line| OrderLineItem {
                id: OrderLineItemId::generate(),
                product_id: line.product_id.clone(),
                name: line.product_name.clone(),
                quantity: line.quantity,
                unit_price: line.unit_price,
                total_price: line.total_price,
                companion: self.line_charge(line).map(|charge| CompanionRecord {
                    offer_id: charge.offer_id,
                    name: charge.name,
                    price: charge.price,
                }),
            })
            .collect();
        let pricing = self.cart_pricing(cart)?;

        let order = Order {
            id: OrderId::generate(),
            order_number: Order::generate_order_number(),
            email: email.into(),
            status: OrderStatus::Pending,
            line_items,
            fees: pricing.fees,
            subtotal: pricing.subtotal,
            fee_total: pricing.fee_total,
            grand_total: pricing.grand_total,
            currency: cart.currency,
            created_at: crate::cart::current_timestamp(),
        };
        tracing::info!(
            order_id = %order.id,
            lines = order.line_items.len(),
            "order created"
        );
        Ok(order)
    }
}

impl std::fmt::Debug for OfferEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OfferEngine")
            .field("catalog", &self.catalog)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
