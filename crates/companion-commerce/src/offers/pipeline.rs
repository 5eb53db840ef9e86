//! Named evaluation stages and the host extension points that run them.
//!
//! The engine has no callbacks of its own. A host storefront calls the
//! [`OfferEngine`](crate::offers::OfferEngine) method matching the
//! extension point it is at, and that method runs the stages listed here,
//! in order.

use std::fmt;

use serde::Serialize;

/// A single evaluation stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    ComputeRange,
    FilterEligible,
    ResolvePrice,
    ReconcileSelection,
    ClampQuantity,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::ComputeRange => "computeRange",
            Stage::FilterEligible => "filterEligible",
            Stage::ResolvePrice => "resolvePrice",
            Stage::ReconcileSelection => "reconcileSelection",
            Stage::ClampQuantity => "clampQuantity",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Points in the storefront lifecycle where the engine is invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtensionPoint {
    /// Product page render: quantity control and initial offer list.
    ProductRender,
    /// Live quantity edit on the product page.
    QuantityChange,
    /// Add-to-cart submission.
    AddToCart,
    /// Cart totals recalculation.
    CartRecalculation,
    /// Order creation at checkout.
    Checkout,
}

impl ExtensionPoint {
    /// Stages run at this point, in execution order.
    pub fn stages(&self) -> &'static [Stage] {
        use Stage::*;
        match self {
            ExtensionPoint::ProductRender => &[
                ComputeRange,
                ClampQuantity,
                FilterEligible,
                ResolvePrice,
                ReconcileSelection,
            ],
            ExtensionPoint::QuantityChange => &[FilterEligible, ResolvePrice, ReconcileSelection],
            ExtensionPoint::AddToCart => &[
                ComputeRange,
                ClampQuantity,
                FilterEligible,
                ResolvePrice,
                ReconcileSelection,
            ],
            ExtensionPoint::CartRecalculation => &[
                ComputeRange,
                ClampQuantity,
                FilterEligible,
                ResolvePrice,
                ReconcileSelection,
            ],
            ExtensionPoint::Checkout => &[ResolvePrice],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ExtensionPoint::ProductRender => "product_render",
            ExtensionPoint::QuantityChange => "quantity_change",
            ExtensionPoint::AddToCart => "add_to_cart",
            ExtensionPoint::CartRecalculation => "cart_recalculation",
            ExtensionPoint::Checkout => "checkout",
        }
    }

    /// Whether quantities crossing this point are forced into range.
    pub fn clamps_quantity(&self) -> bool {
        self.stages().contains(&Stage::ClampQuantity)
    }
}

impl fmt::Display for ExtensionPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
