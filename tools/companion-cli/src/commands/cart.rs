//! Cart recalculation.

use anyhow::{Context as _, Result};
use companion_commerce::cart::Cart;
use serde::Serialize;

use super::CartArgs;
use crate::context::Context;

#[derive(Serialize)]
struct CartReport<'a> {
    recalculation: &'a companion_commerce::offers::CartRecalculation,
    pricing: &'a companion_commerce::cart::CartPricing,
}

/// Run the cart command.
pub fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    let content = std::fs::read_to_string(&args.path)
        .with_context(|| format!("Failed to read cart file: {}", args.path))?;
    let mut cart: Cart = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse cart file: {}", args.path))?;

    let recalculation = ctx.engine.recalculate_cart(&mut cart)?;
    let pricing = ctx.engine.cart_pricing(&cart)?;

    if args.write && !recalculation.is_unchanged() {
        let content = serde_json::to_string_pretty(&cart)?;
        std::fs::write(&args.path, content)
            .with_context(|| format!("Failed to write cart file: {}", args.path))?;
    }

    if ctx.output.is_json() {
        ctx.output.json(&CartReport {
            recalculation: &recalculation,
            pricing: &pricing,
        });
        return Ok(());
    }

    ctx.output.header(&format!("Cart {}", cart.id));
    for repair in &recalculation.repaired {
        ctx.output.warn(&format!(
            "Line {}: quantity {} repaired to {}",
            repair.line_id, repair.from, repair.to
        ));
    }
    for change in &recalculation.reselected {
        ctx.output.info(&format!(
            "Line {}: companion {} -> {}",
            change.line_id,
            change.from.as_ref().map_or("none", |id| id.as_str()),
            change.to.as_ref().map_or("none", |id| id.as_str()),
        ));
    }

    ctx.output.kv("Subtotal", &pricing.subtotal.display());
    for fee in &pricing.fees {
        ctx.output.kv(&fee.label, &fee.price.display());
    }
    ctx.output.kv("Total", &pricing.grand_total.display());

    if args.write {
        if recalculation.is_unchanged() {
            ctx.output.info("Cart unchanged, nothing written");
        } else {
            ctx.output.success(&format!("Wrote {}", args.path));
        }
    }
    Ok(())
}
