//! Quantity range for a product.

use anyhow::{bail, Result};
use companion_commerce::ProductId;

use super::RangeArgs;
use crate::context::Context;

/// Run the range command.
pub fn run(args: RangeArgs, ctx: &Context) -> Result<()> {
    let product_id = ProductId::new(args.product);
    if ctx.storefront.primary(&product_id).is_none() {
        bail!("Unknown product: {}", product_id);
    }

    let Some(input) = ctx.engine.quantity_input(&product_id) else {
        bail!(
            "Product {} is not in category '{}'; companion offers do not apply",
            product_id,
            ctx.storefront.target_category()
        );
    };

    if ctx.output.is_json() {
        ctx.output.json(&input);
        return Ok(());
    }

    ctx.output.header(&format!("Quantity range for {}", product_id));
    ctx.output.kv("Min", &input.min.to_string());
    ctx.output.kv("Max", &input.max.to_string());
    ctx.output.kv("Default", &input.default.to_string());

    if args.values {
        let range = ctx.engine.range(&product_id);
        let values: Vec<String> = range.values().map(|q| q.to_string()).collect();
        ctx.output.kv("Values", &values.join(" "));
    }
    Ok(())
}
