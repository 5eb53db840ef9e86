//! Configuration validation.

use anyhow::Result;
use companion_commerce::catalog::ProductLookup;
use companion_commerce::offers::Offer;
use serde::Serialize;

use super::CheckArgs;
use crate::context::Context;
use crate::output::bound;

#[derive(Serialize)]
struct CheckReport<'a> {
    version: u64,
    currency: &'a str,
    target_category: &'a str,
    stock_fallback: bool,
    offers: &'a [Offer],
    missing_companions: Vec<String>,
}

/// Run the check command.
pub fn run(args: CheckArgs, ctx: &Context) -> Result<()> {
    let catalog = ctx.engine.catalog();
    let missing: Vec<String> = catalog
        .iter()
        .filter(|offer| ctx.storefront.get_product(&offer.id).is_none())
        .map(|offer| offer.id.to_string())
        .collect();

    if ctx.output.is_json() {
        ctx.output.json(&CheckReport {
            version: catalog.version(),
            currency: &ctx.config.currency,
            target_category: &ctx.config.target_category,
            stock_fallback: ctx.config.stock_fallback,
            offers: catalog.offers(),
            missing_companions: missing,
        });
        return Ok(());
    }

    ctx.output.header("Offer catalog");
    ctx.output.kv("Version", &format!("{:016x}", catalog.version()));
    ctx.output.kv("Currency", &ctx.config.currency);
    ctx.output.kv("Category", &ctx.config.target_category);
    ctx.output.kv(
        "Stock fallback",
        if ctx.config.stock_fallback { "on" } else { "off" },
    );
    println!();

    let widths = [10, 6, 6, 6];
    ctx.output.table_row(&["ID", "MIN", "MAX", "FREE"], &widths);
    for offer in catalog {
        ctx.output.table_row(
            &[
                offer.id.as_str(),
                &bound(offer.min),
                &bound(offer.max),
                &bound(offer.free_threshold),
            ],
            &widths,
        );
    }

    if args.products {
        ctx.output.header("Products");
        for entry in &ctx.config.companions {
            let stock = if entry.in_stock { "" } else { " (out of stock)" };
            ctx.output
                .kv("companion", &format!("{} {:.2}{}", entry.name, entry.price, stock));
        }
        for entry in &ctx.config.products {
            ctx.output.kv(
                "product",
                &format!("{} [{}]", entry.name, entry.categories.join(", ")),
            );
        }
    }

    for id in &missing {
        ctx.output
            .warn(&format!("Offer {} has no companion product and will never be shown", id));
    }
    if catalog.is_empty() {
        ctx.output.warn("Catalog is empty; every product gets the default range");
    }
    ctx.output.success(&format!("{} offers valid", catalog.len()));
    Ok(())
}
