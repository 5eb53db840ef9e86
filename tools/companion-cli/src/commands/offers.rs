//! Offer refresh for a product and quantity.

use anyhow::Result;
use companion_commerce::offers::{OfferRequest, OfferResponse};
use companion_commerce::ProductId;

use super::OffersArgs;
use crate::context::Context;
use crate::output::price_badge;

/// Run the offers command.
pub fn run(args: OffersArgs, ctx: &Context) -> Result<()> {
    let request = OfferRequest {
        quantity: args.qty,
        product_id: Some(ProductId::new(args.product)),
        selected_offer_id: args.selected.map(ProductId::new),
    };
    ctx.output.debug(&format!("Request: {}", serde_json::to_string(&request)?));

    let response = ctx.engine.respond(&request);
    if ctx.output.is_json() {
        ctx.output.json(&response);
        return Ok(());
    }

    match response {
        OfferResponse::Success {
            eligible_offers, ..
        } => {
            ctx.output.header(&format!("Offers at quantity {}", request.quantity));
            for option in &eligible_offers {
                let marker = if option.checked { "(•)" } else { "( )" };
                println!(
                    "  {} {:10} {}  {}",
                    marker,
                    option.id.as_str(),
                    option.name,
                    price_badge(&option.price_display, option.free)
                );
            }
        }
        OfferResponse::Error { message } => ctx.output.warn(&message),
    }
    Ok(())
}
