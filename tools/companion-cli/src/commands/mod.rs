//! CLI command implementations.

pub mod cart;
pub mod check;
pub mod offers;
pub mod range;

use clap::Args;

/// Arguments for the check command.
#[derive(Args)]
pub struct CheckArgs {
    /// Also list the configured companion and primary products.
    #[arg(long)]
    pub products: bool,
}

/// Arguments for the range command.
#[derive(Args)]
pub struct RangeArgs {
    /// Primary product id.
    pub product: String,

    /// List every selectable quantity.
    #[arg(long)]
    pub values: bool,
}

/// Arguments for the offers command.
#[derive(Args)]
pub struct OffersArgs {
    /// Primary product id.
    pub product: String,

    /// Purchase quantity.
    #[arg(short, long)]
    pub qty: i64,

    /// Offer currently selected on the page.
    #[arg(short, long)]
    pub selected: Option<String>,
}

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    /// Cart file (JSON).
    pub path: String,

    /// Write the recalculated cart back to the file.
    #[arg(short, long)]
    pub write: bool,
}
