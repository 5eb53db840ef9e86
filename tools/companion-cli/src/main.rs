//! Companion CLI - inspect offer catalogs and carts from the command line.
//!
//! Commands:
//! - `companion check` - Validate the configuration and list the catalog
//! - `companion range` - Quantity control settings for a product
//! - `companion offers` - Offer refresh response for a quantity
//! - `companion cart` - Recalculate a saved cart

mod commands;
mod config;
mod context;
mod output;
mod telemetry;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{CartArgs, CheckArgs, OffersArgs, RangeArgs};
use telemetry::LogFormat;

/// Companion CLI - Evaluate quantity-gated companion offers
#[derive(Parser)]
#[command(name = "companion")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Offer configuration file (TOML or JSON)
    #[arg(short, long, global = true, default_value = "companion.toml")]
    config: String,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the configuration and print the offer catalog
    Check(CheckArgs),

    /// Show the allowed quantity range for a product
    Range(RangeArgs),

    /// Show the offers available for a product at a quantity
    Offers(OffersArgs),

    /// Recalculate a saved cart and print fees and totals
    Cart(CartArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    telemetry::init(cli.verbose, cli.log_format);

    let output = output::Output::new(cli.verbose, cli.json);

    let ctx = match context::Context::load(&cli.config, output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Check(args) => commands::check::run(args, &ctx),
        Commands::Range(args) => commands::range::run(args, &ctx),
        Commands::Offers(args) => commands::offers::run(args, &ctx),
        Commands::Cart(args) => commands::cart::run(args, &ctx),
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
