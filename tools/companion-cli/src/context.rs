//! CLI execution context.

use std::sync::Arc;

use anyhow::{Context as _, Result};
use companion_commerce::catalog::InMemoryStorefront;
use companion_commerce::config::OffersConfig;
use companion_commerce::offers::OfferEngine;

use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// Parsed configuration.
    pub config: OffersConfig,
    /// Engine built from the configuration.
    pub engine: OfferEngine,
    /// Storefront serving the configured products.
    pub storefront: Arc<InMemoryStorefront>,
    /// Output handler.
    pub output: Output,
}

impl Context {
    /// Load the configuration and build the engine.
    pub fn load(config_path: &str, output: Output) -> Result<Self> {
        let config = crate::config::load(config_path)?;
        let (engine, storefront) = config
            .build_engine()
            .with_context(|| format!("Invalid offer configuration in {}", config_path))?;

        tracing::debug!(
            path = config_path,
            offers = engine.catalog().len(),
            version = engine.catalog().version(),
            "configuration loaded"
        );

        Ok(Self {
            config,
            engine,
            storefront,
            output,
        })
    }
}
