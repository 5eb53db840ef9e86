//! Configuration file loading.

use std::path::Path;

use anyhow::{Context, Result};
use companion_commerce::config::OffersConfig;

/// Load an offer configuration, choosing the parser by file extension.
pub fn load(path: &str) -> Result<OffersConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path))?;

    if is_json(path) {
        OffersConfig::from_json_str(&content)
            .with_context(|| format!("Failed to parse JSON config: {}", path))
    } else {
        OffersConfig::from_toml_str(&content)
            .with_context(|| format!("Failed to parse TOML config: {}", path))
    }
}

fn is_json(path: &str) -> bool {
    Path::new(path)
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("json"))
}
