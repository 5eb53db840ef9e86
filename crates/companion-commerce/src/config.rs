//! Offer catalog configuration.
//!
//! A configuration file lists the offers together with the companion and
//! primary products an in-memory storefront serves. Ids may be written as
//! integers or strings.
//!
//! ```toml
//! currency = "UAH"
//! target_category = "rozpyv"
//!
//! [[offers]]
//! id = 63
//! min = 2
//! max = 15
//! free = 3
//!
//! [[companions]]
//! id = 63
//! name = "Flacon 5ml"
//! price = 15.0
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::{CompanionProduct, InMemoryStorefront, PrimaryProduct};
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::{Currency, Money};
use crate::offers::{EngineSettings, Offer, OfferCatalog, OfferEngine, Quantity, RangeDefaults};

/// An id as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigId {
    Number(u64),
    Text(String),
}

impl From<&ConfigId> for ProductId {
    fn from(id: &ConfigId) -> Self {
        match id {
            ConfigId::Number(n) => ProductId::from(*n),
            ConfigId::Text(s) => ProductId::new(s.clone()),
        }
    }
}

/// One `[[offers]]` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferEntry {
    pub id: ConfigId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free: Option<Quantity>,
}

/// One `[[companions]]` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanionEntry {
    pub id: ConfigId,
    pub name: String,
    /// Price in major units, e.g. `15.5`.
    pub price: f64,
    #[serde(default = "default_true")]
    pub in_stock: bool,
}

/// One `[[products]]` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductEntry {
    pub id: ConfigId,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub categories: Vec<String>,
    /// Minimum quantity from an external quantity-rules source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_qty: Option<Quantity>,
}

/// Top-level offer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OffersConfig {
    /// ISO currency code for every price in the file.
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Category whose products get companion offers.
    #[serde(default = "default_target_category")]
    pub target_category: String,

    /// Steer selections away from out-of-stock companions.
    #[serde(default)]
    pub stock_fallback: bool,

    #[serde(default = "default_min")]
    pub default_min: Quantity,

    #[serde(default = "default_max")]
    pub default_max: Quantity,

    /// Prefix of aggregated fee labels.
    #[serde(default = "default_fee_label")]
    pub fee_label: String,

    #[serde(default)]
    pub offers: Vec<OfferEntry>,

    #[serde(default)]
    pub companions: Vec<CompanionEntry>,

    #[serde(default)]
    pub products: Vec<ProductEntry>,
}

fn default_true() -> bool {
    true
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_target_category() -> String {
    "rozpyv".to_string()
}

fn default_min() -> Quantity {
    RangeDefaults::default().min
}

fn default_max() -> Quantity {
    RangeDefaults::default().max
}

fn default_fee_label() -> String {
    "Flacon".to_string()
}

impl Default for OffersConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            target_category: default_target_category(),
            stock_fallback: false,
            default_min: default_min(),
            default_max: default_max(),
            fee_label: default_fee_label(),
            offers: Vec::new(),
            companions: Vec::new(),
            products: Vec::new(),
        }
    }
}

impl OffersConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, CommerceError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self, CommerceError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Parsed currency.
    pub fn currency(&self) -> Result<Currency, CommerceError> {
        Currency::from_code(&self.currency)
            .ok_or_else(|| CommerceError::UnknownCurrency(self.currency.clone()))
    }

    /// Validate the offers and build a catalog.
    pub fn build_catalog(&self) -> Result<OfferCatalog, CommerceError> {
        let offers = self
            .offers
            .iter()
            .map(|entry| Offer {
                id: ProductId::from(&entry.id),
                min: entry.min,
                max: entry.max,
                free_threshold: entry.free,
            })
            .collect();
        OfferCatalog::new(offers)
    }

    /// In-memory storefront serving the configured products.
    pub fn storefront(&self) -> Result<InMemoryStorefront, CommerceError> {
        let currency = self.currency()?;
        let mut storefront = InMemoryStorefront::new(self.target_category.clone());

        for entry in &self.companions {
            let mut companion = CompanionProduct::new(
                &entry.id,
                entry.name.clone(),
                Money::from_decimal(entry.price, currency),
            );
            companion.in_stock = entry.in_stock;
            storefront.add_companion(companion);
        }

        for entry in &self.products {
            let mut product = PrimaryProduct::new(
                &entry.id,
                entry.name.clone(),
                Money::from_decimal(entry.price, currency),
            );
            product.categories = entry.categories.clone();
            product.min_qty = entry.min_qty;
            storefront.add_product(product);
        }

        Ok(storefront)
    }

    /// Engine settings from the scalar options.
    pub fn settings(&self) -> Result<EngineSettings, CommerceError> {
        if self.default_min <= 0 || self.default_min > self.default_max {
            return Err(CommerceError::ConfigError(format!(
                "invalid default range {}..={}",
                self.default_min, self.default_max
            )));
        }

        Ok(EngineSettings {
            range_defaults: RangeDefaults {
                min: self.default_min,
                max: self.default_max,
            },
            stock_fallback: self.stock_fallback,
            fee_label: self.fee_label.clone(),
            currency: self.currency()?,
        })
    }

    /// Validate everything and build an engine over the in-memory storefront.
    pub fn build_engine(&self) -> Result<(OfferEngine, Arc<InMemoryStorefront>), CommerceError> {
        let storefront = Arc::new(self.storefront()?);
        let engine = OfferEngine::new(self.build_catalog()?, storefront.clone(), self.settings()?);
        Ok((engine, storefront))
    }
}
