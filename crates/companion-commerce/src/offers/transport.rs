//! Request and response shapes for the live quantity refresh.

use serde::{Deserialize, Serialize};

use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::Money;
use crate::offers::{OfferEngine, OfferView, PricedOffer, Quantity, Selection};

const INVALID_INPUT: &str = "Invalid input.";
const NO_OFFERS: &str = "No valid related products.";

/// Offer refresh request sent by the product page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferRequest {
    pub quantity: Quantity,
    #[serde(default)]
    pub product_id: Option<ProductId>,
    /// Radio choice currently checked on the page.
    #[serde(default)]
    pub selected_offer_id: Option<ProductId>,
}

/// One radio option in the response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferOption {
    pub id: ProductId,
    pub name: String,
    pub price: Money,
    /// "Free" when the threshold is met, otherwise the formatted price.
    pub price_display: String,
    pub free: bool,
    pub checked: bool,
}

impl OfferOption {
    fn from_priced(offer: &PricedOffer, selected: Option<&ProductId>) -> Self {
        let free = offer.is_free();
        Self {
            id: offer.offer_id.clone(),
            name: offer.name.clone(),
            price: offer.price,
            price_display: if free {
                "Free".to_string()
            } else {
                offer.price.display()
            },
            free,
            checked: selected == Some(&offer.offer_id),
        }
    }
}

/// Offer refresh response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OfferResponse {
    Success {
        eligible_offers: Vec<OfferOption>,
        selected_offer_id: Option<ProductId>,
    },
    Error {
        message: String,
    },
}

impl OfferResponse {
    pub fn error(message: impl Into<String>) -> Self {
        OfferResponse::Error {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, OfferResponse::Success { .. })
    }
}

impl From<&OfferView> for OfferResponse {
    fn from(view: &OfferView) -> Self {
        let selected = view.selected_offer_id();
        OfferResponse::Success {
            eligible_offers: view
                .offers
                .iter()
                .map(|o| OfferOption::from_priced(o, selected))
                .collect(),
            selected_offer_id: selected.cloned(),
        }
    }
}

impl OfferEngine {
    /// Answer a refresh request.
    ///
    /// Invalid input and "nothing selectable" both become error responses;
    /// everything else is a success carrying the eligible offers. Failures
    /// not caused by the request are reported with their own message.
    pub fn respond(&self, request: &OfferRequest) -> OfferResponse {
        let view = match self.view_for(request) {
            Ok(view) => view,
            Err(e) if e.is_user_facing() => {
                tracing::debug!(error = %e, "rejecting offer request");
                return OfferResponse::error(INVALID_INPUT);
            }
            Err(e) => {
                tracing::error!(error = %e, "offer evaluation failed");
                return OfferResponse::error(e.to_string());
            }
        };

        if view.is_empty() || view.selected_offer_id().is_none() {
            return OfferResponse::error(NO_OFFERS);
        }
        OfferResponse::from(&view)
    }

    fn view_for(&self, request: &OfferRequest) -> Result<OfferView, CommerceError> {
        let product_id = request
            .product_id
            .as_ref()
            .filter(|id| !id.as_str().is_empty())
            .ok_or(CommerceError::MissingProduct)?;
        let previous = Selection::user_choice(request.selected_offer_id.clone());
        self.render(product_id, request.quantity, &previous)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::catalog::{CompanionProduct, InMemoryStorefront, PrimaryProduct};
    use crate::money::Currency;
    use crate::offers::{EngineSettings, Offer, OfferCatalog};

    fn engine() -> OfferEngine {
        let uah = |n| Money::new(n, Currency::UAH);
        let store = InMemoryStorefront::new("rozpyv")
            .with_product(PrimaryProduct::new("10", "Perfume", uah(500)).with_category("rozpyv"))
            .with_companion(CompanionProduct::new("1", "Flacon 5ml", uah(1000)))
            .with_companion(CompanionProduct::new("2", "Flacon 10ml", uah(1500)));
        let catalog = OfferCatalog::new(vec![
            Offer::bounded("1", 2, 15).free_from(3),
            Offer::bounded("2", 2, 30),
        ])
        .unwrap();
        OfferEngine::new(catalog, Arc::new(store), EngineSettings::default())
    }

    fn request(quantity: Quantity, product: Option<&str>, selected: Option<&str>) -> OfferRequest {
        OfferRequest {
            quantity,
            product_id: product.map(ProductId::new),
            selected_offer_id: selected.map(ProductId::new),
        }
    }

    #[test]
    fn test_success_marks_selected_and_free() {
        let response = engine().respond(&request(3, Some("10"), Some("2")));
        let OfferResponse::Success {
            eligible_offers,
            selected_offer_id,
        } = response
        else {
            panic!("expected success, got {:?}", response);
        };

        assert_eq!(selected_offer_id, Some(ProductId::new("2")));
        assert_eq!(eligible_offers.len(), 2);
        assert!(eligible_offers[0].free);
        assert_eq!(eligible_offers[0].price_display, "Free");
        assert!(!eligible_offers[0].checked);
        assert!(eligible_offers[1].checked);
    }

    #[test]
    fn test_invalid_input() {
        let engine = engine();
        assert_eq!(
            engine.respond(&request(0, Some("10"), None)),
            OfferResponse::error("Invalid input.")
        );
        assert_eq!(
            engine.respond(&request(3, None, None)),
            OfferResponse::error("Invalid input.")
        );
    }

    #[test]
    fn test_no_offers() {
        assert_eq!(
            engine().respond(&request(50, Some("10"), None)),
            OfferResponse::error("No valid related products.")
        );
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_value(OfferResponse::error("Invalid input.")).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "Invalid input.");

        let parsed: OfferRequest = serde_json::from_str(r#"{"quantity": 4}"#).unwrap();
        assert_eq!(parsed, request(4, None, None));
    }
}
