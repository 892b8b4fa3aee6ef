//! Apify dataset item shapes.
//!
//! Listing records arrive in one of two observed shapes: a flat numeric
//! `price` field, or a nested `pricing` object whose `realPrice` carries
//! the value. Items are parsed individually and anything that does not
//! fit either shape (string prices, missing prices, zero prices) is
//! skipped rather than failing the whole dataset.

use serde::Deserialize;

/// A marketplace listing with a usable positive price.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketplaceListing {
    pub title: String,
    pub price: f64,
}

/// Raw dataset item, both price shapes optional.
#[derive(Debug, Deserialize)]
pub(crate) struct RawListing {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    price: Option<f64>,
    #[serde(default)]
    pricing: Option<RawPricing>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawPricing {
    #[serde(default, rename = "realPrice")]
    real_price: Option<f64>,
}

impl RawListing {
    /// The flat field wins; the nested shape is consulted only when the
    /// flat field is absent.
    fn unit_price(&self) -> Option<f64> {
        self.price
            .or_else(|| self.pricing.as_ref().and_then(|p| p.real_price))
    }

    /// Converts to a [`MarketplaceListing`] when a positive price exists.
    pub(crate) fn into_listing(self) -> Option<MarketplaceListing> {
        let price = self.unit_price()?;
        if price <= 0.0 {
            return None;
        }
        Some(MarketplaceListing {
            title: self.title.unwrap_or_else(|| "Unknown".to_string()),
            price,
        })
    }
}

/// Parses one dataset item, skipping anything that does not match
/// either price shape.
pub(crate) fn parse_item(value: serde_json::Value) -> Option<MarketplaceListing> {
    serde_json::from_value::<RawListing>(value)
        .ok()
        .and_then(RawListing::into_listing)
}
