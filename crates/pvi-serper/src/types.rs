//! Serper API response shapes.
//!
//! Only the fields the pipeline consumes are modeled; both endpoints
//! return much larger objects and serde ignores the rest. `organic` /
//! `shopping` default to empty because the API omits the key entirely
//! when there are no results for a region.

use serde::Deserialize;

/// Top-level response from `POST /search`.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub organic: Vec<OrganicResult>,
}

/// One organic web search result.
#[derive(Debug, Clone, Deserialize)]
pub struct OrganicResult {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub snippet: String,
}

/// Top-level response from `POST /shopping`.
#[derive(Debug, Deserialize)]
pub(crate) struct ShoppingResponse {
    #[serde(default)]
    pub shopping: Vec<ShoppingItem>,
}

/// One shopping listing. `price` is a currency-formatted display string
/// (e.g. `"₹4,999"`) and may be absent on sponsored tiles.
#[derive(Debug, Clone, Deserialize)]
pub struct ShoppingItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub price: Option<String>,
}
