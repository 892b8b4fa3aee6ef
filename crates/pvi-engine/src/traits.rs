//! Seams between the pipeline and its external collaborators.
//!
//! Each trait mirrors exactly one method of a real client, so the
//! production impls are one-line delegations and tests can count calls
//! or script failures without a network.

use pvi_apify::{ApifyClient, ApifyError, MarketplaceListing};
use pvi_serper::{SerperClient, SerperError, ShoppingItem};
use pvi_textgen::{TextGenClient, TextGenError};

/// Text-generation seam (guardrail calibration, tax classification,
/// verdict scoring).
#[allow(async_fn_in_trait)]
pub trait Generator {
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String, TextGenError>;
}

impl<T: Generator> Generator for &T {
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String, TextGenError> {
        (**self).generate(prompt, temperature).await
    }
}

impl Generator for TextGenClient {
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String, TextGenError> {
        TextGenClient::generate(self, prompt, temperature).await
    }
}

/// Free-text web search seam (demand and sourcing signals).
#[allow(async_fn_in_trait)]
pub trait WebSearch {
    async fn web_search(&self, query: &str, geo_code: &str) -> Result<String, SerperError>;
}

impl<T: WebSearch> WebSearch for &T {
    async fn web_search(&self, query: &str, geo_code: &str) -> Result<String, SerperError> {
        (**self).web_search(query, geo_code).await
    }
}

impl WebSearch for SerperClient {
    async fn web_search(&self, query: &str, geo_code: &str) -> Result<String, SerperError> {
        SerperClient::web_search(self, query, geo_code).await
    }
}

/// Shopping search seam (tier-B price fallback).
#[allow(async_fn_in_trait)]
pub trait ShoppingSearch {
    async fn shopping_search(
        &self,
        query: &str,
        geo_code: &str,
        num: u32,
    ) -> Result<Vec<ShoppingItem>, SerperError>;
}

impl<T: ShoppingSearch> ShoppingSearch for &T {
    async fn shopping_search(
        &self,
        query: &str,
        geo_code: &str,
        num: u32,
    ) -> Result<Vec<ShoppingItem>, SerperError> {
        (**self).shopping_search(query, geo_code, num).await
    }
}

impl ShoppingSearch for SerperClient {
    async fn shopping_search(
        &self,
        query: &str,
        geo_code: &str,
        num: u32,
    ) -> Result<Vec<ShoppingItem>, SerperError> {
        SerperClient::shopping_search(self, query, geo_code, num).await
    }
}

/// Marketplace scraping seam (tier-A price discovery).
#[allow(async_fn_in_trait)]
pub trait MarketplaceSearch {
    async fn search_listings(
        &self,
        search_term: &str,
        region_code: &str,
        max_items: u32,
    ) -> Result<Vec<MarketplaceListing>, ApifyError>;
}

impl MarketplaceSearch for ApifyClient {
    async fn search_listings(
        &self,
        search_term: &str,
        region_code: &str,
        max_items: u32,
    ) -> Result<Vec<MarketplaceListing>, ApifyError> {
        ApifyClient::search_listings(self, search_term, region_code, max_items).await
    }
}
