//! HTTP client for the Serper search API.
//!
//! Two endpoints are consumed: `POST /search` for free-text demand and
//! sourcing signals, and `POST /shopping` for the tier-B price
//! fallback. Authentication is the `X-API-KEY` header on every call.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Serialize;

use crate::error::SerperError;
use crate::types::{SearchResponse, ShoppingItem, ShoppingResponse};

const DEFAULT_BASE_URL: &str = "https://google.serper.dev";

/// Normalizes a search geolocation code to the shopping endpoint's
/// expectation. The search API accepts `uk` but the shopping API wants
/// the ISO code `gb`; every other supported code passes through.
#[must_use]
pub fn normalize_shopping_geo(geo_code: &str) -> &str {
    match geo_code {
        "uk" => "gb",
        other => other,
    }
}

/// Client for the Serper search API.
///
/// Use [`SerperClient::new`] for production or
/// [`SerperClient::with_base_url`] to point at a mock server in tests.
pub struct SerperClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

#[derive(Serialize)]
struct SearchBody<'a> {
    q: &'a str,
    gl: &'a str,
}

#[derive(Serialize)]
struct ShoppingBody<'a> {
    q: &'a str,
    gl: &'a str,
    num: u32,
}

impl SerperClient {
    /// Creates a new client pointed at the production Serper API.
    ///
    /// # Errors
    ///
    /// Returns [`SerperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, SerperError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SerperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`SerperError::Config`] if `base_url` is
    /// not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, SerperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| SerperError::Config(format!("invalid base URL '{base_url}': {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Runs a geo-coded web search and returns the organic results
    /// flattened into one text block (`title: snippet` per line).
    ///
    /// The pipeline consumes this as an opaque free-text signal; an
    /// empty string means the query matched nothing.
    ///
    /// # Errors
    ///
    /// - [`SerperError::UnexpectedStatus`] on a non-2xx response.
    /// - [`SerperError::Http`] on network failure.
    /// - [`SerperError::Deserialize`] if the body is not the expected shape.
    pub async fn web_search(&self, query: &str, geo_code: &str) -> Result<String, SerperError> {
        let body = SearchBody {
            q: query,
            gl: geo_code,
        };
        let response: SearchResponse = self.post_json("search", &body).await?;

        let text = response
            .organic
            .iter()
            .map(|r| format!("{}: {}", r.title, r.snippet))
            .collect::<Vec<_>>()
            .join("\n");
        tracing::debug!(query, geo_code, results = response.organic.len(), "web search complete");
        Ok(text)
    }

    /// Runs a shopping search, normalizing the geo code per
    /// [`normalize_shopping_geo`], and returns up to `num` listings.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`SerperClient::web_search`].
    pub async fn shopping_search(
        &self,
        query: &str,
        geo_code: &str,
        num: u32,
    ) -> Result<Vec<ShoppingItem>, SerperError> {
        let body = ShoppingBody {
            q: query,
            gl: normalize_shopping_geo(geo_code),
            num,
        };
        let response: ShoppingResponse = self.post_json("shopping", &body).await?;
        tracing::debug!(query, geo_code, items = response.shopping.len(), "shopping search complete");
        Ok(response.shopping)
    }

    /// POSTs a JSON body to `{base}/{endpoint}` with the API key header
    /// and decodes the response.
    async fn post_json<B, T>(&self, endpoint: &str, body: &B) -> Result<T, SerperError>
    where
        B: Serialize,
        T: serde::de::DeserializeOwned,
    {
        let url = self
            .base_url
            .join(endpoint)
            .map_err(|e| SerperError::Config(format!("invalid endpoint '{endpoint}': {e}")))?;

        let response = self
            .client
            .post(url)
            .header("X-API-KEY", &self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SerperError::UnexpectedStatus {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
            });
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| SerperError::Deserialize {
            context: format!("Serper /{endpoint} response"),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uk_maps_to_gb_for_shopping() {
        assert_eq!(normalize_shopping_geo("uk"), "gb");
    }

    #[test]
    fn other_codes_pass_through() {
        assert_eq!(normalize_shopping_geo("in"), "in");
        assert_eq!(normalize_shopping_geo("gb"), "gb");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = SerperClient::with_base_url("k", 30, "pvi-test/0.1", "not a url");
        assert!(matches!(result, Err(SerperError::Config(_))));
    }
}
