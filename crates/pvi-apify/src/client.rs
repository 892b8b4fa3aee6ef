//! HTTP client for running the marketplace-scraper actor synchronously.
//!
//! Uses the platform's `run-sync-get-dataset-items` endpoint: one POST
//! starts the actor and blocks until its dataset is ready, so no run
//! polling is needed.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Serialize;

use crate::error::ApifyError;
use crate::types::{parse_item, MarketplaceListing};

const DEFAULT_BASE_URL: &str = "https://api.apify.com";

/// Maps a search geolocation code to the marketplace actor's region
/// code: the actor expects ISO country codes (`GB`, not `uk`).
#[must_use]
pub fn marketplace_region(geo_code: &str) -> &'static str {
    match geo_code.to_lowercase().as_str() {
        "uk" | "gb" => "GB",
        _ => "IN",
    }
}

/// Client for one marketplace-scraper actor.
///
/// Use [`ApifyClient::new`] for production or
/// [`ApifyClient::with_base_url`] to point at a mock server in tests.
pub struct ApifyClient {
    client: Client,
    token: String,
    actor: String,
    base_url: Url,
}

#[derive(Serialize)]
struct ActorInput<'a> {
    #[serde(rename = "searchQueries")]
    search_queries: [&'a str; 1],
    #[serde(rename = "countryCode")]
    country_code: &'a str,
    #[serde(rename = "maxItems")]
    max_items: u32,
}

impl ApifyClient {
    /// Creates a new client pointed at the production Apify platform.
    ///
    /// # Errors
    ///
    /// Returns [`ApifyError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        token: &str,
        actor: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ApifyError> {
        Self::with_base_url(token, actor, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ApifyError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ApifyError::Config`] if `base_url` is
    /// not a valid URL.
    pub fn with_base_url(
        token: &str,
        actor: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, ApifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| ApifyError::Config(format!("invalid base URL '{base_url}': {e}")))?;

        Ok(Self {
            client,
            token: token.to_owned(),
            actor: actor.to_owned(),
            base_url,
        })
    }

    /// Runs the actor for one search term and returns the listings that
    /// carry a usable positive price.
    ///
    /// Items that match neither price shape are skipped individually —
    /// a partially malformed dataset still yields its good rows.
    ///
    /// # Errors
    ///
    /// - [`ApifyError::UnexpectedStatus`] on a non-2xx response.
    /// - [`ApifyError::Http`] on network failure.
    /// - [`ApifyError::Deserialize`] if the body is not a JSON array.
    pub async fn search_listings(
        &self,
        search_term: &str,
        region_code: &str,
        max_items: u32,
    ) -> Result<Vec<MarketplaceListing>, ApifyError> {
        let url = self.run_sync_url()?;
        let input = ActorInput {
            search_queries: [search_term],
            country_code: region_code,
            max_items,
        };

        let response = self.client.post(url).json(&input).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApifyError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let items: Vec<serde_json::Value> =
            serde_json::from_str(&body).map_err(|e| ApifyError::Deserialize {
                context: format!("dataset items from actor {}", self.actor),
                source: e,
            })?;

        let total = items.len();
        let listings: Vec<MarketplaceListing> =
            items.into_iter().filter_map(parse_item).collect();

        tracing::debug!(
            actor = %self.actor,
            total,
            usable = listings.len(),
            "parsed marketplace dataset"
        );

        Ok(listings)
    }

    fn run_sync_url(&self) -> Result<Url, ApifyError> {
        let path = format!("v2/acts/{}/run-sync-get-dataset-items", self.actor);
        let mut url = self
            .base_url
            .join(&path)
            .map_err(|e| ApifyError::Config(format!("invalid actor path '{path}': {e}")))?;
        url.query_pairs_mut().append_pair("token", &self.token);
        Ok(url)
    }
}
