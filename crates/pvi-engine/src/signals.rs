//! Demand and sourcing collectors: free-text market signals from the
//! web search service.
//!
//! Both are independent of the price pipeline and of each other, and
//! both convert every failure into `Signal::Failed` — a missing signal
//! degrades confidence downstream but never aborts the request.

use chrono::{Datelike, Utc};

use pvi_core::{CountryProfile, Signal};

use crate::traits::WebSearch;

/// Collects demand/market-trend text for the product.
pub async fn collect_demand<W: WebSearch>(
    search: &W,
    product: &str,
    profile: &CountryProfile,
) -> Signal<String> {
    let query = demand_query(product, profile);
    run_text_search(search, &query, profile, "demand").await
}

/// Collects wholesale-cost text for the product from the market's
/// dominant sourcing hub.
pub async fn collect_sourcing<W: WebSearch>(
    search: &W,
    product: &str,
    profile: &CountryProfile,
) -> Signal<String> {
    let query = sourcing_query(product, profile);
    run_text_search(search, &query, profile, "sourcing").await
}

fn demand_query(product: &str, profile: &CountryProfile) -> String {
    let year = Utc::now().year();
    format!(
        "Market growth trends, demand, and consumer interest for {product} in {} {} {}",
        profile.full_name,
        year,
        year + 1
    )
}

fn sourcing_query(product: &str, profile: &CountryProfile) -> String {
    let hub = if profile.geo_code == "in" {
        "IndiaMart"
    } else {
        "Alibaba"
    };
    format!("Wholesale bulk manufacturing cost per unit for {product} on {hub}")
}

async fn run_text_search<W: WebSearch>(
    search: &W,
    query: &str,
    profile: &CountryProfile,
    kind: &'static str,
) -> Signal<String> {
    match search.web_search(query, profile.geo_code).await {
        Ok(text) if text.trim().is_empty() => {
            tracing::warn!(kind, query, "search returned no results");
            Signal::Failed(format!("{kind} search returned no results"))
        }
        Ok(text) => {
            tracing::debug!(kind, chars = text.len(), "collected signal text");
            Signal::Success(text)
        }
        Err(e) => {
            tracing::warn!(kind, error = %e, "signal search failed");
            Signal::Failed(format!("{kind} search failed: {e}"))
        }
    }
}
