//! Price discovery with an ordered fallback chain.
//!
//! Tier A queries the country marketplace; tier B supplements with a
//! general shopping search when tier A is thin; a junk filter rejects
//! guardrail outliers; tier C synthesizes a midpoint estimate when
//! nothing real survives. No failure in any tier propagates — a broken
//! source simply contributes zero items.

use pvi_core::{CountryProfile, PriceGuardrail, PriceReport, PriceSource, ScrapedProduct};
use pvi_serper::parse_price_str;

use crate::traits::{MarketplaceSearch, ShoppingSearch};

/// Listing cap for the marketplace actor (tier A).
const MARKETPLACE_MAX_ITEMS: u32 = 10;
/// Result cap for the shopping search fallback (tier B).
const SHOPPING_MAX_RESULTS: u32 = 20;
/// Tier A is sufficient on its own at this many items; below it, tier B
/// supplements.
const TIER_A_SUFFICIENT: usize = 3;
/// Tolerance below the guardrail minimum: moderate discounts pass.
const JUNK_LOW_TOLERANCE: f64 = 0.8;
/// Tolerance above the guardrail maximum: larger premium outliers pass.
/// The asymmetry is deliberate.
const JUNK_HIGH_TOLERANCE: f64 = 1.5;

/// A listing still tagged with the tier that produced it. The tag is
/// internal: it only decides the report's source label after filtering.
#[derive(Debug, Clone)]
struct TaggedListing {
    title: String,
    price: f64,
    tier: PriceSource,
}

/// Collects a price report for one product/market pair.
///
/// Guaranteed to return a report with at least one product and a
/// defined average price, regardless of upstream behavior.
pub async fn collect_price_report<M, S>(
    marketplace: &M,
    shopping: &S,
    product: &str,
    profile: &CountryProfile,
    guardrail: &PriceGuardrail,
) -> PriceReport
where
    M: MarketplaceSearch,
    S: ShoppingSearch,
{
    let mut raw: Vec<TaggedListing> = Vec::new();

    // Tier A: marketplace search in the country-specific region.
    let region = pvi_apify::marketplace_region(profile.geo_code);
    match marketplace
        .search_listings(product, region, MARKETPLACE_MAX_ITEMS)
        .await
    {
        Ok(listings) => {
            tracing::debug!(product, count = listings.len(), "tier A marketplace listings");
            raw.extend(listings.into_iter().map(|l| TaggedListing {
                title: l.title,
                price: l.price,
                tier: PriceSource::Marketplace,
            }));
        }
        Err(e) => {
            tracing::warn!(product, error = %e, "marketplace search failed — continuing without tier A");
        }
    }

    // Tier B: shopping search supplements (never replaces) a thin tier A.
    if raw.len() < TIER_A_SUFFICIENT {
        match shopping
            .shopping_search(product, profile.geo_code, SHOPPING_MAX_RESULTS)
            .await
        {
            Ok(items) => {
                let before = raw.len();
                for item in items {
                    let Some(price) = item
                        .price
                        .as_deref()
                        .and_then(|p| parse_price_str(p, profile.currency_symbol))
                    else {
                        continue;
                    };
                    raw.push(TaggedListing {
                        title: item.title,
                        price,
                        tier: PriceSource::ShoppingSearch,
                    });
                }
                tracing::debug!(product, count = raw.len() - before, "tier B shopping listings");
            }
            Err(e) => {
                tracing::warn!(product, error = %e, "shopping search failed — continuing without tier B");
            }
        }
    }

    let retained = filter_junk(raw, guardrail);
    build_report(retained, guardrail)
}

/// Rejects listings outside `[0.8 × min, 1.5 × max]`. A non-positive
/// minimum is clamped to 1 first so the lower bound stays meaningful.
fn filter_junk(listings: Vec<TaggedListing>, guardrail: &PriceGuardrail) -> Vec<TaggedListing> {
    let min = if guardrail.min_price <= 0.0 {
        1.0
    } else {
        guardrail.min_price
    };
    let low = min * JUNK_LOW_TOLERANCE;
    let high = guardrail.max_price * JUNK_HIGH_TOLERANCE;

    let before = listings.len();
    let retained: Vec<TaggedListing> = listings
        .into_iter()
        .filter(|l| l.price >= low && l.price <= high)
        .collect();

    if retained.len() < before {
        tracing::debug!(
            rejected = before - retained.len(),
            low,
            high,
            "junk filter rejected outlier listings"
        );
    }
    retained
}

/// Aggregates retained listings into a report; synthesizes the tier-C
/// midpoint estimate when nothing survived.
fn build_report(retained: Vec<TaggedListing>, guardrail: &PriceGuardrail) -> PriceReport {
    if retained.is_empty() {
        let estimate = guardrail.midpoint();
        tracing::warn!(estimate, "no listings survived — using market estimate fallback");
        return PriceReport {
            source: PriceSource::MarketEstimate,
            average_price: estimate,
            products: vec![ScrapedProduct {
                title: "Market Average Estimate".to_string(),
                price: estimate,
            }],
        };
    }

    // Tier A wins the label if any of its items survived filtering.
    let source = if retained.iter().any(|l| l.tier == PriceSource::Marketplace) {
        PriceSource::Marketplace
    } else {
        PriceSource::ShoppingSearch
    };

    #[allow(clippy::cast_precision_loss)]
    let count = retained.len() as f64;
    let average_price = retained.iter().map(|l| l.price).sum::<f64>() / count;

    PriceReport {
        source,
        average_price,
        products: retained
            .into_iter()
            .map(|l| ScrapedProduct {
                title: l.title,
                price: l.price,
            })
            .collect(),
    }
}
