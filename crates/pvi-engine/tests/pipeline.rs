//! End-to-end pipeline tests with scripted collaborators.
//!
//! Mirrors the canonical Smart Ring / India scenario: calibrated
//! guardrail {3000, 35000}, five marketplace listings with two
//! outliers, tax slab 18%, and a scripted scoring response.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use pvi_apify::{ApifyError, MarketplaceListing};
use pvi_core::{Country, PriceSource};
use pvi_engine::traits::{Generator, MarketplaceSearch, ShoppingSearch, WebSearch};
use pvi_engine::{run_analysis, PipelineClients};
use pvi_serper::{SerperError, ShoppingItem};
use pvi_textgen::TextGenError;

const TIMEOUT: Duration = Duration::from_secs(5);

/// Routes responses by recognizing which component's prompt arrived.
struct ScriptedGenerator {
    fail_scoring: bool,
}

impl Generator for ScriptedGenerator {
    async fn generate(&self, prompt: &str, _t: f32) -> Result<String, TextGenError> {
        if prompt.contains("market calibration engine") {
            return Ok(r#"{"min_price": 3000, "max_price": 35000}"#.to_string());
        }
        if prompt.contains("indirect-tax classification engine") {
            return Ok(r#"{"rate": 18, "reason": "standard electronics slab"}"#.to_string());
        }
        if self.fail_scoring {
            return Err(TextGenError::ApiError("scoring model down".to_string()));
        }
        Ok(r#"{
            "final_score": 7.5,
            "confidence_score": 1,
            "verdict_tag": "ENTER CAUTIOUSLY",
            "strategic_thesis": "Wearables are growing; margins are tight.",
            "lifecycle_stage": "Growth",
            "volatility": "Medium",
            "financials": {},
            "market_entry": { "strategy": "D2C", "reason": "direct trust building" },
            "breakdown": {
                "demand": { "total": 8, "reason": "strong search growth", "signals": ["Interest: Rising"] },
                "competition": { "total": 6, "reason": "fragmented field", "signals": [] },
                "economics": { "total": 7, "reason": "workable margins", "signals": [] },
                "ecosystem": { "total": 6, "reason": "apps mature", "signals": [] }
            },
            "pros": ["health tracking is sticky"],
            "cons": [ { "title": "Category Risk", "specs": ["sizing returns"] } ],
            "recommendation": "Pilot with one SKU."
        }"#
        .to_string())
    }
}

struct ScriptedWeb {
    text: &'static str,
    delay: Option<Duration>,
}

impl WebSearch for ScriptedWeb {
    async fn web_search(&self, _query: &str, _geo: &str) -> Result<String, SerperError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.text.to_string())
    }
}

struct ScriptedShopping {
    calls: AtomicU32,
}

impl ShoppingSearch for ScriptedShopping {
    async fn shopping_search(
        &self,
        _query: &str,
        _geo: &str,
        _num: u32,
    ) -> Result<Vec<ShoppingItem>, SerperError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Vec::new())
    }
}

struct ScriptedMarketplace {
    prices: Vec<f64>,
}

impl MarketplaceSearch for ScriptedMarketplace {
    async fn search_listings(
        &self,
        _term: &str,
        _region: &str,
        _max: u32,
    ) -> Result<Vec<MarketplaceListing>, ApifyError> {
        Ok(self
            .prices
            .iter()
            .enumerate()
            .map(|(i, price)| MarketplaceListing {
                title: format!("Listing {i}"),
                price: *price,
            })
            .collect())
    }
}

fn smart_ring_clients(
    fail_scoring: bool,
) -> PipelineClients<ScriptedGenerator, ScriptedWeb, ScriptedShopping, ScriptedMarketplace> {
    PipelineClients {
        generator: ScriptedGenerator { fail_scoring },
        web_search: ScriptedWeb {
            text: "smart ring searches keep climbing",
            delay: None,
        },
        shopping: ScriptedShopping {
            calls: AtomicU32::new(0),
        },
        marketplace: ScriptedMarketplace {
            prices: vec![4000.0, 4500.0, 32000.0, 3_999_999.0, 200.0],
        },
    }
}

#[tokio::test]
async fn smart_ring_india_end_to_end() {
    let clients = smart_ring_clients(false);
    let outcome = run_analysis(&clients, "Smart Ring", Country::India, TIMEOUT).await;

    // Junk filter keeps [4000, 4500, 32000]; 200 < 2400 and
    // 3999999 > 52500 are rejected.
    let prices: Vec<f64> = outcome.price_report.products.iter().map(|p| p.price).collect();
    assert_eq!(prices, vec![4000.0, 4500.0, 32000.0]);
    assert_eq!(outcome.price_report.average_price, 13500.0);
    assert_eq!(outcome.price_report.source, PriceSource::Marketplace);

    // Tier A had five raw listings, so tier B must not have run.
    assert_eq!(clients.shopping.calls.load(Ordering::SeqCst), 0);

    // Financials from the calculator, not the generation.
    let fin = &outcome.verdict.financials;
    assert_eq!(fin.sell_price, 13500);
    assert_eq!(fin.cogs, 4725);
    assert_eq!(fin.marketing_cpa, 3375);
    assert_eq!(fin.logistics_cost, 2025);
    assert_eq!(fin.tax_rate, 2430);
    assert_eq!(fin.net_profit, 945);
    assert_eq!(fin.net_margin_pct, 7);

    // Real price data and all signals present: confidence 70, not the
    // generated 1.
    assert_eq!(outcome.verdict.confidence_score, 70);
    assert_eq!(outcome.verdict.final_score, 7.5);
    assert_eq!(outcome.country, "India");
    assert_eq!(outcome.product, "Smart Ring");
}

#[tokio::test]
async fn empty_marketplace_falls_through_to_estimate_confidence() {
    let clients = PipelineClients {
        generator: ScriptedGenerator { fail_scoring: false },
        web_search: ScriptedWeb {
            text: "still some interest",
            delay: None,
        },
        shopping: ScriptedShopping {
            calls: AtomicU32::new(0),
        },
        marketplace: ScriptedMarketplace { prices: vec![] },
    };

    let outcome = run_analysis(&clients, "Smart Ring", Country::India, TIMEOUT).await;

    // No listings anywhere: one synthetic midpoint product.
    assert_eq!(outcome.price_report.source, PriceSource::MarketEstimate);
    assert_eq!(outcome.price_report.products.len(), 1);
    assert_eq!(outcome.price_report.average_price, 19000.0);
    assert_eq!(clients.shopping.calls.load(Ordering::SeqCst), 1);

    // Fallback-tier source caps confidence at 55.
    assert_eq!(outcome.verdict.confidence_score, 55);
    // Financials follow the synthetic average.
    assert_eq!(outcome.verdict.financials.sell_price, 19000);
}

#[tokio::test]
async fn scoring_failure_yields_error_verdict_with_real_price_data() {
    let clients = smart_ring_clients(true);
    let outcome = run_analysis(&clients, "Smart Ring", Country::India, TIMEOUT).await;

    assert!(outcome.verdict.is_error());
    assert!(
        outcome.verdict.recommendation.contains("scoring model down"),
        "recommendation: {}",
        outcome.verdict.recommendation
    );
    // The price pipeline still did its work.
    assert_eq!(outcome.price_report.average_price, 13500.0);
}

#[tokio::test]
async fn slow_signal_collectors_time_out_and_reduce_confidence() {
    let clients = PipelineClients {
        generator: ScriptedGenerator { fail_scoring: false },
        web_search: ScriptedWeb {
            text: "never arrives in time",
            delay: Some(Duration::from_secs(60)),
        },
        shopping: ScriptedShopping {
            calls: AtomicU32::new(0),
        },
        marketplace: ScriptedMarketplace {
            prices: vec![4000.0, 4500.0, 32000.0],
        },
    };

    let outcome = run_analysis(
        &clients,
        "Smart Ring",
        Country::India,
        Duration::from_millis(50),
    )
    .await;

    // Demand and sourcing both timed out: 70 - 2 × 5.
    assert_eq!(outcome.verdict.confidence_score, 60);
    // The request still completed with real price data.
    assert_eq!(outcome.price_report.average_price, 13500.0);
    assert!(!outcome.verdict.is_error());
}
