//! The synthesized verdict and its financial sub-structure.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::market::PriceReport;

/// Deterministic cost and margin breakdown for one unit at the average
/// market price.
///
/// All monetary fields are whole currency units produced by truncation;
/// `tax_rate` is the tax *amount*, not a percentage (the field name
/// follows the presentation contract). Computed only by the financial
/// calculator — the synthesizer overwrites any generated financials
/// with these values wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancialBreakdown {
    pub sell_price: i64,
    pub cogs: i64,
    pub marketing_cpa: i64,
    pub logistics_cost: i64,
    pub tax_rate: i64,
    pub net_margin_pct: i64,
    pub net_profit: i64,
    pub note: String,
}

/// One scoring pillar: demand, competition, economics, or ecosystem.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PillarScore {
    /// 0 to 10.
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub reason: String,
    /// Up to three short signal strings, e.g. `"Saturation: High"`.
    #[serde(default)]
    pub signals: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketEntry {
    #[serde(default)]
    pub strategy: String,
    #[serde(default)]
    pub reason: String,
}

/// A pro or con entry. The generation contract allows either a bare
/// string or a titled group of bullet points, so both shapes decode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdvicePoint {
    Detailed { title: String, specs: Vec<String> },
    Text(String),
}

/// The final structured scored output combining all signals.
///
/// Created once per request by the verdict synthesizer and immutable
/// thereafter; the presentation layer is its only consumer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    /// 0 to 10.
    #[serde(default)]
    pub final_score: f64,
    /// 0 to 100; deterministic, never generated.
    #[serde(default)]
    pub confidence_score: i64,
    #[serde(default)]
    pub verdict_tag: String,
    #[serde(default)]
    pub strategic_thesis: String,
    #[serde(default)]
    pub lifecycle_stage: String,
    #[serde(default)]
    pub volatility: String,
    #[serde(default)]
    pub financials: FinancialBreakdown,
    #[serde(default)]
    pub market_entry: MarketEntry,
    /// Pillar name → score. Keys: `demand`, `competition`, `economics`,
    /// `ecosystem`.
    #[serde(default)]
    pub breakdown: BTreeMap<String, PillarScore>,
    #[serde(default)]
    pub pros: Vec<AdvicePoint>,
    #[serde(default)]
    pub cons: Vec<AdvicePoint>,
    #[serde(default)]
    pub recommendation: String,
}

impl Verdict {
    /// The documented error state: everything zero or empty, tagged
    /// `ERROR`, with the failure detail in `recommendation` so the
    /// presentation layer can render a diagnosable failure instead of
    /// crashing.
    #[must_use]
    pub fn empty(error_msg: &str) -> Self {
        Self {
            final_score: 0.0,
            confidence_score: 0,
            verdict_tag: "ERROR".to_string(),
            strategic_thesis: "Analysis Failed".to_string(),
            lifecycle_stage: "Unknown".to_string(),
            volatility: "Unknown".to_string(),
            financials: FinancialBreakdown::default(),
            market_entry: MarketEntry::default(),
            breakdown: BTreeMap::new(),
            pros: Vec::new(),
            cons: Vec::new(),
            recommendation: error_msg.to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.verdict_tag == "ERROR"
    }
}

/// Everything the presentation boundary consumes for one request: the
/// verdict plus the price report whose product list the dashboard
/// renders alongside it.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutcome {
    pub request_id: Uuid,
    pub product: String,
    pub country: String,
    pub verdict: Verdict,
    pub price_report: PriceReport,
    pub completed_at: DateTime<Utc>,
}
