//! Verdict synthesizer: combines every signal plus the authoritative
//! financial numbers into the final scored verdict.
//!
//! Narrative scoring is delegated to a text-generation call constrained
//! to a fixed JSON schema; the hard numbers and the weighted rubric ride
//! along in the prompt so the generated scores stay consistent with the
//! numeric truth. After decoding, the generated financials are
//! overwritten wholesale and the confidence score is set
//! deterministically — neither is ever trusted from the generation.

use pvi_core::{
    CountryProfile, FinancialBreakdown, PriceReport, PriceSource, Signal, TaxInfo, Verdict,
};
use pvi_textgen::extract::extract_json;

use crate::traits::Generator;

const SCORING_TEMPERATURE: f32 = 0.5;

/// Confidence when the price report rests on real listings.
const BASE_CONFIDENCE: i64 = 70;
/// Confidence when the price report is the synthetic midpoint estimate.
const ESTIMATE_CONFIDENCE: i64 = 55;
/// Deduction per independent signal that failed to arrive.
const MISSING_SIGNAL_PENALTY: i64 = 5;

/// Longest excerpt of a free-text signal forwarded into the prompt.
const SIGNAL_EXCERPT_CHARS: usize = 600;

/// Deterministic trust indicator: 55 when the price data is synthetic,
/// 70 otherwise, minus 5 per missing independent signal. Never
/// generated.
#[must_use]
pub fn confidence_score(source: PriceSource, missing_signals: usize) -> i64 {
    let base = if source.is_estimate() {
        ESTIMATE_CONFIDENCE
    } else {
        BASE_CONFIDENCE
    };
    #[allow(clippy::cast_possible_wrap)]
    let penalty = MISSING_SIGNAL_PENALTY * missing_signals as i64;
    (base - penalty).max(0)
}

/// Synthesizes the verdict for one request.
///
/// Never raises: any failure to obtain or decode the generated
/// structure yields [`Verdict::empty`] with the failure detail in the
/// recommendation field.
#[allow(clippy::too_many_arguments)]
pub async fn synthesize_verdict<G: Generator>(
    generator: &G,
    product: &str,
    profile: &CountryProfile,
    demand: &Signal<String>,
    price_report: &PriceReport,
    sourcing: &Signal<String>,
    tax: &TaxInfo,
    financials: &FinancialBreakdown,
) -> Verdict {
    let missing = usize::from(demand.is_failed()) + usize::from(sourcing.is_failed());
    let confidence = confidence_score(price_report.source, missing);

    let prompt = scoring_prompt(
        product,
        profile,
        demand,
        price_report,
        sourcing,
        tax,
        financials,
        confidence,
    );

    let text = match generator.generate(&prompt, SCORING_TEMPERATURE).await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(product, error = %e, "verdict generation failed");
            return Verdict::empty(&format!("verdict generation failed: {e}"));
        }
    };

    match extract_json::<Verdict>(&text) {
        Ok(mut verdict) => {
            // The calculator's numbers are authoritative; whatever the
            // generation produced for financials is discarded.
            verdict.financials = financials.clone();
            verdict.confidence_score = confidence;
            verdict
        }
        Err(e) => {
            tracing::warn!(product, error = %e, "verdict response was not decodable");
            Verdict::empty(&format!("verdict response was not decodable: {e}"))
        }
    }
}

/// Regional context line injected into the scoring prompt.
fn regional_context(profile: &CountryProfile) -> &'static str {
    match profile.geo_code {
        "uk" => "MARKET CONTEXT: UNITED KINGDOM (High VAT, Expensive Ads, Mature Tech Adoption)",
        "in" => "MARKET CONTEXT: INDIA (Price Sensitive, High Volume Needed, Emerging Tech)",
        _ => "MARKET CONTEXT: Global Standard",
    }
}

/// First `SIGNAL_EXCERPT_CHARS` of a signal, or a placeholder when the
/// collector failed.
fn signal_excerpt(signal: &Signal<String>) -> &str {
    match signal.value() {
        Some(text) => {
            let mut end = text.len().min(SIGNAL_EXCERPT_CHARS);
            while !text.is_char_boundary(end) {
                end -= 1;
            }
            &text[..end]
        }
        None => "(signal unavailable)",
    }
}

#[allow(clippy::too_many_arguments)]
fn scoring_prompt(
    product: &str,
    profile: &CountryProfile,
    demand: &Signal<String>,
    price_report: &PriceReport,
    sourcing: &Signal<String>,
    tax: &TaxInfo,
    financials: &FinancialBreakdown,
    confidence: i64,
) -> String {
    let currency = profile.currency_symbol;
    let tax_pct = (tax.rate * 100.0).round();
    format!(
        r#"You are a Strategic Market Intelligence Engine.

TARGET PRODUCT: "{product}"
TARGET MARKET: {country}
{regional_context}

REAL DATA STREAMS:
- Detected Price: {currency}{avg_price:.0} (Source: {source})
- Search Trends: {demand}
- Supply Chain: {sourcing}
- Indirect Tax: {tax_pct}% ({tax_reason})

AUTHORITATIVE FINANCIALS (already computed; describe them, never change them):
- Sell price {currency}{sell}, COGS {currency}{cogs}, marketing {currency}{marketing}, logistics {currency}{logistics}, tax {currency}{tax_amount}, net profit {currency}{net_profit}, net margin {net_margin}%.

MISSION: Generate a highly specific strategic analysis for "{product}".

SCORING RUBRIC (weighted multi-factor index, each pillar scored 1-10):
- demand (30%): search volume, growth, social momentum
- competition (25%): listing density, price spread, incumbent dominance
- economics (25%): margins, average order value, ad costs
- ecosystem (20%): retail trust, adoption barriers, platform maturity

RULES:
1. Detect the product category first (Electronics, Fashion, Home, Consumable) and keep every judgement specific to it.
2. Compare against realistic adjacent categories, not generic platitudes.
3. Keep the thesis to two sentences.

OUTPUT JSON ONLY, exactly this shape:
{{
  "final_score": 7.5,
  "confidence_score": {confidence},
  "verdict_tag": "ENTER CAUTIOUSLY",
  "strategic_thesis": "...",
  "lifecycle_stage": "Growth",
  "volatility": "Medium",
  "financials": {{}},
  "market_entry": {{ "strategy": "D2C/Retail", "reason": "..." }},
  "breakdown": {{
    "demand": {{ "total": 8, "reason": "...", "signals": ["Interest: Rising", "Vol: 40k/mo", "Adoption: Early"] }},
    "competition": {{ "total": 6, "reason": "...", "signals": ["Saturation: High", "Rivals: Fragmented", "Differentiation: Hard"] }},
    "economics": {{ "total": 7, "reason": "...", "signals": ["Gross: 35%", "Net: {net_margin}%", "Ads: Expensive"] }},
    "ecosystem": {{ "total": 6, "reason": "...", "signals": ["Fit: Natural", "Trust: Required", "Barrier: None"] }}
  }},
  "pros": [ {{ "title": "...", "specs": ["...", "..."] }} ],
  "cons": [ {{ "title": "...", "specs": ["...", "..."] }} ],
  "recommendation": "..."
}}"#,
        country = profile.full_name,
        regional_context = regional_context(profile),
        avg_price = price_report.average_price,
        source = price_report.source,
        demand = signal_excerpt(demand),
        sourcing = signal_excerpt(sourcing),
        tax_reason = tax.reason,
        sell = financials.sell_price,
        cogs = financials.cogs,
        marketing = financials.marketing_cpa,
        logistics = financials.logistics_cost,
        tax_amount = financials.tax_rate,
        net_profit = financials.net_profit,
        net_margin = financials.net_margin_pct,
    )
}

#[cfg(test)]
mod tests {
    use pvi_core::{Country, ScrapedProduct};
    use pvi_textgen::TextGenError;

    use super::*;

    struct FixedGenerator(String);

    impl Generator for FixedGenerator {
        async fn generate(&self, _prompt: &str, _t: f32) -> Result<String, TextGenError> {
            Ok(self.0.clone())
        }
    }

    struct FailingGenerator;

    impl Generator for FailingGenerator {
        async fn generate(&self, _prompt: &str, _t: f32) -> Result<String, TextGenError> {
            Err(TextGenError::ApiError("service down".to_string()))
        }
    }

    /// Captures the prompt for content assertions.
    struct CapturingGenerator(std::sync::Mutex<String>);

    impl Generator for CapturingGenerator {
        async fn generate(&self, prompt: &str, _t: f32) -> Result<String, TextGenError> {
            *self.0.lock().unwrap() = prompt.to_string();
            Err(TextGenError::ApiError("capture only".to_string()))
        }
    }

    fn report(source: PriceSource) -> PriceReport {
        PriceReport {
            source,
            average_price: 13500.0,
            products: vec![ScrapedProduct {
                title: "Ring".to_string(),
                price: 13500.0,
            }],
        }
    }

    fn tax() -> TaxInfo {
        TaxInfo {
            rate: 0.18,
            reason: "standard goods".to_string(),
        }
    }

    fn generated_verdict_json() -> String {
        r#"{
            "final_score": 7.5,
            "confidence_score": 99,
            "verdict_tag": "ENTER CAUTIOUSLY",
            "strategic_thesis": "Good niche.",
            "lifecycle_stage": "Growth",
            "volatility": "Medium",
            "financials": { "sell_price": 1, "cogs": 2, "net_profit": 99999 },
            "market_entry": { "strategy": "D2C", "reason": "low trust barrier" },
            "breakdown": {
                "demand": { "total": 8, "reason": "rising", "signals": ["Interest: Rising"] },
                "competition": { "total": 6, "reason": "crowded", "signals": [] },
                "economics": { "total": 7, "reason": "workable", "signals": [] },
                "ecosystem": { "total": 6, "reason": "ready", "signals": [] }
            },
            "pros": ["cheap to ship"],
            "cons": [ { "title": "Category Risk", "specs": ["fads fade"] } ],
            "recommendation": "Pilot with a small batch."
        }"#
        .to_string()
    }

    #[test]
    fn confidence_is_55_for_estimate_source() {
        assert_eq!(confidence_score(PriceSource::MarketEstimate, 0), 55);
    }

    #[test]
    fn confidence_is_70_for_real_sources() {
        assert_eq!(confidence_score(PriceSource::Marketplace, 0), 70);
        assert_eq!(confidence_score(PriceSource::ShoppingSearch, 0), 70);
    }

    #[test]
    fn confidence_drops_per_missing_signal() {
        assert_eq!(confidence_score(PriceSource::Marketplace, 1), 65);
        assert_eq!(confidence_score(PriceSource::Marketplace, 2), 60);
        assert_eq!(confidence_score(PriceSource::MarketEstimate, 2), 45);
    }

    #[tokio::test]
    async fn generated_financials_are_overwritten_with_computed_values() {
        let generator = FixedGenerator(generated_verdict_json());
        let financials = crate::finance::compute_breakdown(13500.0, 0.18);

        let verdict = synthesize_verdict(
            &generator,
            "Smart Ring",
            &Country::India.profile(),
            &Signal::Success("demand text".to_string()),
            &report(PriceSource::Marketplace),
            &Signal::Success("sourcing text".to_string()),
            &tax(),
            &financials,
        )
        .await;

        // The generation claimed sell_price 1 and net_profit 99999;
        // the calculator's values must win.
        assert_eq!(verdict.financials, financials);
        assert_eq!(verdict.financials.net_profit, 945);
        // Generated confidence 99 is replaced deterministically.
        assert_eq!(verdict.confidence_score, 70);
        assert_eq!(verdict.final_score, 7.5);
        assert_eq!(verdict.verdict_tag, "ENTER CAUTIOUSLY");
        assert_eq!(verdict.breakdown.len(), 4);
    }

    #[tokio::test]
    async fn estimate_source_yields_55_confidence() {
        let generator = FixedGenerator(generated_verdict_json());
        let financials = crate::finance::compute_breakdown(19000.0, 0.18);

        let verdict = synthesize_verdict(
            &generator,
            "Smart Ring",
            &Country::India.profile(),
            &Signal::Success("demand".to_string()),
            &report(PriceSource::MarketEstimate),
            &Signal::Success("sourcing".to_string()),
            &tax(),
            &financials,
        )
        .await;

        assert_eq!(verdict.confidence_score, 55);
    }

    #[tokio::test]
    async fn failed_signals_reduce_confidence() {
        let generator = FixedGenerator(generated_verdict_json());
        let financials = crate::finance::compute_breakdown(13500.0, 0.18);

        let verdict = synthesize_verdict(
            &generator,
            "Smart Ring",
            &Country::India.profile(),
            &Signal::Failed("timed out".to_string()),
            &report(PriceSource::Marketplace),
            &Signal::Failed("no results".to_string()),
            &tax(),
            &financials,
        )
        .await;

        assert_eq!(verdict.confidence_score, 60);
    }

    #[tokio::test]
    async fn undecodable_generation_yields_error_verdict() {
        let generator = FixedGenerator("Viability is strong, trust me.".to_string());
        let financials = crate::finance::compute_breakdown(13500.0, 0.18);

        let verdict = synthesize_verdict(
            &generator,
            "Smart Ring",
            &Country::India.profile(),
            &Signal::Success("demand".to_string()),
            &report(PriceSource::Marketplace),
            &Signal::Success("sourcing".to_string()),
            &tax(),
            &financials,
        )
        .await;

        assert!(verdict.is_error());
        assert!(
            verdict.recommendation.contains("not decodable"),
            "recommendation: {}",
            verdict.recommendation
        );
    }

    #[tokio::test]
    async fn generation_failure_yields_error_verdict() {
        let financials = crate::finance::compute_breakdown(13500.0, 0.18);

        let verdict = synthesize_verdict(
            &FailingGenerator,
            "Smart Ring",
            &Country::India.profile(),
            &Signal::Success("demand".to_string()),
            &report(PriceSource::Marketplace),
            &Signal::Success("sourcing".to_string()),
            &tax(),
            &financials,
        )
        .await;

        assert!(verdict.is_error());
        assert!(
            verdict.recommendation.contains("generation failed"),
            "recommendation: {}",
            verdict.recommendation
        );
    }

    #[tokio::test]
    async fn prompt_carries_hard_numbers_and_regional_context() {
        let generator = CapturingGenerator(std::sync::Mutex::new(String::new()));
        let financials = crate::finance::compute_breakdown(13500.0, 0.18);

        let _ = synthesize_verdict(
            &generator,
            "Smart Ring",
            &Country::India.profile(),
            &Signal::Success("demand".to_string()),
            &report(PriceSource::Marketplace),
            &Signal::Success("sourcing".to_string()),
            &tax(),
            &financials,
        )
        .await;

        let prompt = generator.0.lock().unwrap().clone();
        assert!(prompt.contains("Price Sensitive, High Volume Needed"));
        assert!(prompt.contains("net profit ₹945"));
        assert!(prompt.contains("demand (30%)"));
        assert!(prompt.contains("ecosystem (20%)"));
        assert!(prompt.contains("Indirect Tax: 18%"));
    }

    #[tokio::test]
    async fn long_signals_are_excerpted() {
        let generator = CapturingGenerator(std::sync::Mutex::new(String::new()));
        let financials = crate::finance::compute_breakdown(13500.0, 0.18);
        let long_demand = "d".repeat(5000);

        let _ = synthesize_verdict(
            &generator,
            "Smart Ring",
            &Country::India.profile(),
            &Signal::Success(long_demand),
            &report(PriceSource::Marketplace),
            &Signal::Success("sourcing".to_string()),
            &tax(),
            &financials,
        )
        .await;

        let prompt = generator.0.lock().unwrap().clone();
        assert!(!prompt.contains(&"d".repeat(601)), "signal must be truncated to 600 chars");
        assert!(prompt.contains(&"d".repeat(600)));
    }

    #[tokio::test]
    async fn failed_signal_renders_placeholder_in_prompt() {
        let generator = CapturingGenerator(std::sync::Mutex::new(String::new()));
        let financials = crate::finance::compute_breakdown(13500.0, 0.18);

        let _ = synthesize_verdict(
            &generator,
            "Smart Ring",
            &Country::UnitedKingdom.profile(),
            &Signal::Failed("down".to_string()),
            &report(PriceSource::Marketplace),
            &Signal::Failed("down".to_string()),
            &tax(),
            &financials,
        )
        .await;

        let prompt = generator.0.lock().unwrap().clone();
        assert!(prompt.contains("(signal unavailable)"));
        assert!(prompt.contains("High VAT, Expensive Ads"));
    }
}
