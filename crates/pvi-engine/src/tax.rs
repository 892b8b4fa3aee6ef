//! Indirect-tax resolver: classifies the product against the market's
//! rate tables, falling back to a hardcoded baseline.

use serde::Deserialize;

use pvi_core::{CountryProfile, Signal, TaxInfo};
use pvi_textgen::extract::extract_json;

use crate::traits::Generator;

const CLASSIFICATION_TEMPERATURE: f32 = 0.0;

/// Baseline rates per market, used only as the final fallback: India's
/// standard GST slab and the UK's standard VAT rate.
const INDIA_BASELINE: f64 = 0.18;
const UK_BASELINE: f64 = 0.20;

/// The baseline indirect-tax rate for a market.
#[must_use]
pub fn baseline_rate(profile: &CountryProfile) -> f64 {
    match profile.geo_code {
        "in" => INDIA_BASELINE,
        _ => UK_BASELINE,
    }
}

#[derive(Debug, Deserialize)]
struct TaxResponse {
    rate: f64,
    #[serde(default)]
    reason: String,
}

/// Resolves the indirect-tax rate for one product/market pair.
///
/// The returned rate is always normalized to a fraction in `[0, 1]` —
/// normalization happens here, once; callers must never re-normalize.
/// Returns `Degraded` with the baseline on any classification failure;
/// never fails outright.
pub async fn resolve_tax<G: Generator>(
    generator: &G,
    product: &str,
    profile: &CountryProfile,
) -> Signal<TaxInfo> {
    let prompt = tax_prompt(product, profile);

    let text = match generator.generate(&prompt, CLASSIFICATION_TEMPERATURE).await {
        Ok(text) => text,
        Err(e) => return fall_back(profile, format!("tax classification call failed: {e}")),
    };

    match extract_json::<TaxResponse>(&text) {
        Ok(r) => {
            let rate = TaxInfo::normalize_rate(r.rate);
            tracing::debug!(product, rate, "classified indirect-tax rate");
            Signal::Success(TaxInfo {
                rate,
                reason: r.reason,
            })
        }
        Err(e) => fall_back(profile, format!("unparsable tax classification: {e}")),
    }
}

/// The fallback value the resolver degrades to. Also used by the
/// pipeline when the resolver itself is timed out.
pub(crate) fn baseline_info(profile: &CountryProfile) -> TaxInfo {
    TaxInfo {
        rate: baseline_rate(profile),
        reason: "Standard rate (classification unavailable)".to_string(),
    }
}

fn fall_back(profile: &CountryProfile, reason: String) -> Signal<TaxInfo> {
    tracing::warn!(market = profile.full_name, reason, "tax resolver fell back to baseline rate");
    Signal::Degraded(baseline_info(profile), reason)
}

fn tax_prompt(product: &str, profile: &CountryProfile) -> String {
    format!(
        r#"You are an indirect-tax classification engine.

Product: "{product}"
Market: {country}

RATE TABLES:
- India GST slabs: 0.00 unprocessed essentials; 0.05 basic necessities; 0.12 processed foods and some appliances; 0.18 standard goods and electronics; 0.28 luxury and sin goods.
- United Kingdom VAT: 0.00 books, children's clothing, most food; 0.05 home energy and sanitary products; 0.20 standard rate.

TASK: Classify the product into the correct category for {country} and return the applicable rate as a fraction.

OUTPUT JSON ONLY:
{{"rate": 0.18, "reason": "one short sentence naming the category"}}"#,
        country = profile.full_name,
    )
}
