//! Guardrail calibrator: derives a plausible unit-price range for the
//! product in the target currency.
//!
//! Leaf component, single attempt, fail-open: any failure to obtain or
//! parse a valid range yields the maximally permissive default so that
//! downstream filtering never rejects everything.

use serde::Deserialize;

use pvi_core::{CountryProfile, PriceGuardrail, Signal};
use pvi_textgen::extract::extract_json;

use crate::traits::Generator;

const CALIBRATION_TEMPERATURE: f32 = 0.0;

#[derive(Debug, Deserialize)]
struct GuardrailResponse {
    min_price: f64,
    max_price: f64,
}

/// Calibrates price guardrails for one product/market pair.
///
/// Returns `Success` with the calibrated range, or `Degraded` with
/// [`PriceGuardrail::permissive_default`] and the reason calibration
/// was unusable. Never fails outright.
pub async fn calibrate_guardrail<G: Generator>(
    generator: &G,
    product: &str,
    profile: &CountryProfile,
) -> Signal<PriceGuardrail> {
    let prompt = calibration_prompt(product, profile);

    let text = match generator.generate(&prompt, CALIBRATION_TEMPERATURE).await {
        Ok(text) => text,
        Err(e) => return fall_open(product, format!("calibration call failed: {e}")),
    };

    match extract_json::<GuardrailResponse>(&text) {
        Ok(r) if r.min_price > 0.0 && r.max_price > r.min_price => {
            tracing::debug!(
                product,
                min = r.min_price,
                max = r.max_price,
                "calibrated price guardrail"
            );
            Signal::Success(PriceGuardrail {
                min_price: r.min_price,
                max_price: r.max_price,
            })
        }
        Ok(r) => fall_open(
            product,
            format!(
                "implausible calibrated range {}..{}",
                r.min_price, r.max_price
            ),
        ),
        Err(e) => fall_open(product, format!("unparsable calibration response: {e}")),
    }
}

fn fall_open(product: &str, reason: String) -> Signal<PriceGuardrail> {
    tracing::warn!(product, reason, "guardrail calibration fell open to default range");
    Signal::Degraded(PriceGuardrail::permissive_default(), reason)
}

fn calibration_prompt(product: &str, profile: &CountryProfile) -> String {
    format!(
        r#"You are a market calibration engine.

Product: "{product}"
Target market: {country}
Currency: {currency}

TASK: Determine the REALISTIC price range for one unit of this product in {currency}. Exclude cheap accessories.

EXAMPLES:
- Smart Ring (India) -> {{"min_price": 3000, "max_price": 35000}}
- Smart Ring (United Kingdom) -> {{"min_price": 40, "max_price": 400}}

OUTPUT JSON ONLY:
{{"min_price": <number>, "max_price": <number>}}"#,
        country = profile.full_name,
        currency = profile.currency_symbol,
    )
}
