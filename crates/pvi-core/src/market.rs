//! Price-discovery and tax types shared across the collectors and the
//! financial calculator.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Plausible unit-price bounds for one product in one market, used by
/// the price collector to reject outlier listings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceGuardrail {
    pub min_price: f64,
    pub max_price: f64,
}

impl PriceGuardrail {
    /// Maximally permissive range used when calibration fails. Wide
    /// enough that downstream filtering never rejects everything.
    pub const FALLBACK_MIN: f64 = 10.0;
    pub const FALLBACK_MAX: f64 = 1_000_000.0;

    #[must_use]
    pub const fn permissive_default() -> Self {
        Self {
            min_price: Self::FALLBACK_MIN,
            max_price: Self::FALLBACK_MAX,
        }
    }

    /// Midpoint of the range, the synthetic-estimate price when no real
    /// listing survives filtering.
    #[must_use]
    pub fn midpoint(&self) -> f64 {
        (self.min_price + self.max_price) / 2.0
    }
}

/// One marketplace or shopping listing retained for aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapedProduct {
    pub title: String,
    pub price: f64,
}

/// Which collection tier produced the data that survived filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceSource {
    /// Tier A: country-specific marketplace search.
    Marketplace,
    /// Tier B: general shopping search fallback.
    ShoppingSearch,
    /// Tier C: synthetic midpoint estimate — no real listing was used.
    MarketEstimate,
}

impl PriceSource {
    /// True when no real price data backs the report. Downstream
    /// confidence scoring keys off this.
    #[must_use]
    pub const fn is_estimate(self) -> bool {
        matches!(self, PriceSource::MarketEstimate)
    }
}

impl fmt::Display for PriceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PriceSource::Marketplace => "Marketplace Search",
            PriceSource::ShoppingSearch => "Shopping Search",
            PriceSource::MarketEstimate => "Market Estimate (Fallback)",
        };
        f.write_str(label)
    }
}

/// Aggregated price discovery result.
///
/// Invariants: `products` is never empty (tier C synthesizes a midpoint
/// listing when everything else fails) and `average_price` is always
/// the arithmetic mean over `products`. Product order is discovery
/// order and carries no meaning.
#[derive(Debug, Clone, Serialize)]
pub struct PriceReport {
    pub source: PriceSource,
    pub average_price: f64,
    pub products: Vec<ScrapedProduct>,
}

/// Indirect-tax classification for a product/country pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxInfo {
    /// Fraction in `[0, 1]`. Always normalized via [`TaxInfo::normalize_rate`].
    pub rate: f64,
    pub reason: String,
}

impl TaxInfo {
    /// Collapses a rate expressed as a whole-number percentage into a
    /// fraction, then clamps to `[0, 1]`.
    ///
    /// Upstream classification sometimes emits `18` where `0.18` is
    /// meant; any magnitude above 1 is treated as a percentage. The
    /// clamp makes the operation idempotent and guarantees the field
    /// invariant. Callers must never re-normalize.
    #[must_use]
    pub fn normalize_rate(rate: f64) -> f64 {
        let fraction = if rate > 1.0 { rate / 100.0 } else { rate };
        fraction.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permissive_default_range() {
        let g = PriceGuardrail::permissive_default();
        assert_eq!(g.min_price, 10.0);
        assert_eq!(g.max_price, 1_000_000.0);
    }

    #[test]
    fn midpoint_is_arithmetic_middle() {
        let g = PriceGuardrail {
            min_price: 3000.0,
            max_price: 35000.0,
        };
        assert_eq!(g.midpoint(), 19000.0);
    }

    #[test]
    fn normalize_rate_collapses_percentages() {
        assert_eq!(TaxInfo::normalize_rate(18.0), 0.18);
        assert_eq!(TaxInfo::normalize_rate(100.0), 1.0);
    }

    #[test]
    fn normalize_rate_keeps_fractions() {
        assert_eq!(TaxInfo::normalize_rate(0.18), 0.18);
        assert_eq!(TaxInfo::normalize_rate(1.0), 1.0);
        assert_eq!(TaxInfo::normalize_rate(0.0), 0.0);
    }

    #[test]
    fn normalize_rate_is_idempotent() {
        for rate in [0.18_f64, 18.0, 1.0, 100.0] {
            let once = TaxInfo::normalize_rate(rate);
            assert_eq!(
                TaxInfo::normalize_rate(once),
                once,
                "normalize must be idempotent for input {rate}"
            );
        }
    }

    #[test]
    fn normalize_rate_clamps_out_of_range_input() {
        assert_eq!(TaxInfo::normalize_rate(250.0), 1.0);
        assert_eq!(TaxInfo::normalize_rate(-0.5), 0.0);
    }

    #[test]
    fn only_market_estimate_is_synthetic() {
        assert!(PriceSource::MarketEstimate.is_estimate());
        assert!(!PriceSource::Marketplace.is_estimate());
        assert!(!PriceSource::ShoppingSearch.is_estimate());
    }
}
