//! Deterministic financial calculator. Pure function, no I/O.
//!
//! These numbers are authoritative: the verdict synthesizer overwrites
//! any generated financials with this breakdown wholesale, so narrative
//! drift can describe the numbers but never alter them.

use pvi_core::FinancialBreakdown;

/// Cost-of-goods share of the sell price.
const COGS_SHARE: f64 = 0.35;
/// Marketing cost share of the sell price.
const MARKETING_SHARE: f64 = 0.25;
/// Logistics cost share of the sell price.
const LOGISTICS_SHARE: f64 = 0.15;

/// Computes the cost/margin breakdown for one unit at the average
/// market price, with a normalized tax rate in `[0, 1]`.
///
/// Every monetary output is truncated (not rounded) to whole currency
/// units; each cost is truncated from the truncated sell price, so
/// `net_profit + cogs + marketing_cpa + logistics_cost + tax_rate ==
/// sell_price` holds exactly. A zero, negative, or non-finite sell
/// price zeroes every field.
#[must_use]
pub fn compute_breakdown(avg_sell_price: f64, tax_rate: f64) -> FinancialBreakdown {
    if !avg_sell_price.is_finite() || avg_sell_price <= 0.0 {
        return FinancialBreakdown::default();
    }

    let sell = avg_sell_price.trunc();
    if sell <= 0.0 {
        return FinancialBreakdown::default();
    }

    #[allow(clippy::cast_possible_truncation)]
    let as_units = |value: f64| -> i64 { value.trunc() as i64 };

    let sell_price = as_units(sell);
    let cogs = as_units(sell * COGS_SHARE);
    let marketing_cpa = as_units(sell * MARKETING_SHARE);
    let logistics_cost = as_units(sell * LOGISTICS_SHARE);
    let tax_amount = as_units(sell * tax_rate);

    let net_profit = sell_price - (cogs + marketing_cpa + logistics_cost + tax_amount);
    #[allow(clippy::cast_precision_loss)]
    let net_margin_pct = as_units((net_profit as f64 / sell) * 100.0);

    FinancialBreakdown {
        sell_price,
        cogs,
        marketing_cpa,
        logistics_cost,
        tax_rate: tax_amount,
        net_margin_pct,
        net_profit,
        note: "Costs estimated at fixed category shares: COGS 35%, marketing 25%, logistics 15%."
            .to_string(),
    }
}
