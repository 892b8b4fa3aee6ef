//! Price-string parsing for shopping results.

/// Parses a currency-formatted display price into a number.
///
/// Strips the market's currency symbol and comma thousands separators,
/// then parses the remainder as `f64`. Returns `None` for anything that
/// does not survive that treatment — callers skip such entries silently.
#[must_use]
pub fn parse_price_str(raw: &str, currency_symbol: &str) -> Option<f64> {
    let cleaned = raw.replace(currency_symbol, "").replace(',', "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}
