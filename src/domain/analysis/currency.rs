//! Currency display formatting.

/// Formats an amount with a currency symbol prefix.
///
/// Precision grows as the magnitude shrinks so per-unit prices stay readable:
/// 2 decimals from 1 upward, 4 below 1, 6 below 0.01. Zero is `0.00`.
pub fn format_currency(value: f64, symbol: &str) -> String {
    if value == 0.0 {
        return format!("{}0.00", symbol);
    }
    let magnitude = value.abs();
    if magnitude < 0.01 {
        format!("{}{:.6}", symbol, value)
    } else if magnitude < 1.0 {
        format!("{}{:.4}", symbol, value)
    } else {
        format!("{}{:.2}", symbol, value)
    }
}
