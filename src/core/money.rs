//! Currency formatting helpers

/// Default currency symbol used in messages and tables.
pub const DEFAULT_CURRENCY_SYMBOL: &str = "₱";

/// Formats an amount with a currency symbol, thousands separators and two
/// decimal places, e.g. `₱12,500.00`.
pub fn format_currency(amount: f64, symbol: &str) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{sign}{symbol}{grouped}.{:02}", cents % 100)
}
