//! Text formatting shared by the terminal and browser dashboards.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fmt::Write;

/// Format an amount with two decimals and thousands separators:
/// `format_money(dec!(1234.5), "$") == "$1,234.50"`.
pub fn format_money(amount: Decimal, symbol: &str) -> String {
    let fixed = format!("{:.2}", amount.round_dp(2));
    let (sign, digits) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, "00"));
    format!("{sign}{symbol}{}.{frac_part}", group_thousands(int_part))
}

/// Format a `0..=1` fraction as a percentage with one decimal.
pub fn format_share(share: Decimal) -> String {
    format!("{:.1}%", (share * Decimal::ONE_HUNDRED).round_dp(1))
}

/// Render a timestamp with a user-supplied strftime pattern, falling back to
/// RFC 3339 when the pattern is invalid.
pub fn format_timestamp(at: DateTime<Utc>, pattern: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", at.format(pattern)).is_err() {
        return at.to_rfc3339();
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
