//! Amount parsing, the savings rule, and display formatting.

use std::str::FromStr;

use chrono::{DateTime, Datelike, Local, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Number of fractional digits shown for currency values.
pub const DISPLAY_PRECISION: u32 = 2;

/// Share of a frivolous purchase suggested as savings (10%).
pub fn savings_rate() -> Decimal {
    Decimal::new(10, 2)
}

/// Savings suggested for a frivolous purchase. Kept at full precision; rounding
/// only happens when the value is displayed.
pub fn suggested_savings(amount: Decimal) -> Decimal {
    amount * savings_rate()
}

/// Parses user text as a finite, strictly positive decimal amount.
///
/// Accepts plain (`"12.50"`) and scientific (`"1.5e2"`) notation with
/// surrounding whitespace. Returns `None` for anything else.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let value = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()?;
    (value > Decimal::ZERO).then_some(value)
}

/// Locale-ish presentation preferences for a single currency.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CurrencyFormat {
    pub symbol: String,
    pub decimal_separator: char,
    pub grouping_separator: char,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            symbol: "$".into(),
            decimal_separator: '.',
            grouping_separator: ',',
        }
    }
}

impl CurrencyFormat {
    /// Renders `value` rounded to currency precision, e.g. `$1,234.50`.
    pub fn format(&self, value: Decimal) -> String {
        let body = format_number(self, value.abs());
        if value.is_sign_negative() && !value.is_zero() {
            format!("-{}{}", self.symbol, body)
        } else {
            format!("{}{}", self.symbol, body)
        }
    }
}

/// Formats a non-negative value with grouping and exactly two decimals.
pub fn format_number(format: &CurrencyFormat, value: Decimal) -> String {
    let mut rounded =
        value.round_dp_with_strategy(DISPLAY_PRECISION, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(DISPLAY_PRECISION);
    let text = rounded.to_string();
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));
    let grouped = group_digits(int_part, format.grouping_separator);
    if frac_part.is_empty() {
        grouped
    } else {
        format!("{}{}{}", grouped, format.decimal_separator, frac_part)
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}

/// Short local date used in history listings, e.g. `05 Mar 2026`.
pub fn format_entry_date(timestamp: DateTime<Utc>) -> String {
    let local = timestamp.with_timezone(&Local);
    format!(
        "{:02} {} {}",
        local.day(),
        month_label(local.month()),
        local.year()
    )
}

fn month_label(month: u32) -> &'static str {
    match month {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        12 => "Dec",
        _ => "",
    }
}
