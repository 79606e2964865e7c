//! Dominican peso formatting (`es-DO` conventions: comma thousands, dot decimals).

use isr_core::calculations::common::round_currency;
use rust_decimal::{Decimal, RoundingStrategy};

/// Currency symbol for the Dominican peso.
pub const SIMBOLO: &str = "RD$";

/// Formats an amount as pesos with exactly two decimals, e.g. `RD$45,191.00`.
///
/// Negative amounts put the sign before the symbol: `-RD$441.88`.
pub fn format_currency(value: Decimal) -> String {
    let rounded = round_currency(value);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = format!("{:.2}", rounded.abs());
    let (integer, fraction) = text.split_once('.').unwrap_or((&text, "00"));

    format!("{sign}{SIMBOLO}{}.{fraction}", group_thousands(integer))
}

/// Formats a plain amount with thousands separators and at most two decimals,
/// dropping trailing zeros: `180,000`, `1,715.46`, `0.15`.
pub fn format_amount(value: Decimal) -> String {
    let rounded = value
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = rounded.abs().to_string();

    match text.split_once('.') {
        Some((integer, fraction)) => format!("{sign}{}.{fraction}", group_thousands(integer)),
        None => format!("{sign}{}", group_thousands(&text)),
    }
}

/// Like [`format_amount`] but empty for zero, as the income field shows it.
pub fn format_input_value(value: Decimal) -> String {
    if value.is_zero() {
        String::new()
    } else {
        format_amount(value)
    }
}

/// Formats a rate given as a fraction (`0.15`) as a percentage (`15%`).
pub fn format_fraction_as_percent(rate: Decimal) -> String {
    format!("{}%", format_amount(rate * Decimal::ONE_HUNDRED))
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
