//! Plain-text formatting shared by the command handlers.

use rust_decimal::{Decimal, RoundingStrategy};

/// Whole kroner with space-grouped thousands, e.g. `247 737 kr`.
pub(crate) fn fmt_money(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    format!("{} kr", group_thousands(rounded))
}

/// Kilometres per year, rounded to whole km.
pub(crate) fn fmt_km(km: Decimal) -> String {
    let rounded = km.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    format!("{} km", group_thousands(rounded))
}

/// Signed percentage with one decimal, e.g. `+41.3%`.
pub(crate) fn fmt_pct(ratio: Decimal) -> String {
    let mut pct = (ratio * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    pct.rescale(1);
    if pct.is_sign_positive() && !pct.is_zero() {
        format!("+{pct}%")
    } else if pct.is_zero() {
        "0.0%".to_string()
    } else {
        format!("{pct}%")
    }
}

/// Absent values render as a dash.
pub(crate) fn fmt_opt(value: Option<Decimal>, fmt: fn(Decimal) -> String) -> String {
    value.map_or_else(|| "\u{2014}".to_string(), fmt)
}

fn group_thousands(whole: Decimal) -> String {
    let digits = whole.abs().trunc().to_string();
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3 + 1);
    if whole.is_sign_negative() && !whole.is_zero() {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }
    grouped
}

/// Truncates long seller text for table columns.
pub(crate) fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        format!("{}...", text.chars().take(max_chars).collect::<String>())
    } else {
        text.to_string()
    }
}
