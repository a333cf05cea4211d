use rust_decimal::{Decimal, RoundingStrategy};

const MIN_FRACTION_DIGITS: u32 = 4;
const MAX_FRACTION_DIGITS: u32 = 10;

/// Human-readable decimal for log lines: thousands separators, between
/// 4 and 10 fraction digits, e.g. `25,000.1234`.
pub fn format_decimal(value: Decimal) -> String {
    let mut rounded = value
        .round_dp_with_strategy(MAX_FRACTION_DIGITS, RoundingStrategy::MidpointNearestEven)
        .normalize();
    if rounded.scale() < MIN_FRACTION_DIGITS {
        rounded.rescale(MIN_FRACTION_DIGITS);
    }

    let text = rounded.abs().to_string();
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));

    let mut grouped = String::with_capacity(text.len() + int_part.len() / 3 + 1);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        grouped.push('-');
    }
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if !frac_part.is_empty() {
        grouped.push('.');
        grouped.push_str(frac_part);
    }
    grouped
}
