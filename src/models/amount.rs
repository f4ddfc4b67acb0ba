//! Cell amount parsing and formatting
//!
//! Cell values are plain `f64`s. Anything a user types that is not a finite
//! number becomes zero; the error is never surfaced.

/// Coerce a raw number to a cell value (non-finite becomes zero)
pub fn coerce_amount(raw: f64) -> f64 {
    if raw.is_finite() {
        raw
    } else {
        0.0
    }
}

/// Parse cell text into an amount.
///
/// Accepts "1200", "-35.5", "$1,200.00". Empty or unparsable text is zero.
pub fn parse_amount(s: &str) -> f64 {
    let s = s.trim();

    let (negative, s) = match s.strip_prefix('-') {
        Some(stripped) => (true, stripped),
        None => (false, s),
    };

    let s = s.strip_prefix('$').unwrap_or(s);
    let cleaned: String = s.chars().filter(|c| *c != ',').collect();

    if cleaned.is_empty() {
        return 0.0;
    }

    match cleaned.parse::<f64>() {
        Ok(value) if negative => coerce_amount(-value),
        Ok(value) => coerce_amount(value),
        Err(_) => 0.0,
    }
}

/// Format an amount with a currency symbol and thousands separators
pub fn format_amount(value: f64, symbol: &str, decimals: usize) -> String {
    let value = coerce_amount(value);
    let formatted = format!("{:.*}", decimals, value.abs());

    let (whole, fraction) = match formatted.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    // Rounding can turn a tiny negative into "0.00"; keep that unsigned
    let is_negative = value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0');
    let sign = if is_negative { "-" } else { "" };

    match fraction {
        Some(fraction) => format!("{}{}{}.{}", sign, symbol, grouped, fraction),
        None => format!("{}{}{}", sign, symbol, grouped),
    }
}
