//! # Quantity Arithmetic
//!
//! Converts raw quantity strings ("2", "0.75", "1/2", "1 1/2") into numbers and
//! renders accumulated totals back into short display strings.
//!
//! Parsing is total: tokens that are not numbers contribute nothing. Formatting is a
//! display-oriented inverse that only rebuilds halves; every other fraction is shown
//! as a decimal.
//!
//! ```rust
//! use cookbook::quantity::{format_quantity, to_number};
//!
//! assert_eq!(to_number("1 1/2"), 1.5);
//! assert_eq!(format_quantity(to_number("1 1/2")), "1 1/2");
//! ```

use log::trace;
use regex::Regex;
use std::sync::LazyLock;

/// Tolerance used when deciding whether a total is whole or a half
const DISPLAY_EPSILON: f64 = 1e-9;

static TOKEN_PATTERNS: LazyLock<TokenPatterns> = LazyLock::new(TokenPatterns::new);

/// Compiled patterns for single quantity tokens
struct TokenPatterns {
    /// Matches integers and decimals: "2", "1.5", ".25"
    decimal: Regex,
    /// Matches simple fractions: "1/2", "3/4"
    fraction: Regex,
}

impl TokenPatterns {
    fn new() -> Self {
        Self {
            decimal: Regex::new(r"^(?:[0-9]+(?:\.[0-9]+)?|\.[0-9]+)$").unwrap(),
            fraction: Regex::new(r"^([0-9]+(?:\.[0-9]+)?)/([0-9]+(?:\.[0-9]+)?)$").unwrap(),
        }
    }
}

/// Check whether a single token is a number or a simple fraction
pub fn is_quantity_token(token: &str) -> bool {
    TOKEN_PATTERNS.decimal.is_match(token) || TOKEN_PATTERNS.fraction.is_match(token)
}

/// Check whether a token is a simple fraction such as "1/2"
pub fn is_fraction_token(token: &str) -> bool {
    TOKEN_PATTERNS.fraction.is_match(token)
}

/// Check whether a token is a bare integer (the whole part of a mixed number)
pub fn is_integer_token(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
}

/// Value of a single token, 0 when it is not a number
fn token_value(token: &str) -> f64 {
    if TOKEN_PATTERNS.decimal.is_match(token) {
        return token.parse().unwrap_or(0.0);
    }

    if let Some(captures) = TOKEN_PATTERNS.fraction.captures(token) {
        let numerator: f64 = captures[1].parse().unwrap_or(0.0);
        let denominator: f64 = captures[2].parse().unwrap_or(0.0);
        // A zero denominator is left non-finite on purpose; see finite_or_zero
        return numerator / denominator;
    }

    trace!("Ignoring non-numeric quantity token '{}'", token);
    0.0
}

/// Convert a quantity string into a number
///
/// Whitespace-separated tokens are summed, so "1 1/2" is 1.5. Empty input and
/// tokens that are not numbers count as 0. A fraction with a zero denominator
/// produces a non-finite value, which callers must pass through [`finite_or_zero`]
/// before accumulating.
pub fn to_number(quantity: &str) -> f64 {
    quantity.split_whitespace().map(token_value).sum()
}

/// Replace non-finite and negative values with 0
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Render a non-negative total for display
///
/// The total is rounded to two places first. Whole numbers have no fractional part,
/// halves render as "1/2" or "2 1/2", anything else is a decimal with at most two
/// places and no trailing zeros.
pub fn format_quantity(value: f64) -> String {
    let value = finite_or_zero(value);
    // Large totals have no fractional part and would overflow the scaling below
    let rounded = if value.fract() == 0.0 {
        value
    } else {
        (value * 100.0).round() / 100.0
    };
    let whole = rounded.trunc();
    let fraction = rounded - whole;

    if fraction < DISPLAY_EPSILON {
        return format!("{whole}");
    }

    if (fraction - 0.5).abs() < DISPLAY_EPSILON {
        return if whole == 0.0 {
            "1/2".to_string()
        } else {
            format!("{whole} 1/2")
        };
    }

    let rendered = format!("{:.2}", rounded);
    rendered
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}
