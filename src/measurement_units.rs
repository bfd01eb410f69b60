//! # Measurement Units Module
//!
//! The fixed vocabulary of units recognized when an ingredient line is parsed.
//! A word right after the quantity is only treated as a unit when it appears here;
//! anything else belongs to the ingredient name.

use lazy_static::lazy_static;
use std::collections::HashSet;

/// Recognized unit spellings, lowercase
pub const RECOGNIZED_UNITS: &[&str] = &[
    // Volume
    "cup",
    "cups",
    "tbsp",
    "tablespoon",
    "tsp",
    "teaspoon",
    "ml",
    "milliliter",
    "milliliters",
    "l",
    "liter",
    "liters",
    // Weight
    "oz",
    "ounce",
    "ounces",
    "lb",
    "pound",
    "pounds",
    "g",
    "gram",
    "grams",
    "kg",
    "kilogram",
    "kilograms",
    // Small amounts
    "pinch",
    "dash",
];

lazy_static! {
    static ref UNIT_SET: HashSet<&'static str> = RECOGNIZED_UNITS.iter().copied().collect();
}

/// Check whether a word is a recognized unit (case-insensitive)
///
/// ```rust
/// use cookbook::measurement_units::is_recognized_unit;
///
/// assert!(is_recognized_unit("Cups"));
/// assert!(!is_recognized_unit("eggs"));
/// ```
pub fn is_recognized_unit(word: &str) -> bool {
    let lower = word.trim().to_lowercase();
    !lower.is_empty() && UNIT_SET.contains(lower.as_str())
}
