//! Text and number normalization shared by every section of the document.
//!
//! Free text is trimmed, whitespace-collapsed, optionally stripped of
//! diacritics and truncated to the schema's character limit. Numbers are
//! rendered as fixed-decimal strings, never locale-formatted.

use rust_decimal::{Decimal, RoundingStrategy};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Remove diacritics: "Ação São João" → "Acao Sao Joao".
pub fn remove_accents(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).nfc().collect()
}

/// Truncate to at most `max_chars` characters (not bytes).
pub fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// Optionally strip accents, collapse whitespace (trimming both ends), then
/// truncate.
pub fn clean_text(text: &str, max_chars: usize, strip_accents: bool) -> String {
    // Stripping first: a dangling combining mark can sit next to a space.
    let plain = if strip_accents {
        remove_accents(text)
    } else {
        text.to_string()
    };
    let collapsed = plain.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate(&collapsed, max_chars).trim_end().to_string()
}

/// [`clean_text`] for optional fields; blank input becomes `None`.
pub fn clean_optional(text: Option<&str>, max_chars: usize, strip_accents: bool) -> Option<String> {
    text.map(|t| clean_text(t, max_chars, strip_accents))
        .filter(|t| !t.is_empty())
}

/// Keep only ASCII digits: "11.222.333/0001-81" → "11222333000181".
pub fn digits_only(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Drop the usual punctuation masks (`.`, `/`, `-`, spaces) but keep anything
/// else, so malformed ids still fail format checks.
pub fn strip_mask(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '.' | '/' | '-') && !c.is_whitespace())
        .collect()
}

/// Round to `dp` places, half away from zero (commercial rounding).
pub fn round_half_away(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Format with exactly `dp` decimal places: `format_decimal(dec!(5), 2)` → "5.00".
pub fn format_decimal(value: Decimal, dp: u32) -> String {
    let mut rounded = round_half_away(value, dp);
    rounded.rescale(dp);
    rounded.to_string()
}

/// Monetary values (2 dp).
pub fn format_money(value: Decimal) -> String {
    format_decimal(value, 2)
}

/// Quantities and rates (4 dp).
pub fn format_quantity(value: Decimal) -> String {
    format_decimal(value, 4)
}

/// Unit values (10 dp).
pub fn format_unit_value(value: Decimal) -> String {
    format_decimal(value, 10)
}
