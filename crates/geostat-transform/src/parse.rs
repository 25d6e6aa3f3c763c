//! Raw value normalization.

use geostat_model::{MissingReason, ParsedValue, RawValue, Sentinel};

/// Normalizes a raw field value. Never fails: anything that is not a finite,
/// non-sentinel number becomes [`ParsedValue::Missing`].
pub fn parse(raw: &RawValue) -> ParsedValue {
    match raw {
        RawValue::Null => ParsedValue::missing(MissingReason::Null),
        RawValue::Number(value) => classify_number(*value),
        RawValue::Text(text) => parse_text(text),
    }
}

/// Normalizes a raw string field.
pub fn parse_text(text: &str) -> ParsedValue {
    let trimmed = text.trim().trim_matches('\u{feff}');
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("null") {
        return ParsedValue::missing(MissingReason::Null);
    }
    if let Some(sentinel) = Sentinel::from_symbol(trimmed) {
        return ParsedValue::missing(MissingReason::Sentinel(sentinel));
    }
    match parse_f64(trimmed) {
        Some(value) => classify_number(value),
        None => ParsedValue::missing(MissingReason::Unparseable(text.to_string())),
    }
}

/// Parses a string as f64, returning None for invalid or empty strings.
///
/// Thousands separators are accepted (`"1,234"`).
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.contains(',') {
        trimmed.replace(',', "").parse::<f64>().ok()
    } else {
        trimmed.parse::<f64>().ok()
    }
}

fn classify_number(value: f64) -> ParsedValue {
    if !value.is_finite() {
        return ParsedValue::missing(MissingReason::NonFinite);
    }
    if value.fract() == 0.0 && value < 0.0 {
        // Sentinel codes are all negative nine-digit integers.
        if let Some(sentinel) = Sentinel::from_code(value as i64) {
            return ParsedValue::missing(MissingReason::Sentinel(sentinel));
        }
    }
    ParsedValue::Value(value)
}
