//! Human-readable value formatting for legend labels.

use geostat_model::ValueFormat;

/// Formats a metric value in its display format.
pub fn format_value(value: f64, format: ValueFormat) -> String {
    match format {
        ValueFormat::Percentage => format!("{value:.1}%"),
        ValueFormat::Currency => {
            let rounded = value.round();
            let sign = if rounded < 0.0 { "-" } else { "" };
            format!("{sign}${}", group_thousands(rounded.abs(), 0))
        }
        ValueFormat::Number => {
            let rounded = (value * 10.0).round() / 10.0;
            let decimals = if rounded.fract() == 0.0 { 0 } else { 1 };
            let sign = if rounded < 0.0 { "-" } else { "" };
            format!("{sign}{}", group_thousands(rounded.abs(), decimals))
        }
        ValueFormat::RatePerThousand => format!("{value:.1} per 1,000"),
        ValueFormat::None => format_numeric(value),
    }
}

/// Formats a floating-point number as a string without trailing zeros.
pub fn format_numeric(value: f64) -> String {
    let s = format!("{value}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

fn group_thousands(value: f64, decimals: usize) -> String {
    let fixed = format!("{value:.decimals$}");
    let (integer, fraction) = match fixed.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (fixed.as_str(), None),
    };
    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (idx, digit) in integer.chars().enumerate() {
        if idx > 0 && (integer.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_each_display_kind() {
        assert_eq!(format_value(12.345, ValueFormat::Percentage), "12.3%");
        assert_eq!(format_value(1_234_567.4, ValueFormat::Currency), "$1,234,567");
        assert_eq!(format_value(-950.0, ValueFormat::Currency), "-$950");
        assert_eq!(format_value(5000.0, ValueFormat::Number), "5,000");
        assert_eq!(format_value(1234.56, ValueFormat::Number), "1,234.6");
        assert_eq!(format_value(15.0, ValueFormat::RatePerThousand), "15.0 per 1,000");
        assert_eq!(format_value(10.50, ValueFormat::None), "10.5");
        assert_eq!(format_value(100.0, ValueFormat::None), "100");
    }

    #[test]
    fn number_drops_decimal_that_rounds_away() {
        assert_eq!(format_value(1234.96, ValueFormat::Number), "1,235");
        assert_eq!(format_value(-0.04, ValueFormat::Number), "0");
        assert_eq!(format_value(-2.26, ValueFormat::Number), "-2.3");
        assert_eq!(format_value(9.99, ValueFormat::Number), "10");
    }
}
