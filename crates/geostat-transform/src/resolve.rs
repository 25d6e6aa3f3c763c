//! Derived-metric resolution.
//!
//! Each [`TransformationKind`] has its own computation function. They share
//! two rules:
//!
//! - a sum over several codes skips missing contributors and is only missing
//!   when every contributor is missing;
//! - a ratio whose denominator is missing, zero or negative is missing.

use geostat_model::{
    Metric, MissingReason, ParsedValue, RawRow, TransformationKind, VariableSpec,
};
use tracing::{debug, warn};

use crate::parse::parse;

const PERCENT: f64 = 100.0;
const PER_THOUSAND: f64 = 1000.0;

/// Computes the metric of `spec` for one row.
pub fn resolve(spec: &VariableSpec, row: &RawRow) -> ParsedValue {
    match spec.transformation {
        TransformationKind::None => pass_through(spec, row),
        TransformationKind::Percentage => percentage(spec, row),
        TransformationKind::SummedPercentage => summed_percentage(spec, row),
        TransformationKind::PercentageDifference => percentage_difference(spec, row),
        TransformationKind::Precalculation => precalculation(spec, row),
        TransformationKind::AverageOfPrecalculations => average_of_precalculations(spec, row),
        TransformationKind::RatePerThousand => rate_per_thousand(spec, row),
    }
}

/// Computes one metric per row, in row order.
pub fn resolve_all(spec: &VariableSpec, rows: &[RawRow]) -> Vec<Metric> {
    if spec.transformation.uses_base() && spec.effective_base_codes().is_empty() {
        warn!(
            variable = %spec.key,
            transformation = %spec.transformation,
            "variable has no base codes; every metric will be missing"
        );
    }
    let metrics: Vec<Metric> = rows
        .iter()
        .map(|row| Metric::new(row.geo_code.trim(), resolve(spec, row)))
        .collect();
    let missing = metrics.iter().filter(|m| m.value.is_missing()).count();
    debug!(
        variable = %spec.key,
        transformation = %spec.transformation,
        rows = rows.len(),
        missing,
        "resolved metrics"
    );
    metrics
}

/// Codes to request in the primary query: sources, then bases that are not
/// fetched separately. Duplicates are dropped, first occurrence kept.
pub fn required_codes(spec: &VariableSpec) -> Vec<String> {
    let mut codes: Vec<String> = Vec::new();
    let bases: &[String] = if spec.has_separate_base_query() {
        &[]
    } else {
        spec.effective_base_codes()
    };
    for code in spec.source_codes.iter().chain(bases) {
        if !codes.contains(code) {
            codes.push(code.clone());
        }
    }
    codes
}

/// Codes to request in the base query, if the variable needs one.
pub fn base_query_codes(spec: &VariableSpec) -> Option<Vec<String>> {
    if !spec.has_separate_base_query() {
        return None;
    }
    let mut codes: Vec<String> = Vec::new();
    for code in spec.effective_base_codes() {
        if !codes.contains(code) {
            codes.push(code.clone());
        }
    }
    Some(codes)
}

fn pass_through(spec: &VariableSpec, row: &RawRow) -> ParsedValue {
    match spec.source_codes.first() {
        Some(code) => lookup(row, code),
        None => ParsedValue::missing(MissingReason::NoCodes),
    }
}

fn percentage(spec: &VariableSpec, row: &RawRow) -> ParsedValue {
    ratio(source_sum(spec, row), base_sum(spec, row), PERCENT)
}

/// Many-to-one numerator: every source code is summed into a single count
/// before the (possibly multi-code) base divides it.
fn summed_percentage(spec: &VariableSpec, row: &RawRow) -> ParsedValue {
    let numerator = source_sum(spec, row);
    let denominator = base_sum(spec, row);
    ratio(numerator, denominator, PERCENT)
}

fn percentage_difference(spec: &VariableSpec, row: &RawRow) -> ParsedValue {
    match percentage(spec, row) {
        ParsedValue::Value(share) => ParsedValue::from_f64(PERCENT - share),
        missing => missing,
    }
}

fn precalculation(spec: &VariableSpec, row: &RawRow) -> ParsedValue {
    source_sum(spec, row)
}

fn average_of_precalculations(spec: &VariableSpec, row: &RawRow) -> ParsedValue {
    let mut total = 0.0;
    let mut present = 0usize;
    let mut first_missing = None;
    for code in &spec.source_codes {
        match lookup(row, code) {
            ParsedValue::Value(value) => {
                total += value;
                present += 1;
            }
            ParsedValue::Missing(reason) => {
                first_missing.get_or_insert(reason);
            }
        }
    }
    if present == 0 {
        return ParsedValue::missing(first_missing.unwrap_or(MissingReason::NoCodes));
    }
    ParsedValue::from_f64(total / present as f64)
}

fn rate_per_thousand(spec: &VariableSpec, row: &RawRow) -> ParsedValue {
    ratio(source_sum(spec, row), base_sum(spec, row), PER_THOUSAND)
}

fn lookup(row: &RawRow, key: &str) -> ParsedValue {
    match row.get(key) {
        Some(raw) => parse(raw),
        None => ParsedValue::missing(MissingReason::Absent(key.to_string())),
    }
}

fn source_sum(spec: &VariableSpec, row: &RawRow) -> ParsedValue {
    sum_present(row, spec.source_codes.iter().cloned())
}

fn base_sum(spec: &VariableSpec, row: &RawRow) -> ParsedValue {
    sum_present(
        row,
        spec.effective_base_codes()
            .iter()
            .map(|code| spec.base_key(code)),
    )
}

/// Sums present values, treating missing contributors as zero unless all of
/// them are missing.
fn sum_present(row: &RawRow, keys: impl IntoIterator<Item = String>) -> ParsedValue {
    let mut total = 0.0;
    let mut present = false;
    let mut first_missing = None;
    for key in keys {
        match lookup(row, &key) {
            ParsedValue::Value(value) => {
                total += value;
                present = true;
            }
            ParsedValue::Missing(reason) => {
                first_missing.get_or_insert(reason);
            }
        }
    }
    if present {
        ParsedValue::from_f64(total)
    } else {
        ParsedValue::missing(first_missing.unwrap_or(MissingReason::NoCodes))
    }
}

fn ratio(numerator: ParsedValue, denominator: ParsedValue, scale: f64) -> ParsedValue {
    let denominator = match denominator {
        ParsedValue::Value(value) if value > 0.0 => value,
        ParsedValue::Value(_) => return ParsedValue::missing(MissingReason::ZeroDenominator),
        missing => return missing,
    };
    match numerator {
        ParsedValue::Value(value) => ParsedValue::from_f64(value / denominator * scale),
        missing => missing,
    }
}
