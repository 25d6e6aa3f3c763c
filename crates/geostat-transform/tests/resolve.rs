//! Tests for derived-metric resolution.

use geostat_model::{
    MissingReason, ParsedValue, RawRow, RawValue, Sentinel, TransformationKind, VariableKey,
    VariableSpec,
};
use geostat_transform::{base_query_codes, required_codes, resolve, resolve_all};

fn spec(kind: TransformationKind, sources: &[&str], bases: &[&str]) -> VariableSpec {
    let mut spec = VariableSpec::new(
        VariableKey::new("Test", "Sub", "Variable"),
        sources.iter().map(|code| code.to_string()).collect(),
    );
    spec.transformation = kind;
    spec.base_codes = bases.iter().map(|code| code.to_string()).collect();
    spec
}

fn row(values: &[(&str, &str)]) -> RawRow {
    values
        .iter()
        .fold(RawRow::new("010100"), |row, (code, value)| {
            row.with_value(*code, *value)
        })
}

fn assert_close(actual: &ParsedValue, expected: f64) {
    let value = actual.value().expect("expected a value");
    assert!(
        (value - expected).abs() < 1e-9,
        "expected {expected}, got {value}"
    );
}

#[test]
fn none_passes_source_through() {
    let spec = spec(TransformationKind::None, &["B01001_001E"], &[]);
    let result = resolve(&spec, &row(&[("B01001_001E", "5000")]));
    assert_eq!(result, ParsedValue::Value(5000.0));
}

#[test]
fn none_keeps_sentinel_annotation() {
    let spec = spec(TransformationKind::None, &["B19013_001E"], &[]);
    let result = resolve(&spec, &row(&[("B19013_001E", "-666666666")]));
    assert_eq!(
        result,
        ParsedValue::missing(MissingReason::Sentinel(Sentinel::InsufficientSample))
    );
}

#[test]
fn absent_code_is_missing_not_an_error() {
    let spec = spec(TransformationKind::None, &["B01001_001E"], &[]);
    let result = resolve(&spec, &RawRow::new("010100"));
    assert_eq!(
        result,
        ParsedValue::missing(MissingReason::Absent("B01001_001E".to_string()))
    );
}

#[test]
fn percentage_divides_summed_sources_by_base() {
    let spec = spec(
        TransformationKind::Percentage,
        &["B24080_005E", "B24080_015E"],
        &["B24080_001E"],
    );
    let result = resolve(
        &spec,
        &row(&[
            ("B24080_005E", "30"),
            ("B24080_015E", "20"),
            ("B24080_001E", "200"),
        ]),
    );
    assert_close(&result, 25.0);
}

#[test]
fn percentage_with_zero_base_is_missing() {
    let spec = spec(TransformationKind::Percentage, &["A"], &["B"]);
    for numerator in ["0", "10", "-888888888", ""] {
        let result = resolve(&spec, &row(&[("A", numerator), ("B", "0")]));
        assert_eq!(
            result,
            ParsedValue::missing(MissingReason::ZeroDenominator),
            "numerator {numerator:?}"
        );
    }
}

#[test]
fn percentage_with_negative_base_is_missing() {
    let spec = spec(TransformationKind::Percentage, &["A"], &["B"]);
    let result = resolve(&spec, &row(&[("A", "10"), ("B", "-5")]));
    assert!(result.is_missing());
}

#[test]
fn percentage_treats_partially_missing_sources_as_zero() {
    let spec = spec(TransformationKind::Percentage, &["A", "B"], &["C"]);
    let result = resolve(&spec, &row(&[("A", "25"), ("B", "(X)"), ("C", "100")]));
    assert_close(&result, 25.0);
}

#[test]
fn percentage_with_all_sources_missing_is_missing() {
    let spec = spec(TransformationKind::Percentage, &["A", "B"], &["C"]);
    let result = resolve(&spec, &row(&[("A", "N"), ("B", "-"), ("C", "100")]));
    assert_eq!(
        result,
        ParsedValue::missing(MissingReason::Sentinel(Sentinel::NotAvailable))
    );
}

#[test]
fn percentage_with_fully_missing_base_is_missing() {
    let spec = spec(TransformationKind::Percentage, &["A"], &["B", "C"]);
    let result = resolve(&spec, &row(&[("A", "10")]));
    assert_eq!(
        result,
        ParsedValue::missing(MissingReason::Absent("B".to_string()))
    );
}

#[test]
fn percentage_without_base_codes_is_missing() {
    let spec = spec(TransformationKind::Percentage, &["A"], &[]);
    let result = resolve(&spec, &row(&[("A", "10")]));
    assert_eq!(result, ParsedValue::missing(MissingReason::NoCodes));
}

#[test]
fn summed_percentage_matches_percentage_of_presummed_numerator() {
    let summed = spec(TransformationKind::SummedPercentage, &["A", "B"], &["C"]);
    let presummed = spec(TransformationKind::Percentage, &["AB"], &["C"]);
    for (a, b, c) in [(1.0, 2.0, 9.0), (17.5, 0.25, 300.0), (0.0, 0.0, 4.0)] {
        let left = resolve(
            &summed,
            &RawRow::new("1")
                .with_value("A", a)
                .with_value("B", b)
                .with_value("C", c),
        );
        let right = resolve(
            &presummed,
            &RawRow::new("1").with_value("AB", a + b).with_value("C", c),
        );
        assert_eq!(left, right);
    }
}

#[test]
fn summed_percentage_sums_multi_code_base() {
    let spec = spec(
        TransformationKind::SummedPercentage,
        &["B24080_020E", "B24080_015E"],
        &["B24080_005E", "B24080_015E", "B24080_010E", "B24080_020E"],
    );
    let result = resolve(
        &spec,
        &row(&[
            ("B24080_005E", "40"),
            ("B24080_010E", "20"),
            ("B24080_015E", "25"),
            ("B24080_020E", "15"),
        ]),
    );
    assert_close(&result, 40.0);
}

#[test]
fn percentage_difference_is_complement() {
    let spec = spec(
        TransformationKind::PercentageDifference,
        &["B02001_002E"],
        &["B02001_001E"],
    );
    let result = resolve(
        &spec,
        &row(&[("B02001_002E", "750"), ("B02001_001E", "1000")]),
    );
    assert_close(&result, 25.0);
}

#[test]
fn percentage_difference_zero_base_is_missing() {
    let spec = spec(TransformationKind::PercentageDifference, &["A"], &["B"]);
    let result = resolve(&spec, &row(&[("A", "0"), ("B", "0")]));
    assert_eq!(result, ParsedValue::missing(MissingReason::ZeroDenominator));
}

#[test]
fn precalculation_passes_percentage_through() {
    let spec = spec(TransformationKind::Precalculation, &["S2701_C03_015E"], &[]);
    let result = resolve(&spec, &row(&[("S2701_C03_015E", "93.4")]));
    assert_close(&result, 93.4);
}

#[test]
fn precalculation_sums_multiple_sources() {
    let spec = spec(TransformationKind::Precalculation, &["A", "B"], &[]);
    let result = resolve(&spec, &row(&[("A", "12.5"), ("B", "7.5")]));
    assert_close(&result, 20.0);
}

#[test]
fn average_of_precalculations_skips_missing_contributors() {
    let spec = spec(
        TransformationKind::AverageOfPrecalculations,
        &["A", "B", "C"],
        &[],
    );
    let result = resolve(&spec, &row(&[("A", "90"), ("B", "-999999999"), ("C", "80")]));
    assert_close(&result, 85.0);
}

#[test]
fn average_of_precalculations_all_missing_is_missing() {
    let spec = spec(TransformationKind::AverageOfPrecalculations, &["A", "B"], &[]);
    let result = resolve(&spec, &row(&[("A", ""), ("B", "**")]));
    assert_eq!(result, ParsedValue::missing(MissingReason::Null));
}

#[test]
fn rate_per_thousand_scales_by_thousand() {
    let spec = spec(
        TransformationKind::RatePerThousand,
        &["B21001_002E"],
        &["B21001_001E"],
    );
    let result = resolve(
        &spec,
        &row(&[("B21001_002E", "45"), ("B21001_001E", "3000")]),
    );
    assert_close(&result, 15.0);
}

#[test]
fn base_filter_reads_suffixed_base_values() {
    let mut spec = spec(TransformationKind::Percentage, &["FIRMPDEMP"], &[]);
    spec.filter = Some("&NAICS2017=00&SEX=002&YIBSZFI=319".to_string());
    spec.base_filter = Some("&NAICS2017=00&SEX=002&YIBSZFI=001".to_string());

    let mut numerator = RawRow::new("30460").with_value("FIRMPDEMP", "120");
    let base = RawRow::new("30460").with_value("FIRMPDEMP", "480");
    numerator.merge_base(&base);

    assert_close(&resolve(&spec, &numerator), 25.0);
    assert_eq!(required_codes(&spec), vec!["FIRMPDEMP".to_string()]);
    assert_eq!(
        base_query_codes(&spec),
        Some(vec!["FIRMPDEMP".to_string()])
    );
}

#[test]
fn required_codes_deduplicates_in_order() {
    let spec = spec(
        TransformationKind::Percentage,
        &["B24080_020E", "B24080_015E"],
        &["B24080_005E", "B24080_015E", "B24080_020E"],
    );
    assert_eq!(
        required_codes(&spec),
        vec!["B24080_020E", "B24080_015E", "B24080_005E"]
    );
    assert_eq!(base_query_codes(&spec), None);
}

#[test]
fn resolve_all_preserves_row_order_and_trims_codes() {
    let spec = spec(TransformationKind::None, &["B01001_001E"], &[]);
    let rows = vec![
        RawRow::new(" 010200 ").with_value("B01001_001E", "10"),
        RawRow::new("010100").with_value("B01001_001E", RawValue::Null),
    ];
    let metrics = resolve_all(&spec, &rows);
    assert_eq!(metrics.len(), 2);
    assert_eq!(metrics[0].geo_code, "010200");
    assert_eq!(metrics[0].value(), Some(10.0));
    assert_eq!(metrics[1].geo_code, "010100");
    assert!(metrics[1].value.is_missing());
}
