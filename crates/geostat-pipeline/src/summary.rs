//! Every summary variable resolved for one geography.

use serde::Serialize;

use geostat_classify::format_value;
use geostat_model::{
    GeographyLayer, MissingReason, ParsedValue, RawRow, ValueFormat, VariableKey, VariableSpec,
};
use geostat_transform::resolve;

use crate::compute::merge_base_rows;

/// One summary variable's value for the inspected geography.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryEntry {
    pub key: VariableKey,
    pub format: ValueFormat,
    pub value: ParsedValue,
}

impl SummaryEntry {
    pub fn label(&self) -> &str {
        &self.key.label
    }

    /// The value in its display format, or "No data".
    pub fn formatted(&self) -> String {
        match self.value {
            ParsedValue::Value(value) => format_value(value, self.format),
            ParsedValue::Missing(_) => "No data".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GeographySummary {
    pub layer: GeographyLayer,
    pub geo_code: String,
    pub year: u16,
    pub entries: Vec<SummaryEntry>,
}

impl GeographySummary {
    pub fn entry(&self, label: &str) -> Option<&SummaryEntry> {
        self.entries.iter().find(|entry| entry.label() == label)
    }
}

/// Resolves `spec` for the row whose code matches `geo_code`.
///
/// Codes compare trimmed; a geography with no row is missing rather than an
/// error.
pub fn summary_entry(
    spec: &VariableSpec,
    mut rows: Vec<RawRow>,
    base_rows: Option<Vec<RawRow>>,
    geo_code: &str,
) -> SummaryEntry {
    let geo_code = geo_code.trim();
    rows.retain(|row| row.geo_code.trim() == geo_code);
    if let Some(base_rows) = base_rows {
        merge_base_rows(&mut rows, &base_rows);
    }
    let value = match rows.first() {
        Some(row) => resolve(spec, row),
        None => ParsedValue::missing(MissingReason::Absent(geo_code.to_string())),
    };
    SummaryEntry {
        key: spec.key.clone(),
        format: spec.format,
        value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geostat_model::TransformationKind;

    fn female_share() -> VariableSpec {
        let mut spec = VariableSpec::new(
            VariableKey::new("Demographics", "Age and Gender", "Female Population"),
            vec!["B01001_026E".to_string()],
        );
        spec.transformation = TransformationKind::Percentage;
        spec.base_codes = vec!["B01001_001E".to_string()];
        spec.format = ValueFormat::Percentage;
        spec
    }

    fn rows() -> Vec<RawRow> {
        vec![
            RawRow::new("010100")
                .with_value("B01001_026E", "2600")
                .with_value("B01001_001E", "5000"),
            RawRow::new("010200")
                .with_value("B01001_026E", "1400")
                .with_value("B01001_001E", "3000"),
        ]
    }

    #[test]
    fn picks_the_matching_row() {
        let entry = summary_entry(&female_share(), rows(), None, " 010100 ");
        let value = entry.value.value().expect("value for 010100");
        assert!((value - 52.0).abs() < 1e-9);
        assert_eq!(entry.formatted(), "52.0%");
    }

    #[test]
    fn unknown_code_is_absent() {
        let entry = summary_entry(&female_share(), rows(), None, "980100");
        assert_eq!(
            entry.value,
            ParsedValue::Missing(MissingReason::Absent("980100".to_string()))
        );
        assert_eq!(entry.formatted(), "No data");
    }
}
