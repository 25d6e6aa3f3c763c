use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Suffix applied to base codes fetched under a separate base filter, so the
/// denominator of `FIRMPDEMP` never collides with its numerator in one row.
pub const BASE_KEY_SUFFIX: &str = "@base";

/// How the source (and base) values of a row combine into one metric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransformationKind {
    /// Pass the source value through unchanged.
    #[default]
    None,
    /// Sum of sources over sum of bases, as 0-100.
    Percentage,
    /// Several numerator codes summed before dividing by the summed base.
    SummedPercentage,
    /// Complement of a percentage share: `100 - percentage`.
    PercentageDifference,
    /// Sources are already percentages.
    Precalculation,
    /// Mean of several already-percentage sources.
    AverageOfPrecalculations,
    /// Sum of sources over sum of bases, per thousand.
    RatePerThousand,
}

impl TransformationKind {
    pub const ALL: [TransformationKind; 7] = [
        TransformationKind::None,
        TransformationKind::Percentage,
        TransformationKind::SummedPercentage,
        TransformationKind::PercentageDifference,
        TransformationKind::Precalculation,
        TransformationKind::AverageOfPrecalculations,
        TransformationKind::RatePerThousand,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransformationKind::None => "none",
            TransformationKind::Percentage => "percentage",
            TransformationKind::SummedPercentage => "summedPercentage",
            TransformationKind::PercentageDifference => "percentageDifference",
            TransformationKind::Precalculation => "precalculation",
            TransformationKind::AverageOfPrecalculations => "averageOfPrecalculations",
            TransformationKind::RatePerThousand => "ratePerThousand",
        }
    }

    /// Returns true if the kind divides by a base (denominator).
    pub fn uses_base(&self) -> bool {
        matches!(
            self,
            TransformationKind::Percentage
                | TransformationKind::SummedPercentage
                | TransformationKind::PercentageDifference
                | TransformationKind::RatePerThousand
        )
    }
}

impl fmt::Display for TransformationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransformationKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ModelError::UnknownName {
                kind: "transformation kind",
                value: s.to_string(),
            })
    }
}

/// Display format of a metric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueFormat {
    Percentage,
    Currency,
    Number,
    RatePerThousand,
    #[default]
    None,
}

impl ValueFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueFormat::Percentage => "percentage",
            ValueFormat::Currency => "currency",
            ValueFormat::Number => "number",
            ValueFormat::RatePerThousand => "ratePerThousand",
            ValueFormat::None => "none",
        }
    }
}

impl fmt::Display for ValueFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Method used to partition metric values into classes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClassificationMethod {
    EqualInterval,
    #[default]
    Quantiles,
    NaturalBreaks,
}

impl ClassificationMethod {
    pub const ALL: [ClassificationMethod; 3] = [
        ClassificationMethod::EqualInterval,
        ClassificationMethod::Quantiles,
        ClassificationMethod::NaturalBreaks,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClassificationMethod::EqualInterval => "equalInterval",
            ClassificationMethod::Quantiles => "quantiles",
            ClassificationMethod::NaturalBreaks => "naturalBreaks",
        }
    }
}

impl fmt::Display for ClassificationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClassificationMethod {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        Self::ALL
            .into_iter()
            .find(|method| method.as_str().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| ModelError::UnknownName {
                kind: "classification method",
                value: s.to_string(),
            })
    }
}

/// Survey dataset a variable is published in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetRef {
    /// Dataset identifiers the variable exists in (e.g. `acs5`, `acs1`).
    #[serde(default)]
    pub available_in: Vec<String>,
    /// API path of the dataset actually queried (e.g. `acs/acs5/subject`).
    pub displayed: String,
}

/// Catalogue address of a variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VariableKey {
    pub category: String,
    pub subcategory: String,
    pub label: String,
}

impl VariableKey {
    pub fn new(
        category: impl Into<String>,
        subcategory: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            subcategory: subcategory.into(),
            label: label.into(),
        }
    }
}

impl fmt::Display for VariableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.category, self.subcategory, self.label)
    }
}

impl FromStr for VariableKey {
    type Err = ModelError;

    /// Parses `category/subcategory/label`; the label keeps any further slashes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, '/').map(str::trim);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(category), Some(subcategory), Some(label))
                if !category.is_empty() && !subcategory.is_empty() && !label.is_empty() =>
            {
                Ok(Self::new(category, subcategory, label))
            }
            _ => Err(ModelError::InvalidVariableKey(s.to_string())),
        }
    }
}

/// Everything needed to fetch and compute one statistic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableSpec {
    pub key: VariableKey,
    pub source_codes: Vec<String>,
    #[serde(default)]
    pub transformation: TransformationKind,
    #[serde(default)]
    pub base_codes: Vec<String>,
    #[serde(default)]
    pub base_label: Option<String>,
    #[serde(default)]
    pub filter: Option<String>,
    #[serde(default)]
    pub base_filter: Option<String>,
    #[serde(default)]
    pub format: ValueFormat,
    #[serde(default)]
    pub classification: ClassificationMethod,
    #[serde(default)]
    pub dataset: DatasetRef,
    #[serde(default)]
    pub description: Option<String>,
}

impl VariableSpec {
    pub fn new(key: VariableKey, source_codes: Vec<String>) -> Self {
        Self {
            key,
            source_codes,
            transformation: TransformationKind::None,
            base_codes: Vec::new(),
            base_label: None,
            filter: None,
            base_filter: None,
            format: ValueFormat::None,
            classification: ClassificationMethod::default(),
            dataset: DatasetRef::default(),
            description: None,
        }
    }

    pub fn label(&self) -> &str {
        &self.key.label
    }

    /// Returns true when the base values come from a second query made with
    /// `base_filter` rather than from the numerator query.
    pub fn has_separate_base_query(&self) -> bool {
        self.base_filter.is_some()
    }

    /// Codes summed into the denominator.
    ///
    /// A base filter with no explicit base codes reuses the source codes: the
    /// same table cell queried under a different qualifier.
    pub fn effective_base_codes(&self) -> &[String] {
        if self.base_codes.is_empty() && self.has_separate_base_query() {
            &self.source_codes
        } else {
            &self.base_codes
        }
    }

    /// Row key under which a base code's value is stored.
    pub fn base_key(&self, code: &str) -> String {
        if self.has_separate_base_query() {
            format!("{code}{BASE_KEY_SUFFIX}")
        } else {
            code.to_string()
        }
    }
}
