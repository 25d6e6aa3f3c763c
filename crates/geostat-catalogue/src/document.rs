//! On-disk shape of the catalogue TOML.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use geostat_classify::Rgb;
use geostat_model::{ClassificationMethod, TransformationKind, ValueFormat};

use crate::dataset::DatasetInfo;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogueDocument {
    pub settings: SettingsEntry,
    #[serde(default)]
    pub geographies: BTreeMap<String, GeographyEntry>,
    #[serde(default)]
    pub datasets: BTreeMap<String, DatasetInfo>,
    #[serde(default)]
    pub variables: Vec<VariableEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsEntry {
    pub initial_geography: String,
    #[serde(default)]
    pub initial_category: Option<String>,
    #[serde(default)]
    pub initial_subcategory: Option<String>,
    pub year: u16,
    #[serde(default = "default_class_count")]
    pub class_count: usize,
    #[serde(default)]
    pub colors: Option<ColorsEntry>,
    /// `category/subcategory/label` keys.
    #[serde(default)]
    pub summary_variables: Vec<String>,
}

fn default_class_count() -> usize {
    5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColorsEntry {
    pub start: Rgb,
    pub end: Rgb,
    pub no_data: Rgb,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeographyEntry {
    pub label: String,
    pub geography_type: String,
    pub geo_code_field: String,
    pub api_query: String,
    pub features_file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariableEntry {
    pub category: String,
    pub subcategory: String,
    pub label: String,
    pub dataset: String,
    #[serde(default)]
    pub available_in: Vec<String>,
    pub codes: Vec<String>,
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
    pub description: Option<String>,
}
