use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use tracing::{debug, warn};

use geostat_classify::ColorRamp;
use geostat_model::{DatasetRef, GeographyLayer, VariableKey, VariableSpec};

use crate::dataset::DatasetInfo;
use crate::document::{CatalogueDocument, GeographyEntry, SettingsEntry, VariableEntry};
use crate::error::{CatalogueError, Result};

/// Application defaults carried by the catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub initial_geography: String,
    pub initial_category: Option<String>,
    pub initial_subcategory: Option<String>,
    pub year: u16,
    pub class_count: usize,
    pub ramp: ColorRamp,
    /// Variables shown together when one geography is inspected.
    pub summary_variables: Vec<VariableKey>,
}

/// Read-only catalogue of geography layers, datasets and variables.
///
/// Variables keep their file order; lookups go through a
/// (category, subcategory, label) index.
#[derive(Debug, Clone)]
pub struct Catalogue {
    settings: Settings,
    geographies: BTreeMap<String, GeographyLayer>,
    datasets: BTreeMap<String, DatasetInfo>,
    variables: Vec<VariableSpec>,
    index: BTreeMap<VariableKey, usize>,
}

impl Catalogue {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| CatalogueError::io(path, e))?;
        let catalogue = Self::parse(&contents, path)?;
        debug!(
            path = %path.display(),
            geographies = catalogue.geographies.len(),
            datasets = catalogue.datasets.len(),
            variables = catalogue.variables.len(),
            "loaded catalogue"
        );
        Ok(catalogue)
    }

    /// Parses catalogue text; `origin` is only used in error messages.
    pub fn parse(contents: &str, origin: &Path) -> Result<Self> {
        let document: CatalogueDocument =
            toml::from_str(contents).map_err(|e| CatalogueError::Toml {
                path: origin.to_path_buf(),
                source: e,
            })?;
        Self::from_document(document)
    }

    fn from_document(document: CatalogueDocument) -> Result<Self> {
        let geographies: BTreeMap<String, GeographyLayer> = document
            .geographies
            .into_iter()
            .map(|(id, entry)| {
                let layer = geography_layer(&id, entry);
                (id, layer)
            })
            .collect();
        let settings = settings(document.settings, &geographies)?;

        let mut variables = Vec::with_capacity(document.variables.len());
        let mut index = BTreeMap::new();
        for entry in document.variables {
            let spec = variable_spec(entry, &document.datasets)?;
            if index.insert(spec.key.clone(), variables.len()).is_some() {
                return Err(CatalogueError::DuplicateVariable { key: spec.key });
            }
            variables.push(spec);
        }
        if let Some(key) = settings
            .summary_variables
            .iter()
            .find(|key| !index.contains_key(*key))
        {
            return Err(CatalogueError::UnknownVariable { key: key.clone() });
        }

        Ok(Self {
            settings,
            geographies,
            datasets: document.datasets,
            variables,
            index,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Specs of the configured summary variables, in settings order.
    pub fn summary_variables(&self) -> impl Iterator<Item = &VariableSpec> {
        self.settings
            .summary_variables
            .iter()
            .filter_map(|key| self.lookup(key))
    }

    pub fn lookup(&self, key: &VariableKey) -> Option<&VariableSpec> {
        self.index.get(key).map(|&position| &self.variables[position])
    }

    pub fn variable(&self, key: &VariableKey) -> Result<&VariableSpec> {
        self.lookup(key)
            .ok_or_else(|| CatalogueError::UnknownVariable { key: key.clone() })
    }

    pub fn geography(&self, id: &str) -> Result<&GeographyLayer> {
        self.geographies
            .get(id)
            .ok_or_else(|| CatalogueError::UnknownGeography {
                geography: id.to_string(),
            })
    }

    pub fn initial_geography(&self) -> Result<&GeographyLayer> {
        self.geography(&self.settings.initial_geography)
    }

    pub fn geographies(&self) -> impl Iterator<Item = &GeographyLayer> {
        self.geographies.values()
    }

    pub fn dataset(&self, path: &str) -> Option<&DatasetInfo> {
        self.datasets.get(path)
    }

    pub fn datasets(&self) -> impl Iterator<Item = (&str, &DatasetInfo)> {
        self.datasets.iter().map(|(path, info)| (path.as_str(), info))
    }

    /// All variables in catalogue order.
    pub fn variables(&self) -> &[VariableSpec] {
        &self.variables
    }

    /// Distinct categories in catalogue order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.variables
            .iter()
            .map(|spec| spec.key.category.as_str())
            .filter(|category| seen.insert(*category))
            .collect()
    }

    /// Distinct subcategories of `category` in catalogue order.
    pub fn subcategories(&self, category: &str) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.variables
            .iter()
            .filter(|spec| spec.key.category == category)
            .map(|spec| spec.key.subcategory.as_str())
            .filter(|subcategory| seen.insert(*subcategory))
            .collect()
    }

    pub fn variables_in<'a>(
        &'a self,
        category: &'a str,
        subcategory: Option<&'a str>,
    ) -> impl Iterator<Item = &'a VariableSpec> + 'a {
        self.variables.iter().filter(move |spec| {
            spec.key.category == category
                && subcategory.is_none_or(|subcategory| spec.key.subcategory == subcategory)
        })
    }
}

fn geography_layer(id: &str, entry: GeographyEntry) -> GeographyLayer {
    GeographyLayer {
        id: id.to_string(),
        label: entry.label,
        geography_type: entry.geography_type,
        geo_code_field: entry.geo_code_field,
        api_query: entry.api_query,
        features_file: entry.features_file,
    }
}

fn settings(
    entry: SettingsEntry,
    geographies: &BTreeMap<String, GeographyLayer>,
) -> Result<Settings> {
    if !geographies.contains_key(&entry.initial_geography) {
        return Err(CatalogueError::UnknownGeography {
            geography: entry.initial_geography,
        });
    }
    if entry.class_count == 0 {
        return Err(CatalogueError::InvalidSetting {
            name: "class_count",
            message: "must be at least 1".to_string(),
        });
    }
    let ramp = entry
        .colors
        .map(|colors| ColorRamp {
            start: colors.start,
            end: colors.end,
            no_data: colors.no_data,
        })
        .unwrap_or_default();
    let summary_variables = entry
        .summary_variables
        .iter()
        .map(|text| {
            text.parse::<VariableKey>()
                .map_err(|e| CatalogueError::InvalidSetting {
                    name: "summary_variables",
                    message: e.to_string(),
                })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Settings {
        initial_geography: entry.initial_geography,
        initial_category: entry.initial_category,
        initial_subcategory: entry.initial_subcategory,
        year: entry.year,
        class_count: entry.class_count,
        ramp,
        summary_variables,
    })
}

fn variable_spec(
    entry: VariableEntry,
    datasets: &BTreeMap<String, DatasetInfo>,
) -> Result<VariableSpec> {
    let key = VariableKey::new(
        entry.category.trim(),
        entry.subcategory.trim(),
        entry.label.trim(),
    );
    let codes: Vec<String> = entry
        .codes
        .iter()
        .map(|code| code.trim().to_string())
        .filter(|code| !code.is_empty())
        .collect();
    if codes.is_empty() {
        return Err(CatalogueError::EmptySourceCodes { key });
    }
    if !datasets.contains_key(&entry.dataset) {
        return Err(CatalogueError::UnknownDataset {
            key,
            dataset: entry.dataset,
        });
    }
    if entry.transformation.uses_base()
        && entry.base_codes.is_empty()
        && entry.base_filter.is_none()
    {
        warn!(
            variable = %key,
            transformation = %entry.transformation,
            "variable has no base codes; its values will be missing"
        );
    }

    let mut spec = VariableSpec::new(key, codes);
    spec.transformation = entry.transformation;
    spec.base_codes = entry
        .base_codes
        .iter()
        .map(|code| code.trim().to_string())
        .collect();
    spec.base_label = entry.base_label;
    spec.filter = entry.filter;
    spec.base_filter = entry.base_filter;
    spec.format = entry.format;
    spec.classification = entry.classification;
    spec.dataset = DatasetRef {
        available_in: entry.available_in,
        displayed: entry.dataset,
    };
    spec.description = entry.description;
    Ok(spec)
}
