use serde::{Deserialize, Serialize};

use geostat_model::{ClassificationMethod, VariableKey};

/// A geography/variable choice plus optional overrides of the catalogue
/// defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub geography: String,
    pub variable: VariableKey,
    /// Survey year; defaults to the catalogue setting.
    #[serde(default)]
    pub year: Option<u16>,
    /// Defaults to the catalogue setting.
    #[serde(default)]
    pub class_count: Option<usize>,
    /// Defaults to the variable's own method.
    #[serde(default)]
    pub method: Option<ClassificationMethod>,
}

impl Selection {
    pub fn new(geography: impl Into<String>, variable: VariableKey) -> Self {
        Self {
            geography: geography.into(),
            variable,
            year: None,
            class_count: None,
            method: None,
        }
    }

    #[must_use]
    pub fn with_year(mut self, year: u16) -> Self {
        self.year = Some(year);
        self
    }

    #[must_use]
    pub fn with_class_count(mut self, class_count: usize) -> Self {
        self.class_count = Some(class_count);
        self
    }

    #[must_use]
    pub fn with_method(mut self, method: ClassificationMethod) -> Self {
        self.method = Some(method);
        self
    }
}
