use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::value::{ParsedValue, RawValue};
use crate::variable::BASE_KEY_SUFFIX;

/// Raw field values for one geography, keyed by source/base code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    pub geo_code: String,
    pub values: BTreeMap<String, RawValue>,
}

impl RawRow {
    pub fn new(geo_code: impl Into<String>) -> Self {
        Self {
            geo_code: geo_code.into(),
            values: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_value(mut self, code: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.values.insert(code.into(), value.into());
        self
    }

    pub fn insert(&mut self, code: impl Into<String>, value: impl Into<RawValue>) {
        self.values.insert(code.into(), value.into());
    }

    pub fn get(&self, code: &str) -> Option<&RawValue> {
        self.values.get(code)
    }

    /// Copy every value of `base` into this row under `code@base` keys.
    pub fn merge_base(&mut self, base: &RawRow) {
        for (code, value) in &base.values {
            self.values
                .insert(format!("{code}{BASE_KEY_SUFFIX}"), value.clone());
        }
    }
}

/// The derived statistic for one geography under one variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub geo_code: String,
    pub value: ParsedValue,
}

impl Metric {
    pub fn new(geo_code: impl Into<String>, value: ParsedValue) -> Self {
        Self {
            geo_code: geo_code.into(),
            value,
        }
    }

    pub fn value(&self) -> Option<f64> {
        self.value.value()
    }
}

/// Finite values of a metric set, in input order.
pub fn present_values(metrics: &[Metric]) -> Vec<f64> {
    metrics.iter().filter_map(Metric::value).collect()
}
