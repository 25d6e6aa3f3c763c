//! Census Data API requests for a variable on a geography layer.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use geostat_model::{GeographyLayer, VariableSpec};
use geostat_transform::{base_query_codes, required_codes};

use crate::catalogue::Catalogue;

pub const CENSUS_API_BASE: &str = "https://api.census.gov/data";

/// Which part of a variable a request retrieves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RequestRole {
    /// Sources, plus bases that share the source filter.
    #[default]
    Primary,
    /// Bases fetched under the variable's base filter.
    Base,
}

impl fmt::Display for RequestRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestRole::Primary => f.write_str("primary"),
            RequestRole::Base => f.write_str("base"),
        }
    }
}

/// One tabular retrieval.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FetchRequest {
    #[serde(default)]
    pub role: RequestRole,
    /// API dataset path, e.g. `acs/acs5`.
    pub dataset: String,
    pub year: u16,
    pub codes: Vec<String>,
    /// `for=` clause including any `&in=` qualifiers.
    pub geography_query: String,
    /// Extra query qualifiers, starting with `&`.
    pub filter: Option<String>,
}

impl FetchRequest {
    pub fn census_url(&self) -> String {
        format!(
            "{CENSUS_API_BASE}/{}/{}?get={}&for={}{}",
            self.year,
            self.dataset,
            self.codes.join(","),
            self.geography_query,
            self.filter.as_deref().unwrap_or("")
        )
    }
}

impl fmt::Display for FetchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.census_url())
    }
}

/// Requests needed to compute a variable: the main query and, for variables
/// with a base filter, a second query for the denominator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryPlan {
    pub primary: FetchRequest,
    pub base: Option<FetchRequest>,
}

impl QueryPlan {
    pub fn new(spec: &VariableSpec, layer: &GeographyLayer, year: u16) -> Self {
        let request = |role, codes, filter: Option<&String>| FetchRequest {
            role,
            dataset: spec.dataset.displayed.clone(),
            year,
            codes,
            geography_query: layer.api_query.clone(),
            filter: filter.cloned(),
        };
        let primary = request(
            RequestRole::Primary,
            required_codes(spec),
            spec.filter.as_ref(),
        );
        let base = base_query_codes(spec)
            .map(|codes| request(RequestRole::Base, codes, spec.base_filter.as_ref()));
        Self { primary, base }
    }

    pub fn requests(&self) -> impl Iterator<Item = &FetchRequest> {
        std::iter::once(&self.primary).chain(self.base.as_ref())
    }
}

impl Catalogue {
    /// Builds the query plan, warning when the dataset descriptor does not
    /// list the year or the layer's geography type.
    pub fn query_plan(&self, spec: &VariableSpec, layer: &GeographyLayer, year: u16) -> QueryPlan {
        if let Some(info) = self.dataset(&spec.dataset.displayed) {
            if !info.covers_year(year) {
                warn!(
                    dataset = %spec.dataset.displayed,
                    year,
                    "dataset is not published for the requested year"
                );
            }
            if !info.covers_geography_type(&layer.geography_type) {
                warn!(
                    dataset = %spec.dataset.displayed,
                    geography_type = %layer.geography_type,
                    "dataset is not published for this geography type"
                );
            }
        }
        QueryPlan::new(spec, layer, year)
    }
}
