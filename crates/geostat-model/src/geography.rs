use serde::{Deserialize, Serialize};

/// A selectable geographic layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeographyLayer {
    pub id: String,
    pub label: String,
    /// Kind of unit, e.g. "Census Tracts" or "ZIP Code Tabulation Areas".
    pub geography_type: String,
    /// Property of the polygon features holding the geography code.
    pub geo_code_field: String,
    /// `for=` clause (and its `in=` qualifiers) of the data query.
    pub api_query: String,
    /// Polygon source for this layer.
    pub features_file: String,
}
