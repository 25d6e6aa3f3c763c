//! GeoJSON feature collections.

use std::path::Path;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use geostat_model::GeoFeature;

use crate::error::{IngestError, Result};

fn invalid(origin: &Path, message: impl Into<String>) -> IngestError {
    IngestError::InvalidFeatures {
        path: origin.to_path_buf(),
        message: message.into(),
    }
}

/// Parses a `FeatureCollection`, tagging each feature with the value of its
/// `geo_code_field` property.
///
/// Features without that property cannot be joined and are skipped.
pub fn parse_feature_collection(
    contents: &str,
    geo_code_field: &str,
    origin: &Path,
) -> Result<Vec<GeoFeature>> {
    let value: Value = serde_json::from_str(contents).map_err(|e| IngestError::Json {
        path: origin.to_path_buf(),
        source: e,
    })?;
    features_from_value(value, geo_code_field, origin)
}

pub fn features_from_value(
    value: Value,
    geo_code_field: &str,
    origin: &Path,
) -> Result<Vec<GeoFeature>> {
    let Value::Object(mut collection) = value else {
        return Err(invalid(origin, "expected a JSON object"));
    };
    match collection.get("type").and_then(Value::as_str) {
        Some("FeatureCollection") => {}
        Some(other) => {
            return Err(invalid(
                origin,
                format!("expected a FeatureCollection, found {other}"),
            ));
        }
        None => return Err(invalid(origin, "missing type")),
    }
    let Some(Value::Array(raw_features)) = collection.remove("features") else {
        return Err(invalid(origin, "missing features array"));
    };

    let total = raw_features.len();
    let mut features = Vec::with_capacity(total);
    let mut skipped = 0usize;
    for (idx, raw) in raw_features.into_iter().enumerate() {
        let Value::Object(mut raw) = raw else {
            return Err(invalid(origin, format!("feature {idx} is not an object")));
        };
        let properties = match raw.remove("properties") {
            Some(Value::Object(properties)) => properties,
            _ => Map::new(),
        };
        let Some(geo_code) = property_code(&properties, geo_code_field) else {
            skipped += 1;
            continue;
        };
        let geometry = raw.remove("geometry").unwrap_or(Value::Null);
        let mut feature = GeoFeature::new(geo_code, geometry);
        feature.properties = properties;
        features.push(feature);
    }

    if skipped > 0 {
        warn!(
            path = %origin.display(),
            field = geo_code_field,
            skipped,
            "features without a geography code were skipped"
        );
    }
    debug!(
        path = %origin.display(),
        features = features.len(),
        total,
        "parsed feature collection"
    );
    Ok(features)
}

fn property_code(properties: &Map<String, Value>, field: &str) -> Option<String> {
    match properties.get(field)? {
        Value::String(code) if !code.trim().is_empty() => Some(code.trim().to_string()),
        Value::Number(code) => Some(code.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tags_features_by_field() {
        let collection = json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": {"TRACTCE": "010100", "NAME": "1.01"},
                    "geometry": {"type": "Point", "coordinates": [-84.5, 38.0]}
                },
                {
                    "type": "Feature",
                    "properties": {"NAME": "unnamed"},
                    "geometry": null
                }
            ]
        });
        let features =
            features_from_value(collection, "TRACTCE", Path::new("tracts.geojson")).unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].geo_code, "010100");
        assert_eq!(features[0].properties["NAME"], json!("1.01"));
        assert_eq!(features[0].geometry["type"], json!("Point"));
    }

    #[test]
    fn rejects_other_geojson_types() {
        let err = features_from_value(
            json!({"type": "Feature", "properties": {}}),
            "GEOID",
            Path::new("msa.geojson"),
        )
        .unwrap_err();
        assert!(matches!(err, IngestError::InvalidFeatures { .. }));
    }
}
