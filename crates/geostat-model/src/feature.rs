use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::sync::Arc;

use crate::breaks::ClassIndex;
use crate::value::ParsedValue;

/// A polygon from the geometry collaborator, tagged with its geography code.
///
/// The geometry is shared, never copied or modified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoFeature {
    pub geo_code: String,
    pub geometry: Arc<Value>,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl GeoFeature {
    pub fn new(geo_code: impl Into<String>, geometry: Value) -> Self {
        Self {
            geo_code: geo_code.into(),
            geometry: Arc::new(geometry),
            properties: Map::new(),
        }
    }
}

/// A feature annotated with its computed metric and class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFeature {
    pub feature: GeoFeature,
    /// `None` when no metric matched the feature's geography code.
    pub metric: Option<ParsedValue>,
    pub class: ClassIndex,
}

impl RenderFeature {
    pub fn geo_code(&self) -> &str {
        &self.feature.geo_code
    }

    pub fn value(&self) -> Option<f64> {
        self.metric.as_ref().and_then(ParsedValue::value)
    }

    pub fn is_missing(&self) -> bool {
        self.value().is_none()
    }

    /// GeoJSON `Feature` with the annotation merged into its properties.
    pub fn to_geojson(&self) -> Value {
        let mut properties = self.feature.properties.clone();
        properties.insert("geoCode".to_string(), json!(self.feature.geo_code));
        properties.insert("value".to_string(), json!(self.value()));
        properties.insert("classIndex".to_string(), json!(self.class.index()));
        properties.insert("missing".to_string(), json!(self.is_missing()));
        let reason = match &self.metric {
            Some(metric) => metric.missing_reason().map(ToString::to_string),
            None => Some("no matching record".to_string()),
        };
        properties.insert("missingReason".to_string(), json!(reason));
        json!({
            "type": "Feature",
            "geometry": self.feature.geometry.as_ref(),
            "properties": properties,
        })
    }
}

/// GeoJSON `FeatureCollection` of annotated features, in order.
pub fn feature_collection(features: &[RenderFeature]) -> Value {
    json!({
        "type": "FeatureCollection",
        "features": features.iter().map(RenderFeature::to_geojson).collect::<Vec<_>>(),
    })
}
