//! The synchronous part of a run: resolve, classify, join.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use geostat_classify::{ColorRamp, Legend, classify};
use geostat_join::{JoinSummary, join};
use geostat_model::{
    ClassBreaks, ClassificationMethod, GeoFeature, GeographyLayer, Metric, RawRow, RenderFeature,
    VariableSpec, feature_collection,
};
use geostat_transform::resolve_all;

use crate::error::Result;
use crate::selection::Selection;

/// Everything the rendering layer needs for one selection.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    pub seq: u64,
    pub selection: Selection,
    pub layer: GeographyLayer,
    pub spec: VariableSpec,
    pub year: u16,
    pub metrics: Vec<Metric>,
    pub breaks: ClassBreaks,
    pub features: Vec<RenderFeature>,
    pub summary: JoinSummary,
    pub legend: Legend,
}

impl PipelineResult {
    /// GeoJSON `FeatureCollection` of the annotated features.
    pub fn feature_collection(&self) -> Value {
        feature_collection(&self.features)
    }
}

/// Inputs of a computation, already fetched.
#[derive(Debug, Clone)]
pub struct ComputeInput<'a> {
    pub spec: &'a VariableSpec,
    pub rows: Vec<RawRow>,
    pub base_rows: Option<Vec<RawRow>>,
    pub features: &'a [GeoFeature],
    pub method: ClassificationMethod,
    pub class_count: usize,
    pub ramp: &'a ColorRamp,
}

/// Output of [`compute`] before it is tagged with a run.
#[derive(Debug, Clone)]
pub struct Computed {
    pub metrics: Vec<Metric>,
    pub breaks: ClassBreaks,
    pub features: Vec<RenderFeature>,
    pub summary: JoinSummary,
    pub legend: Legend,
}

/// Resolves metrics, classifies them and joins them onto the features.
pub fn compute(input: ComputeInput<'_>) -> Result<Computed> {
    let ComputeInput {
        spec,
        mut rows,
        base_rows,
        features,
        method,
        class_count,
        ramp,
    } = input;

    if let Some(base_rows) = base_rows {
        merge_base_rows(&mut rows, &base_rows);
    }
    let metrics = resolve_all(spec, &rows);
    let breaks = classify(&metrics, method, class_count)?;
    let (features, summary) = join(features, &metrics, &breaks);
    let legend = Legend::new(&breaks, ramp, spec.format).with_counts(&features);
    debug!(
        metrics = metrics.len(),
        classes = breaks.class_count(),
        features = features.len(),
        "computed map"
    );
    Ok(Computed {
        metrics,
        breaks,
        features,
        summary,
        legend,
    })
}

/// Adds each base row's values to the primary row of the same geography.
pub fn merge_base_rows(rows: &mut [RawRow], base_rows: &[RawRow]) {
    let by_code: BTreeMap<&str, &RawRow> = base_rows
        .iter()
        .map(|row| (row.geo_code.trim(), row))
        .collect();
    let mut unmatched = 0usize;
    for row in rows.iter_mut() {
        match by_code.get(row.geo_code.trim()) {
            Some(base) => row.merge_base(base),
            None => unmatched += 1,
        }
    }
    if unmatched > 0 {
        debug!(unmatched, "rows without a base row");
    }
}
