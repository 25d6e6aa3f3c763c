//! Geography-code join of metrics onto polygon features.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use geostat_model::{ClassBreaks, ClassIndex, GeoFeature, Metric, ParsedValue, RenderFeature};

/// Counts and mismatches observed while joining.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinSummary {
    /// Features that received a present value.
    pub matched: usize,
    /// Features classed as no-data, matched or not.
    pub no_data: usize,
    /// Metric codes with no feature; these metrics are dropped.
    pub unmatched_metrics: Vec<String>,
    /// Metric codes seen more than once; the first occurrence is used.
    pub duplicate_metrics: Vec<String>,
}

impl JoinSummary {
    pub fn has_mismatches(&self) -> bool {
        !self.unmatched_metrics.is_empty() || !self.duplicate_metrics.is_empty()
    }
}

/// Annotates each feature with its metric and class.
///
/// Codes are compared exactly after trimming surrounding whitespace. The
/// output keeps the feature order; features without a metric, or whose
/// metric is missing, get [`ClassIndex::NoData`].
pub fn join(
    features: &[GeoFeature],
    metrics: &[Metric],
    breaks: &ClassBreaks,
) -> (Vec<RenderFeature>, JoinSummary) {
    let mut summary = JoinSummary::default();
    let mut by_code: BTreeMap<&str, &ParsedValue> = BTreeMap::new();
    for metric in metrics {
        let code = metric.geo_code.trim();
        if by_code.contains_key(code) {
            summary.duplicate_metrics.push(code.to_string());
        } else {
            by_code.insert(code, &metric.value);
        }
    }

    let mut used: BTreeMap<&str, bool> = by_code.keys().map(|code| (*code, false)).collect();
    let rendered: Vec<RenderFeature> = features
        .iter()
        .map(|feature| {
            let code = feature.geo_code.trim();
            let metric = by_code.get(code).map(|value| (*value).clone());
            if let Some(seen) = used.get_mut(code) {
                *seen = true;
            }
            let class = metric
                .as_ref()
                .and_then(ParsedValue::value)
                .and_then(|value| breaks.class_of(value))
                .map_or(ClassIndex::NoData, ClassIndex::Class);
            if class.is_no_data() {
                summary.no_data += 1;
            } else {
                summary.matched += 1;
            }
            RenderFeature {
                feature: feature.clone(),
                metric,
                class,
            }
        })
        .collect();

    summary.unmatched_metrics = used
        .into_iter()
        .filter(|(_, seen)| !seen)
        .map(|(code, _)| code.to_string())
        .collect();

    if !summary.unmatched_metrics.is_empty() {
        warn!(
            count = summary.unmatched_metrics.len(),
            codes = ?summary.unmatched_metrics,
            "metrics without a matching feature were dropped"
        );
    }
    if !summary.duplicate_metrics.is_empty() {
        warn!(
            codes = ?summary.duplicate_metrics,
            "duplicate metric codes, keeping the first"
        );
    }
    debug!(
        features = rendered.len(),
        matched = summary.matched,
        no_data = summary.no_data,
        "joined metrics onto features"
    );
    (rendered, summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geostat_model::{ClassificationMethod, MissingReason};
    use serde_json::json;

    fn breaks() -> ClassBreaks {
        ClassBreaks::new(ClassificationMethod::EqualInterval, vec![0.0, 50.0, 100.0]).unwrap()
    }

    #[test]
    fn duplicate_metric_keeps_first() {
        let features = vec![GeoFeature::new("067", json!(null))];
        let metrics = vec![
            Metric::new("067", ParsedValue::Value(10.0)),
            Metric::new("067", ParsedValue::Value(90.0)),
        ];
        let (rendered, summary) = join(&features, &metrics, &breaks());
        assert_eq!(rendered[0].value(), Some(10.0));
        assert_eq!(summary.duplicate_metrics, vec!["067".to_string()]);
        assert!(summary.has_mismatches());
    }

    #[test]
    fn missing_metric_is_no_data_but_keeps_reason() {
        let features = vec![GeoFeature::new("067", json!(null))];
        let metrics = vec![Metric::new(
            "067",
            ParsedValue::missing(MissingReason::ZeroDenominator),
        )];
        let (rendered, summary) = join(&features, &metrics, &breaks());
        assert_eq!(rendered[0].class, ClassIndex::NoData);
        assert_eq!(
            rendered[0].metric.as_ref().and_then(ParsedValue::missing_reason),
            Some(&MissingReason::ZeroDenominator)
        );
        assert_eq!(summary.no_data, 1);
        assert!(summary.unmatched_metrics.is_empty());
    }
}
