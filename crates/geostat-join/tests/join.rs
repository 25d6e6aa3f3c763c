use geostat_join::join;
use geostat_model::{
    ClassBreaks, ClassIndex, ClassificationMethod, GeoFeature, Metric, ParsedValue,
    feature_collection,
};
use serde_json::json;

fn polygon() -> serde_json::Value {
    json!({
        "type": "Polygon",
        "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]
    })
}

fn breaks() -> ClassBreaks {
    ClassBreaks::new(ClassificationMethod::Quantiles, vec![0.0, 50.0, 100.0]).unwrap()
}

#[test]
fn matching_code_gets_its_class() {
    let features = vec![GeoFeature::new("067", polygon())];
    let metrics = vec![Metric::new("067", ParsedValue::Value(42.0))];
    let (rendered, summary) = join(&features, &metrics, &breaks());
    assert_eq!(rendered.len(), 1);
    assert_eq!(rendered[0].class, ClassIndex::Class(0));
    assert_eq!(rendered[0].value(), Some(42.0));
    assert_eq!(summary.matched, 1);
    assert_eq!(summary.no_data, 0);
}

#[test]
fn feature_without_metric_is_no_data() {
    let features = vec![
        GeoFeature::new("067", polygon()),
        GeoFeature::new("049", polygon()),
    ];
    let metrics = vec![Metric::new("067", ParsedValue::Value(42.0))];
    let (rendered, summary) = join(&features, &metrics, &breaks());
    assert_eq!(rendered[1].class, ClassIndex::NoData);
    assert!(rendered[1].metric.is_none());
    assert_eq!(summary.no_data, 1);
}

#[test]
fn codes_match_after_trimming() {
    let features = vec![GeoFeature::new(" 010100", polygon())];
    let metrics = vec![Metric::new("010100 ", ParsedValue::Value(75.0))];
    let (rendered, summary) = join(&features, &metrics, &breaks());
    assert_eq!(rendered[0].class, ClassIndex::Class(1));
    assert!(summary.unmatched_metrics.is_empty());
}

#[test]
fn codes_are_not_normalized_beyond_trimming() {
    let features = vec![GeoFeature::new("67", polygon())];
    let metrics = vec![Metric::new("067", ParsedValue::Value(42.0))];
    let (rendered, summary) = join(&features, &metrics, &breaks());
    assert_eq!(rendered[0].class, ClassIndex::NoData);
    assert_eq!(summary.unmatched_metrics, vec!["067".to_string()]);
}

#[test]
fn output_preserves_feature_order() {
    let codes = ["c", "a", "b"];
    let features: Vec<GeoFeature> = codes
        .iter()
        .map(|code| GeoFeature::new(*code, polygon()))
        .collect();
    let metrics = vec![
        Metric::new("a", ParsedValue::Value(1.0)),
        Metric::new("b", ParsedValue::Value(99.0)),
        Metric::new("c", ParsedValue::Value(50.0)),
    ];
    let (rendered, _) = join(&features, &metrics, &breaks());
    let order: Vec<&str> = rendered.iter().map(|feature| feature.geo_code()).collect();
    assert_eq!(order, codes);
    let classes: Vec<ClassIndex> = rendered.iter().map(|feature| feature.class).collect();
    assert_eq!(
        classes,
        vec![ClassIndex::Class(0), ClassIndex::Class(0), ClassIndex::Class(1)]
    );
}

#[test]
fn empty_breaks_make_everything_no_data() {
    let features = vec![GeoFeature::new("067", polygon())];
    let metrics = vec![Metric::new("067", ParsedValue::Value(42.0))];
    let empty = ClassBreaks::empty(ClassificationMethod::Quantiles);
    let (rendered, summary) = join(&features, &metrics, &empty);
    assert_eq!(rendered[0].class, ClassIndex::NoData);
    assert_eq!(summary.no_data, 1);
}

#[test]
fn geometry_is_shared_not_copied() {
    let features = vec![GeoFeature::new("067", polygon())];
    let metrics = vec![Metric::new("067", ParsedValue::Value(42.0))];
    let (rendered, _) = join(&features, &metrics, &breaks());
    assert!(std::sync::Arc::ptr_eq(
        &features[0].geometry,
        &rendered[0].feature.geometry
    ));
    let collection = feature_collection(&rendered);
    assert_eq!(collection["features"][0]["geometry"], polygon());
}
