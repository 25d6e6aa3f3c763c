use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde_json::Value;

use geostat_catalogue::{Catalogue, bundled_catalogue_path};
use geostat_cli::cli::{Cli, Command, MapArgs};
use geostat_cli::commands::{map_selection, run_map};
use geostat_cli::summary::{join_summary_table, legend_table};
use geostat_model::ClassIndex;

const ROWS: &str = r#"[
    ["B01001_026E","B01001_001E","state","county","tract"],
    ["2600","5000","21","067","010100"],
    ["1400","3000","21","067","010200"],
    ["1000","2000","21","067","010300"]
]"#;

const FEATURES: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {"type": "Feature", "properties": {"TRACTCE": "010100"}, "geometry": null},
        {"type": "Feature", "properties": {"TRACTCE": "010200"}, "geometry": null},
        {"type": "Feature", "properties": {"TRACTCE": "980100"}, "geometry": null}
    ]
}"#;

fn catalogue() -> Catalogue {
    Catalogue::load(&bundled_catalogue_path()).expect("load bundled catalogue")
}

fn fixtures(dir: &Path) -> (PathBuf, PathBuf) {
    let rows = dir.join("rows.json");
    let features = dir.join("tracts.geojson");
    fs::write(&rows, ROWS).expect("write rows");
    fs::write(&features, FEATURES).expect("write features");
    (rows, features)
}

fn map_args(rows: &Path, features: &Path, extra: &[&str]) -> MapArgs {
    let mut argv = vec![
        "geostat".to_string(),
        "map".to_string(),
        "--geography".to_string(),
        "fayetteCountyTracts".to_string(),
        "--variable".to_string(),
        "Demographics/Age and Gender/Female Population".to_string(),
        "--rows".to_string(),
        rows.display().to_string(),
        "--features".to_string(),
        features.display().to_string(),
        "--class-count".to_string(),
        "2".to_string(),
    ];
    argv.extend(extra.iter().map(|arg| (*arg).to_string()));
    match Cli::try_parse_from(argv).expect("parse map args").command {
        Command::Map(args) => args,
        _ => panic!("expected map command"),
    }
}

#[test]
fn map_classifies_and_joins_saved_tables() {
    let dir = tempfile::tempdir().expect("temp dir");
    let (rows, features) = fixtures(dir.path());
    let result = map_selection(catalogue(), &map_args(&rows, &features, &[])).unwrap();

    assert_eq!(result.features.len(), 3);
    assert_eq!(result.summary.matched, 2);
    assert_eq!(result.summary.no_data, 1);
    assert_eq!(result.summary.unmatched_metrics, vec!["010300".to_string()]);
    assert_eq!(result.breaks.class_count(), 2);
    assert_eq!(result.features[2].class, ClassIndex::NoData);
    let first = result.features[0].value().expect("value for 010100");
    assert!((first - 52.0).abs() < 1e-9);
    assert_eq!(result.legend.entries.len(), result.breaks.class_count());
    assert_eq!(result.legend.no_data.count, 1);
}

#[test]
fn rendered_tables_carry_legend_and_counts() {
    let dir = tempfile::tempdir().expect("temp dir");
    let (rows, features) = fixtures(dir.path());
    let result = map_selection(catalogue(), &map_args(&rows, &features, &[])).unwrap();

    let mut legend = legend_table(&result.legend);
    legend.force_no_tty();
    let legend = legend.to_string();
    assert!(legend.contains("#dbeafe"), "{legend}");
    assert!(legend.contains("#e5e7eb"), "{legend}");
    assert!(legend.contains("No data"), "{legend}");
    assert!(legend.contains('%'), "{legend}");

    let mut summary = join_summary_table(&result.summary);
    summary.force_no_tty();
    let summary = summary.to_string();
    assert!(summary.contains("Matched"), "{summary}");
    assert!(summary.contains("Unmatched metrics"), "{summary}");
}

#[test]
fn map_writes_feature_collection_to_output() {
    let dir = tempfile::tempdir().expect("temp dir");
    let (rows, features) = fixtures(dir.path());
    let output = dir.path().join("map.geojson");
    let output_arg = output.display().to_string();
    run_map(
        catalogue(),
        &map_args(&rows, &features, &["--output", &output_arg]),
    )
    .unwrap();

    let written: Value =
        serde_json::from_str(&fs::read_to_string(&output).expect("read output")).unwrap();
    assert_eq!(written["type"], "FeatureCollection");
    assert_eq!(written["features"].as_array().map(Vec::len), Some(3));
}

#[test]
fn map_reports_unknown_variable() {
    let dir = tempfile::tempdir().expect("temp dir");
    let (rows, features) = fixtures(dir.path());
    let mut args = map_args(&rows, &features, &[]);
    args.variable.label = "Nonexistent".to_string();
    let error = map_selection(catalogue(), &args).unwrap_err();
    assert!(format!("{error:#}").contains("map run failed"));
}

#[test]
fn map_reports_missing_rows_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let (_, features) = fixtures(dir.path());
    let args = map_args(&dir.path().join("absent.json"), &features, &[]);
    assert!(map_selection(catalogue(), &args).is_err());
}

#[test]
fn join_summary_snapshot() {
    let dir = tempfile::tempdir().expect("temp dir");
    let (rows, features) = fixtures(dir.path());
    let result = map_selection(catalogue(), &map_args(&rows, &features, &[])).unwrap();
    insta::assert_json_snapshot!(result.summary, @r#"
    {
      "matched": 2,
      "no_data": 1,
      "unmatched_metrics": [
        "010300"
      ],
      "duplicate_metrics": []
    }
    "#);
}
