use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;

use geostat_catalogue::{Catalogue, bundled_catalogue_path};
use geostat_cli::cli::{Cli, Command, SummaryArgs};
use geostat_cli::commands::geography_summary;
use geostat_cli::summary::geography_summary_table;

const ROWS: &str = r#"[
    ["B01001_001E","B19013_001E","B15003_001E","B15003_022E","B15003_023E","B15003_024E","B15003_025E","S2701_C05_001E","B25077_001E","B24080_001E","B24080_005E","B24080_010E","B24080_015E","B24080_020E","state","county","tract"],
    ["5000","61234","3200","800","300","100","50","6.8","215400","2500","50","100","40","60","21","067","010100"],
    ["3000","48000","2000","200","100","50","10","-666666666","180000","1500","20","30","10","15","21","067","010200"]
]"#;

fn catalogue() -> Catalogue {
    Catalogue::load(&bundled_catalogue_path()).expect("load bundled catalogue")
}

fn summary_args(rows: &Path, code: &str) -> SummaryArgs {
    let argv = vec![
        "geostat".to_string(),
        "summary".to_string(),
        "--geography".to_string(),
        "fayetteCountyTracts".to_string(),
        "--code".to_string(),
        code.to_string(),
        "--rows".to_string(),
        rows.display().to_string(),
    ];
    match Cli::try_parse_from(argv).expect("parse summary args").command {
        Command::Summary(args) => args,
        _ => panic!("expected summary command"),
    }
}

fn rows_file(dir: &Path) -> PathBuf {
    let rows = dir.join("rows.json");
    fs::write(&rows, ROWS).expect("write rows");
    rows
}

#[test]
fn summary_formats_each_variable_for_one_tract() {
    let dir = tempfile::tempdir().expect("temp dir");
    let rows = rows_file(dir.path());
    let summary = geography_summary(catalogue(), &summary_args(&rows, "010100")).unwrap();

    let formatted: Vec<String> = summary.entries.iter().map(|entry| entry.formatted()).collect();
    assert_eq!(
        formatted,
        vec!["5,000", "$61,234", "39.1%", "6.8%", "$215,400", "10.0%"]
    );

    let mut table = geography_summary_table(&summary);
    table.force_no_tty();
    let table = table.to_string();
    assert!(table.contains("Median Household Income"), "{table}");
    assert!(table.contains("$215,400"), "{table}");
}

#[test]
fn summary_marks_annotated_values_as_no_data() {
    let dir = tempfile::tempdir().expect("temp dir");
    let rows = rows_file(dir.path());
    let summary = geography_summary(catalogue(), &summary_args(&rows, "010200")).unwrap();
    let without_insurance = summary
        .entry("Without Health Insurance")
        .expect("insurance entry");
    assert_eq!(without_insurance.formatted(), "No data");
    assert!(without_insurance.value.is_missing());
}

#[test]
fn summary_reports_missing_rows_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let args = summary_args(&dir.path().join("absent.json"), "010100");
    let error = geography_summary(catalogue(), &args).unwrap_err();
    assert!(format!("{error:#}").contains("summary of fayetteCountyTracts 010100 failed"));
}
