//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use geostat_model::{ClassificationMethod, VariableKey};

#[derive(Parser)]
#[command(
    name = "geostat",
    version,
    about = "Census choropleth data: browse the catalogue, build queries, classify and join",
    long_about = "Browse the variable catalogue, print Census Data API queries, and turn \
                  saved survey tables into classified GeoJSON ready for a choropleth map."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Catalogue file (default: $GEOSTAT_CATALOGUE, then the bundled catalogue).
    #[arg(long = "catalogue", value_name = "PATH", global = true)]
    pub catalogue: Option<PathBuf>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List catalogue variables.
    Variables(VariablesArgs),

    /// List geography layers.
    Geographies,

    /// Print the Census Data API request(s) for a variable.
    Query(QueryArgs),

    /// Classify a saved table and join it onto polygon features.
    Map(MapArgs),

    /// Show the catalogue's summary variables for one geography.
    Summary(SummaryArgs),
}

#[derive(Parser)]
pub struct VariablesArgs {
    /// Only list variables in this category.
    #[arg(long = "category", value_name = "CATEGORY")]
    pub category: Option<String>,
}

#[derive(Parser)]
pub struct QueryArgs {
    /// Geography layer id (see `geostat geographies`).
    #[arg(long = "geography", value_name = "ID")]
    pub geography: String,

    /// Variable as "Category/Subcategory/Label".
    #[arg(long = "variable", value_name = "KEY")]
    pub variable: VariableKey,

    /// Survey year (default: catalogue setting).
    #[arg(long = "year")]
    pub year: Option<u16>,
}

#[derive(Parser)]
pub struct MapArgs {
    #[arg(long = "geography", value_name = "ID")]
    pub geography: String,

    /// Variable as "Category/Subcategory/Label".
    #[arg(long = "variable", value_name = "KEY")]
    pub variable: VariableKey,

    /// Survey table answering the primary request (Census JSON or CSV).
    #[arg(long = "rows", value_name = "FILE")]
    pub rows: PathBuf,

    /// Survey table answering the base-filter request.
    #[arg(long = "base-rows", value_name = "FILE")]
    pub base_rows: Option<PathBuf>,

    /// GeoJSON FeatureCollection of the layer's polygons.
    #[arg(long = "features", value_name = "FILE")]
    pub features: PathBuf,

    /// Number of classes (default: catalogue setting).
    #[arg(long = "class-count", value_name = "N")]
    pub class_count: Option<usize>,

    /// equalInterval, quantiles or naturalBreaks (default: the variable's own).
    #[arg(long = "method", value_name = "METHOD")]
    pub method: Option<ClassificationMethod>,

    #[arg(long = "year")]
    pub year: Option<u16>,

    /// Write the annotated FeatureCollection here instead of stdout.
    #[arg(long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Parser)]
pub struct SummaryArgs {
    #[arg(long = "geography", value_name = "ID")]
    pub geography: String,

    /// Geography code, e.g. a tract code such as 010100.
    #[arg(long = "code", value_name = "CODE")]
    pub code: String,

    /// Survey table holding every summary variable's codes.
    #[arg(long = "rows", value_name = "FILE")]
    pub rows: PathBuf,

    #[arg(long = "base-rows", value_name = "FILE")]
    pub base_rows: Option<PathBuf>,

    #[arg(long = "year")]
    pub year: Option<u16>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
