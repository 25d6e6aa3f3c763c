//! Survey table and polygon ingestion.
//!
//! - **table**: Census Data API JSON bodies and CSV tables into raw rows
//! - **geojson**: feature collections into tagged polygon features
//! - **source**: the retrieval and geometry collaborator traits, with
//!   file-backed implementations

pub mod error;
pub mod geojson;
pub mod source;
pub mod table;

pub use error::{IngestError, Result};
pub use geojson::{features_from_value, parse_feature_collection};
pub use source::{FeatureSource, FileFeatureSource, FileRowSource, RowSource};
pub use table::{census_rows, missing_columns, parse_census_json, read_csv_rows};
