//! Read-only catalogue of geography layers, survey datasets and variables.
//!
//! The catalogue is a TOML document; see `catalogue/catalogue.toml` at the
//! workspace root for the bundled one.

pub mod catalogue;
pub mod dataset;
pub mod document;
pub mod error;
pub mod paths;
pub mod query;

pub use catalogue::{Catalogue, Settings};
pub use dataset::{DatasetInfo, YearSpan};
pub use error::{CatalogueError, Result};
pub use paths::{CATALOGUE_ENV_VAR, bundled_catalogue_path, default_catalogue_path};
pub use query::{CENSUS_API_BASE, FetchRequest, QueryPlan, RequestRole};
