//! Retrieval and geometry collaborators.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};

use geostat_catalogue::{FetchRequest, RequestRole};
use geostat_model::{GeoFeature, GeographyLayer, RawRow};

use crate::error::{IngestError, Result};
use crate::geojson::parse_feature_collection;
use crate::table::{missing_columns, parse_census_json, read_csv_rows};

/// Fetches survey rows for a request.
///
/// Timeouts and retries belong to implementations.
#[async_trait]
pub trait RowSource: Send + Sync {
    async fn fetch_rows(&self, request: &FetchRequest) -> Result<Vec<RawRow>>;
}

/// Loads the polygon features of a geography layer.
#[async_trait]
pub trait FeatureSource: Send + Sync {
    async fn load_features(&self, layer: &GeographyLayer) -> Result<Vec<GeoFeature>>;
}

async fn read_file(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| IngestError::io(path, e))
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

/// Serves saved survey tables from disk.
///
/// `.csv` files are read as CSV; anything else as a Census API JSON body.
#[derive(Debug, Clone)]
pub struct FileRowSource {
    primary: PathBuf,
    base: Option<PathBuf>,
}

impl FileRowSource {
    pub fn new(primary: impl Into<PathBuf>) -> Self {
        Self {
            primary: primary.into(),
            base: None,
        }
    }

    /// Table answering base-filter requests.
    #[must_use]
    pub fn with_base(mut self, base: impl Into<PathBuf>) -> Self {
        self.base = Some(base.into());
        self
    }

    fn path_for(&self, role: RequestRole) -> Result<&Path> {
        match role {
            RequestRole::Primary => Ok(&self.primary),
            RequestRole::Base => self
                .base
                .as_deref()
                .ok_or(IngestError::MissingTable { role }),
        }
    }
}

#[async_trait]
impl RowSource for FileRowSource {
    async fn fetch_rows(&self, request: &FetchRequest) -> Result<Vec<RawRow>> {
        let path = self.path_for(request.role)?;
        debug!(
            role = %request.role,
            path = %path.display(),
            url = %request.census_url(),
            "serving request from file"
        );
        let rows = if is_csv(path) {
            let path = path.to_path_buf();
            tokio::task::spawn_blocking(move || read_csv_rows(&path, None))
                .await
                .map_err(|e| IngestError::Unavailable {
                    message: e.to_string(),
                })??
        } else {
            parse_census_json(&read_file(path).await?, path)?
        };
        let missing = missing_columns(&rows, &request.codes);
        if !rows.is_empty() && !missing.is_empty() {
            warn!(
                path = %path.display(),
                codes = ?missing,
                "table lacks requested codes"
            );
        }
        Ok(rows)
    }
}

/// Loads GeoJSON feature collections from disk.
#[derive(Debug, Clone)]
pub struct FileFeatureSource {
    location: FeatureLocation,
}

#[derive(Debug, Clone)]
enum FeatureLocation {
    /// Resolve each layer's `features_file` under this directory.
    Directory(PathBuf),
    /// Use this file whatever the layer.
    File(PathBuf),
}

impl FileFeatureSource {
    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            location: FeatureLocation::Directory(dir.into()),
        }
    }

    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            location: FeatureLocation::File(path.into()),
        }
    }

    pub fn path_for(&self, layer: &GeographyLayer) -> PathBuf {
        match &self.location {
            FeatureLocation::Directory(dir) => dir.join(&layer.features_file),
            FeatureLocation::File(path) => path.clone(),
        }
    }
}

#[async_trait]
impl FeatureSource for FileFeatureSource {
    async fn load_features(&self, layer: &GeographyLayer) -> Result<Vec<GeoFeature>> {
        let path = self.path_for(layer);
        let contents = read_file(&path).await?;
        parse_feature_collection(&contents, &layer.geo_code_field, &path)
    }
}
