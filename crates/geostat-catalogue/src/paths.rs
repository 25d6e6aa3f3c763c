//! Catalogue path resolution.

use std::path::PathBuf;

/// Environment variable for overriding the catalogue location.
pub const CATALOGUE_ENV_VAR: &str = "GEOSTAT_CATALOGUE";

/// Default catalogue file.
///
/// Resolution order:
/// 1. `GEOSTAT_CATALOGUE` environment variable
/// 2. `catalogue/catalogue.toml` relative to the workspace root
pub fn default_catalogue_path() -> PathBuf {
    if let Ok(path) = std::env::var(CATALOGUE_ENV_VAR) {
        return PathBuf::from(path);
    }
    bundled_catalogue_path()
}

/// The catalogue shipped with the workspace.
pub fn bundled_catalogue_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../catalogue/catalogue.toml")
}
