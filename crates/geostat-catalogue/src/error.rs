use std::path::PathBuf;

use geostat_model::VariableKey;

#[derive(Debug, thiserror::Error)]
pub enum CatalogueError {
    #[error("failed to read catalogue {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalogue {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("unknown geography: {geography}")]
    UnknownGeography { geography: String },

    #[error("unknown variable: {key}")]
    UnknownVariable { key: VariableKey },

    #[error("variable {key} references unknown dataset {dataset}")]
    UnknownDataset { key: VariableKey, dataset: String },

    #[error("variable {key} has no source codes")]
    EmptySourceCodes { key: VariableKey },

    #[error("duplicate variable: {key}")]
    DuplicateVariable { key: VariableKey },

    #[error("invalid setting {name}: {message}")]
    InvalidSetting { name: &'static str, message: String },
}

impl CatalogueError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogueError>;
