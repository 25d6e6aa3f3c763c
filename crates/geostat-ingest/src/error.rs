use std::path::PathBuf;

use geostat_catalogue::RequestRole;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("invalid table {path}: {message}")]
    InvalidTable { path: PathBuf, message: String },

    #[error("invalid feature collection {path}: {message}")]
    InvalidFeatures { path: PathBuf, message: String },

    #[error("no {role} table configured")]
    MissingTable { role: RequestRole },

    #[error("source unavailable: {message}")]
    Unavailable { message: String },
}

impl IngestError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_table(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::InvalidTable {
            path: path.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
