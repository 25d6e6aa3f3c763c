use geostat_catalogue::{CatalogueError, RequestRole};
use geostat_classify::ClassifyError;
use geostat_ingest::IngestError;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("configuration error: {0}")]
    Catalogue(#[from] CatalogueError),

    #[error("failed to retrieve {role} rows: {source}")]
    Retrieval {
        role: RequestRole,
        #[source]
        source: IngestError,
    },

    #[error("failed to load features: {0}")]
    Geometry(#[source] IngestError),

    #[error("classification failed: {0}")]
    Classify(#[from] ClassifyError),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
