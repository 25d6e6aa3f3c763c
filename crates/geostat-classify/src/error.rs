use geostat_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("class count must be at least 1")]
    ZeroClassCount,
    #[error("invalid color {value:?}: {message}")]
    InvalidColor { value: String, message: String },
    #[error(transparent)]
    Model(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, ClassifyError>;
