use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("class break {value} is not a finite number")]
    NonFiniteBreak { value: f64 },
    #[error("class breaks must be non-decreasing ({previous} > {next})")]
    DecreasingBreaks { previous: f64, next: f64 },
    #[error("invalid variable key {0:?}: expected category/subcategory/label")]
    InvalidVariableKey(String),
    #[error("unknown {kind}: {value}")]
    UnknownName { kind: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;
