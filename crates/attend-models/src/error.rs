use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("no trainable data: {0}")]
    NoTrainableData(String),

    #[error("missing column: {0}")]
    MissingColumn(String),

    #[error("invalid value for column '{column}' on line {line}: {reason}")]
    InvalidValue {
        line: usize,
        column: String,
        reason: String,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("fit failed: {0}")]
    Fit(String),

    #[error("model has not been fitted")]
    NotFitted,

    #[error("shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },
}

impl From<aprender::AprenderError> for ModelError {
    fn from(e: aprender::AprenderError) -> Self {
        ModelError::Fit(e.to_string())
    }
}
