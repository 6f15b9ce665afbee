use thiserror::Error;

use attend_core::error::CoreError;

use crate::scoring::ValidationError;

#[derive(Debug, Error)]
pub enum InstrumentError {
    #[error("unknown instrument: {0}")]
    UnknownInstrument(String),

    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("inconsistent scores: {0}")]
    InvalidScores(String),

    #[error("invalid risk rules: {0}")]
    InvalidRules(String),

    #[error(transparent)]
    Input(#[from] CoreError),
}
