use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("missing response for question(s) {}", join_ids(.question_ids))]
    MissingResponse { question_ids: Vec<u8> },

    #[error("{field} = {value} is outside range [{min}, {max}]")]
    OutOfRange {
        field: String,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("unknown question id: {0}")]
    UnknownQuestion(u8),

    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("session {0} has already been submitted")]
    AlreadySubmitted(Uuid),
}

fn join_ids(ids: &[u8]) -> String {
    ids.iter()
        .map(u8::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
