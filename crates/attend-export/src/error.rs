use std::error::Error as _;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("report template could not be rendered: {0}")]
    TemplateRender(String),

    #[error("report template is invalid: {0}")]
    TemplateParse(String),

    #[error("failed to serialize report data: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Tera keeps the useful part (missing variable, bad filter) in the source
/// chain, so flatten it into the message.
impl From<tera::Error> for ExportError {
    fn from(e: tera::Error) -> Self {
        let mut message = e.to_string();
        let mut source = e.source();
        while let Some(inner) = source {
            message.push_str(": ");
            message.push_str(&inner.to_string());
            source = inner.source();
        }
        ExportError::TemplateRender(message)
    }
}
