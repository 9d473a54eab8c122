use thiserror::Error;

use crate::app::domain::document::DocumentId;
use crate::app::domain::settings::Credential;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(String),

    /// A malformed invoice item line. `line` is 1-based.
    #[error("Invalid input format on line {line} ({content:?}): {reason}")]
    Format {
        line: usize,
        content: String,
        reason: String,
    },

    #[error("Delivery failed: {0}")]
    Delivery(String),

    #[error("{0} not configured")]
    ConfigMissing(Credential),

    #[error("No text selected")]
    EmptySelection,

    #[error("No text to send")]
    NothingToSend,

    #[error("Unknown document {0:?}")]
    UnknownDocument(DocumentId),
}

impl From<minreq::Error> for AppError {
    fn from(e: minreq::Error) -> Self {
        AppError::Http(e.to_string())
    }
}

/// Convenience type alias for Results with AppError
pub type Result<T> = std::result::Result<T, AppError>;
