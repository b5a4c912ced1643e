use quire_core::ReportError;
use quire_export::MergeError;
use thiserror::Error;

/// Errors surfaced by the service layer.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("PDF merge failed: {0}")]
    Merge(#[from] MergeError),

    #[error("The report service has shut down")]
    Closed,

    #[error("A report worker failed: {0}")]
    Worker(String),
}

impl From<serde_json::Error> for ServiceError {
    fn from(e: serde_json::Error) -> Self {
        ServiceError::Config(e.to_string())
    }
}
