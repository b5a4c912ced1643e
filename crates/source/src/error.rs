use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to read data file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed delimited data: {0}")]
    Csv(#[from] csv::Error),

    #[error("Malformed hierarchical data: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("Record path '{0}' must be absolute, e.g. /data/record")]
    RecordPath(String),

    #[error("Field '{field}' value '{value}' does not match pattern '{pattern}'")]
    Pattern {
        field: String,
        value: String,
        pattern: String,
    },
}
