//! Exporter trait: writes a rendered document to a destination file.

use quire_types::{ExportConfig, RenderedDocument};
use std::fmt::Debug;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExporterError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Exporter does not accept this configuration: {0}")]
    Configuration(String),

    #[error("Encoding failed: {0}")]
    Encoding(String),
}

pub trait Exporter: Send + Sync + Debug {
    /// Writes `document` to `destination`.
    ///
    /// The document is taken by value: a filled report is exported once.
    fn export(
        &self,
        document: RenderedDocument,
        config: &ExportConfig,
        destination: &Path,
    ) -> Result<(), ExporterError>;

    /// Returns a human-readable name for this exporter (for logging/debugging).
    fn name(&self) -> &'static str;
}
