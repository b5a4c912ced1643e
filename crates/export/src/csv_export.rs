use quire_traits::{Exporter, ExporterError};
use quire_types::{ExportConfig, RenderedDocument};
use std::path::Path;

/// Writes every rendered line as one delimited row, ignoring pagination.
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvExporter;

impl CsvExporter {
    pub fn new() -> Self {
        Self
    }
}

fn encoding_error(e: csv::Error) -> ExporterError {
    match e.into_kind() {
        csv::ErrorKind::Io(io) => ExporterError::Io(io),
        other => ExporterError::Encoding(format!("{other:?}")),
    }
}

impl Exporter for CsvExporter {
    fn export(
        &self,
        document: RenderedDocument,
        _config: &ExportConfig,
        destination: &Path,
    ) -> Result<(), ExporterError> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_path(destination)
            .map_err(encoding_error)?;
        for line in document.lines() {
            writer.write_record(&line.cells).map_err(encoding_error)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "CsvExporter"
    }
}
