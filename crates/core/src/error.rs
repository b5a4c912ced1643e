use quire_source::SourceError;
use quire_traits::{CompileError, ConnectionError, ExporterError};
use quire_types::{LocaleError, OutputFormat};
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::engine::FillError;

/// The pipeline stage a [`ReportError`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Compilation,
    ParameterBinding,
    DataSource,
    Fill,
    Export,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Compilation => "compilation",
            Stage::ParameterBinding => "parameter binding",
            Stage::DataSource => "data source",
            Stage::Fill => "fill",
            Stage::Export => "export",
        };
        f.write_str(name)
    }
}

/// The error returned by one report execution.
///
/// The first failing stage aborts the request and its error is returned
/// as-is; nothing is partially written by the pipeline itself.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Compilation failed: {0}")]
    Compilation(#[from] CompileError),

    #[error("Parameter binding failed: {0}")]
    ParameterBinding(#[from] BindingError),

    #[error("Data source setup failed: {0}")]
    DataSource(#[from] DataSourceError),

    #[error("Fill failed: {0}")]
    Fill(#[from] FillError),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),
}

impl ReportError {
    pub fn stage(&self) -> Stage {
        match self {
            ReportError::Compilation(_) => Stage::Compilation,
            ReportError::ParameterBinding(_) => Stage::ParameterBinding,
            ReportError::DataSource(_) => Stage::DataSource,
            ReportError::Fill(_) => Stage::Fill,
            ReportError::Export(_) => Stage::Export,
        }
    }
}

#[derive(Error, Debug)]
pub enum BindingError {
    #[error("Parameter '{parameter}' is not a valid locale: {source}")]
    Locale {
        parameter: String,
        #[source]
        source: LocaleError,
    },

    #[error("Parameter '{parameter}' expects a string, got {found}")]
    NotAString { parameter: String, found: Value },

    #[error("Parameter '{parameter}' expects a number, got {found}")]
    NotANumber { parameter: String, found: Value },

    #[error("Parameter '{parameter}' value {value} cannot be represented as a decimal")]
    OutOfRange { parameter: String, value: String },
}

#[derive(Error, Debug)]
pub enum DataSourceError {
    #[error("Query language 'xpath' needs a 'csv' or 'xml' data file")]
    MissingDataFile,

    #[error("Query language 'sql' needs a 'dsn'")]
    MissingDsn,

    #[error("Query language 'sql' needs a connection provider")]
    NoConnectionProvider,

    #[error("Subreport data file '{path}' is unusable: {source}")]
    Subreport {
        path: PathBuf,
        #[source]
        source: SourceError,
    },

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("Database connection failed: {0}")]
    Connection(#[from] ConnectionError),
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("No exporter registered for {0:?}")]
    Unregistered(OutputFormat),

    #[error("{exporter} failed: {source}")]
    Exporter {
        exporter: &'static str,
        #[source]
        source: ExporterError,
    },
}
