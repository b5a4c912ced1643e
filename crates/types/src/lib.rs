//! Shared data model for the quire report pipeline.
//!
//! These types cross every crate boundary in the workspace: the compiled
//! report artifact and its declared parameter slots, the connection
//! descriptor a caller hands in with each request, the locale model used
//! for parameter coercion and translation, and the rendered document that
//! flows from the fill step into an exporter.

pub mod connection;
pub mod document;
pub mod export;
pub mod locale;
pub mod report;

pub use connection::{ConnectionDescriptor, SubreportDescriptor, SubreportTemplate, DATASET_SENTINEL};
pub use document::{LineKind, RenderedDocument, RenderedLine, RenderedPage};
pub use export::{ExportConfig, HtmlExportConfig, OutputFormat, TextExportConfig, XlsExportConfig};
pub use locale::{Locale, LocaleError};
pub use report::{
    CompiledReport, FieldKind, FieldSpec, ParameterSlot, QueryLanguage, ReportQuery, ValueType,
};

/// A single row produced by a data source: field name to value.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Raw, caller-supplied parameter values keyed by parameter name.
pub type RawParameters = std::collections::BTreeMap<String, serde_json::Value>;
