//! quire: a report execution service.
//!
//! The pipeline itself lives in `quire-core`; this crate wraps it in a
//! worker pool ([`ReportService`]) and adds the pieces a deployment needs:
//! a JSON configuration file, request types and database URI handling.
//!
//! ```ignore
//! use quire::{ExecuteRequest, ReportService, ServiceConfig};
//!
//! let config = ServiceConfig::from_file("quire.json")?;
//! let service = ReportService::start(config.executor().build(), &config);
//! let pages = service.execute(ExecuteRequest::new("invoice.json", "invoice.pdf")).await?;
//! ```

pub mod config;
pub mod database;
pub mod error;
pub mod request;
pub mod service;

pub use config::ServiceConfig;
pub use database::{DatabaseSettings, DatabaseUriError};
pub use error::ServiceError;
pub use request::{ExecuteRequest, RenderedOutput};
pub use service::ReportService;

pub use quire_core::{
    BasicFillEngine, CompileCache, ExportDispatcher, ExporterRegistry, FillEngine,
    JsonReportCompiler, ReportError, ReportExecutor, ReportExecutorBuilder, Stage,
};
pub use quire_export::merge_pdfs;
pub use quire_types::{ConnectionDescriptor, OutputFormat, RawParameters, SubreportDescriptor};
