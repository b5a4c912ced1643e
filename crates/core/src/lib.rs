//! The report execution pipeline.
//!
//! A [`ReportExecutor`] turns a template path, a [`ConnectionDescriptor`], an
//! output path and raw parameters into an exported document:
//!
//! 1. [`CompileCache`] recompiles the template when its artifact is missing or stale.
//! 2. [`ParameterBinder`] coerces declared locale and decimal parameters and
//!    creates the request's translator.
//! 3. [`SubreportAssembler`] compiles subreport templates and binds their data.
//! 4. [`DataSourceSelector`] picks the row source from the query language.
//! 5. A [`FillEngine`] renders the pages.
//! 6. [`ExportDispatcher`] routes the output token to an exporter.
//!
//! [`ConnectionDescriptor`]: quire_types::ConnectionDescriptor

mod binder;
mod cache;
mod compiler;
mod dispatch;
mod engine;
mod error;
mod executor;
mod params;
mod selector;
mod subreport;

pub use binder::{Binding, ParameterBinder};
pub use cache::{ARTIFACT_EXTENSION, CompileCache, CompileOutcome};
pub use compiler::{JsonReportCompiler, ReportDesign};
pub use dispatch::{EXPORT_ROUTES, ExportDispatcher, ExportRoute, ExporterRegistry, route_for};
pub use engine::{BasicFillEngine, FillEngine, FillError};
pub use error::{BindingError, DataSourceError, ExportError, ReportError, Stage};
pub use executor::{ReportExecutor, ReportExecutorBuilder};
pub use params::{
    BoundParameters, IGNORE_PAGINATION_PARAMETER, ParameterValue, TRANSLATOR_PARAMETER,
};
pub use selector::{DataSourceHandle, DataSourceSelector};
pub use subreport::SubreportAssembler;
