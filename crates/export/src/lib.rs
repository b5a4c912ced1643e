//! Reference exporters for rendered reports.
//!
//! Each exporter implements the `Exporter` trait from quire-traits and
//! writes one [`RenderedDocument`](quire_types::RenderedDocument) to a file.
//!
//! ## Available Exporters
//!
//! - [`PdfExporter`]: Paginated PDF via `lopdf`, one PDF page per rendered page
//! - [`HtmlExporter`]: Table markup with configurable header, footer and page separators
//! - [`CsvExporter`]: One delimited row per rendered line
//! - [`TextExporter`]: Fixed-width character pages separated by form feeds
//!
//! Spreadsheet and office formats are not provided here; register external
//! exporters for them.
//!
//! The [`merge_pdfs`] helper concatenates several exported PDFs.

mod csv_export;
mod html;
mod merge;
mod pdf;
mod text;

pub use csv_export::CsvExporter;
pub use html::HtmlExporter;
pub use merge::{merge_pdfs, MergeError};
pub use pdf::PdfExporter;
pub use text::TextExporter;
