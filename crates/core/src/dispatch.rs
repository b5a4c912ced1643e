//! Output-format routing: token to exporter kind and fixed configuration.

use crate::error::ExportError;
use log::{debug, info};
use quire_export::{CsvExporter, HtmlExporter, PdfExporter, TextExporter};
use quire_traits::Exporter;
use quire_types::{
    ExportConfig, HtmlExportConfig, OutputFormat, RenderedDocument, TextExportConfig,
    XlsExportConfig,
};
use std::borrow::Cow;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// An output-format token and where it leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRoute {
    pub token: &'static str,
    pub format: OutputFormat,
    pub config: ExportConfig,
}

const EMPTY_HTML: HtmlExportConfig = HtmlExportConfig {
    header: Cow::Borrowed(""),
    footer: Cow::Borrowed(""),
    between_pages: Cow::Borrowed(""),
};

const SPREADSHEET: XlsExportConfig = XlsExportConfig {
    remove_empty_space_between_rows: true,
    remove_empty_space_between_columns: true,
    detect_cell_type: true,
    white_page_background: true,
    max_rows_per_sheet: 65535,
};

const PLAIN_TEXT: TextExportConfig = TextExportConfig {
    page_width_chars: 80,
    page_height_chars: 150,
};

/// Every recognised token. Anything else is routed like `pdf`.
pub static EXPORT_ROUTES: &[ExportRoute] = &[
    ExportRoute { token: "html", format: OutputFormat::Html, config: ExportConfig::Html(EMPTY_HTML) },
    ExportRoute { token: "csv", format: OutputFormat::Csv, config: ExportConfig::Default },
    ExportRoute { token: "xls", format: OutputFormat::Xls, config: ExportConfig::Xls(SPREADSHEET) },
    ExportRoute { token: "rtf", format: OutputFormat::Rtf, config: ExportConfig::Default },
    ExportRoute { token: "odt", format: OutputFormat::Odt, config: ExportConfig::Default },
    ExportRoute { token: "ods", format: OutputFormat::Ods, config: ExportConfig::Default },
    ExportRoute { token: "txt", format: OutputFormat::Txt, config: ExportConfig::Text(PLAIN_TEXT) },
    ExportRoute { token: "pdf", format: OutputFormat::Pdf, config: ExportConfig::Default },
];

static PDF_FALLBACK: ExportRoute = ExportRoute {
    token: "pdf",
    format: OutputFormat::Pdf,
    config: ExportConfig::Default,
};

/// Looks up the route for `token`, case-insensitively.
pub fn route_for(token: &str) -> &'static ExportRoute {
    match EXPORT_ROUTES.iter().find(|r| r.token.eq_ignore_ascii_case(token)) {
        Some(route) => route,
        None => {
            debug!("Unrecognised output format '{token}', falling back to PDF.");
            &PDF_FALLBACK
        }
    }
}

/// Exporters by output format.
#[derive(Debug, Clone, Default)]
pub struct ExporterRegistry {
    exporters: HashMap<OutputFormat, Arc<dyn Exporter>>,
}

impl ExporterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the bundled PDF, HTML, CSV and text exporters.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(OutputFormat::Pdf, Arc::new(PdfExporter::new()));
        registry.register(OutputFormat::Html, Arc::new(HtmlExporter::new()));
        registry.register(OutputFormat::Csv, Arc::new(CsvExporter::new()));
        registry.register(OutputFormat::Txt, Arc::new(TextExporter::new()));
        registry
    }

    pub fn register(&mut self, format: OutputFormat, exporter: Arc<dyn Exporter>) -> &mut Self {
        self.exporters.insert(format, exporter);
        self
    }

    pub fn get(&self, format: OutputFormat) -> Option<&Arc<dyn Exporter>> {
        self.exporters.get(&format)
    }
}

#[derive(Debug, Clone)]
pub struct ExportDispatcher {
    registry: ExporterRegistry,
}

impl ExportDispatcher {
    pub fn new(registry: ExporterRegistry) -> Self {
        Self { registry }
    }

    /// Exports `document` in the format named by `token` and returns its page
    /// count.
    pub fn export(
        &self,
        document: RenderedDocument,
        token: &str,
        destination: &Path,
    ) -> Result<usize, ExportError> {
        let route = route_for(token);
        let exporter = self
            .registry
            .get(route.format)
            .ok_or(ExportError::Unregistered(route.format))?;

        let pages = document.page_count();
        exporter
            .export(document, &route.config, destination)
            .map_err(|source| ExportError::Exporter {
                exporter: exporter.name(),
                source,
            })?;
        info!(
            "Exported {} pages with {} to '{}'.",
            pages,
            exporter.name(),
            destination.display()
        );
        Ok(pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_traits::ExporterError;
    use quire_types::RenderedPage;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct Capture {
        configs: Mutex<Vec<ExportConfig>>,
    }

    impl Exporter for Capture {
        fn export(&self, _: RenderedDocument, config: &ExportConfig, _: &Path) -> Result<(), ExporterError> {
            self.configs.lock().unwrap().push(config.clone());
            Ok(())
        }

        fn name(&self) -> &'static str {
            "Capture"
        }
    }

    fn document(pages: usize) -> RenderedDocument {
        let mut document = RenderedDocument::new("r");
        document.pages = vec![RenderedPage::default(); pages];
        document
    }

    #[test]
    fn tokens_are_case_insensitive() {
        assert_eq!(route_for("HTML").format, OutputFormat::Html);
        assert_eq!(route_for("Xls").config, ExportConfig::Xls(SPREADSHEET));
        assert_eq!(route_for("txt").config, ExportConfig::Text(PLAIN_TEXT));
    }

    #[test]
    fn unknown_tokens_fall_back_to_pdf() {
        for token in ["docx", "", "p d f"] {
            let route = route_for(token);
            assert_eq!(route.format, OutputFormat::Pdf);
            assert_eq!(route.config, ExportConfig::Default);
        }
    }

    #[test]
    fn every_format_has_a_route() {
        for format in OutputFormat::ALL {
            assert!(EXPORT_ROUTES.iter().any(|r| r.format == format), "{format:?}");
            assert_eq!(route_for(format.extension()).format, format);
        }
    }

    #[test]
    fn html_gets_empty_markup_and_page_count_returned() {
        let capture = Arc::new(Capture::default());
        let mut registry = ExporterRegistry::new();
        registry.register(OutputFormat::Html, capture.clone());

        let pages = ExportDispatcher::new(registry)
            .export(document(3), "html", Path::new("unused.html"))
            .unwrap();
        assert_eq!(pages, 3);
        assert_eq!(capture.configs.lock().unwrap().as_slice(), &[ExportConfig::Html(EMPTY_HTML)]);
    }

    #[test]
    fn unregistered_kind_is_an_error() {
        let result = ExportDispatcher::new(ExporterRegistry::with_builtin())
            .export(document(1), "xls", Path::new("unused.xls"));
        assert!(matches!(result, Err(ExportError::Unregistered(OutputFormat::Xls))));
    }
}
