use quire_traits::{Exporter, ExporterError};
use quire_types::{ExportConfig, HtmlExportConfig, LineKind, RenderedDocument};
use std::borrow::Cow;
use std::path::Path;

/// Writes each rendered page as an HTML table.
///
/// With an [`ExportConfig::Html`] the given header, footer and inter-page
/// markup are used verbatim; otherwise a minimal standalone page wraps the
/// tables.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlExporter;

impl HtmlExporter {
    pub fn new() -> Self {
        Self
    }

    fn standalone() -> HtmlExportConfig {
        HtmlExportConfig {
            header: Cow::Borrowed(
                "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"></head>\n<body>\n",
            ),
            footer: Cow::Borrowed("</body>\n</html>\n"),
            between_pages: Cow::Borrowed("<hr/>\n"),
        }
    }

    pub fn render(&self, document: &RenderedDocument, config: &HtmlExportConfig) -> String {
        let mut out = String::new();
        out.push_str(&config.header);
        for (i, page) in document.pages.iter().enumerate() {
            if i > 0 {
                out.push_str(&config.between_pages);
            }
            out.push_str("<table class=\"page\">\n");
            for line in &page.lines {
                let (tag, class) = match line.kind {
                    LineKind::Title => ("th", "title"),
                    LineKind::Header => ("th", "header"),
                    LineKind::Section => ("th", "section"),
                    LineKind::Detail => ("td", "detail"),
                };
                out.push_str("<tr class=\"");
                out.push_str(class);
                out.push_str("\">");
                for cell in &line.cells {
                    out.push('<');
                    out.push_str(tag);
                    out.push('>');
                    escape_into(&mut out, cell);
                    out.push_str("</");
                    out.push_str(tag);
                    out.push('>');
                }
                out.push_str("</tr>\n");
            }
            out.push_str("</table>\n");
        }
        out.push_str(&config.footer);
        out
    }
}

fn escape_into(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
}

impl Exporter for HtmlExporter {
    fn export(
        &self,
        document: RenderedDocument,
        config: &ExportConfig,
        destination: &Path,
    ) -> Result<(), ExporterError> {
        let html = match config {
            ExportConfig::Html(html) => self.render(&document, html),
            ExportConfig::Default => self.render(&document, &Self::standalone()),
            other => {
                return Err(ExporterError::Configuration(format!(
                    "HTML exporter cannot use {other:?}"
                )));
            }
        };
        std::fs::write(destination, html)?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "HtmlExporter"
    }
}
