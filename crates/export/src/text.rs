use quire_traits::{Exporter, ExporterError};
use quire_types::{ExportConfig, RenderedDocument, TextExportConfig};
use std::path::Path;

const FORM_FEED: char = '\u{000C}';

/// Lays rendered lines out on a fixed character grid.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextExporter;

impl TextExporter {
    pub const DEFAULT_CONFIG: TextExportConfig = TextExportConfig {
        page_width_chars: 80,
        page_height_chars: 150,
    };

    pub fn new() -> Self {
        Self
    }

    /// Renders the document; a rendered page longer than the configured
    /// height continues on further text pages.
    pub fn render(&self, document: &RenderedDocument, config: &TextExportConfig) -> String {
        let width = config.page_width_chars.max(1) as usize;
        let height = config.page_height_chars.max(1) as usize;

        let mut text_pages: Vec<Vec<String>> = Vec::new();
        for page in &document.pages {
            let rows: Vec<String> = page.lines.iter().map(|l| layout_row(&l.cells, width)).collect();
            if rows.is_empty() {
                text_pages.push(Vec::new());
            }
            for chunk in rows.chunks(height) {
                text_pages.push(chunk.to_vec());
            }
        }

        let mut out = String::new();
        for (i, rows) in text_pages.iter().enumerate() {
            if i > 0 {
                out.push(FORM_FEED);
            }
            for row in rows {
                out.push_str(row.trim_end());
                out.push('\n');
            }
        }
        out
    }
}

/// Splits `width` evenly between the cells, truncating overlong text.
fn layout_row(cells: &[String], width: usize) -> String {
    if cells.is_empty() {
        return String::new();
    }
    let column = (width / cells.len()).max(1);
    let mut row = String::with_capacity(width);
    for cell in cells {
        let mut used = 0;
        for c in cell.chars().take(column.saturating_sub(1).max(1)) {
            row.push(c);
            used += 1;
        }
        row.extend(std::iter::repeat_n(' ', column - used.min(column)));
    }
    row.chars().take(width).collect()
}

impl Exporter for TextExporter {
    fn export(
        &self,
        document: RenderedDocument,
        config: &ExportConfig,
        destination: &Path,
    ) -> Result<(), ExporterError> {
        let text_config = match config {
            ExportConfig::Text(text) => *text,
            ExportConfig::Default => Self::DEFAULT_CONFIG,
            other => {
                return Err(ExporterError::Configuration(format!(
                    "text exporter cannot use {other:?}"
                )));
            }
        };
        std::fs::write(destination, self.render(&document, &text_config))?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "TextExporter"
    }
}
