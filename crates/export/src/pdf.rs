use log::debug;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use quire_traits::{Exporter, ExporterError};
use quire_types::{ExportConfig, LineKind, RenderedDocument, RenderedLine};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 50.0;
const BODY_SIZE: f32 = 10.0;
const TITLE_SIZE: f32 = 14.0;
const LEADING: f32 = 14.0;

/// Writes an A4 PDF with one page per rendered page, using the standard
/// Helvetica faces.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExporter;

impl PdfExporter {
    pub fn new() -> Self {
        Self
    }

    /// Builds the PDF object graph for `document`.
    pub fn build(&self, document: &RenderedDocument) -> Result<Document, ExporterError> {
        let mut pdf = Document::with_version("1.7");
        let pages_id = pdf.new_object_id();

        let regular_id = pdf.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let bold_id = pdf.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = pdf.add_object(dictionary! {
            "Font" => dictionary! { "F1" => regular_id, "F2" => bold_id },
        });

        let mut page_ids: Vec<ObjectId> = Vec::with_capacity(document.page_count());
        for page in &document.pages {
            let mut operations = Vec::new();
            let mut y = PAGE_HEIGHT - MARGIN;
            for line in &page.lines {
                draw_line(&mut operations, line, y);
                y -= if line.kind == LineKind::Title { TITLE_SIZE + 6.0 } else { LEADING };
            }
            let content = Content { operations }
                .encode()
                .map_err(|e| ExporterError::Encoding(e.to_string()))?;
            let content_id = pdf.add_object(Stream::new(dictionary! {}, content));
            let page_id = pdf.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
                "Contents" => content_id,
                "Resources" => resources_id,
            });
            page_ids.push(page_id);
        }

        let kids: Vec<Object> = page_ids.iter().map(|id| Object::from(*id)).collect();
        pdf.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => i64::try_from(page_ids.len()).unwrap_or(i64::MAX),
            }),
        );
        let catalog_id = pdf.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
        pdf.trailer.set("Root", catalog_id);
        Ok(pdf)
    }
}

fn draw_line(operations: &mut Vec<Operation>, line: &RenderedLine, y: f32) {
    let (font, size) = match line.kind {
        LineKind::Title => ("F2", TITLE_SIZE),
        LineKind::Header | LineKind::Section => ("F2", BODY_SIZE),
        LineKind::Detail => ("F1", BODY_SIZE),
    };
    let columns = line.cells.len().max(1);
    let column_width = (PAGE_WIDTH - 2.0 * MARGIN) / columns as f32;

    for (i, cell) in line.cells.iter().enumerate() {
        if cell.is_empty() {
            continue;
        }
        let x = MARGIN + column_width * i as f32;
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new("Tf", vec![font.into(), size.into()]));
        operations.push(Operation::new("Td", vec![x.into(), y.into()]));
        operations.push(Operation::new("Tj", vec![Object::string_literal(win_ansi(cell))]));
        operations.push(Operation::new("ET", vec![]));
    }
}

/// Maps text onto the single-byte encoding of the standard fonts.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

impl Exporter for PdfExporter {
    fn export(
        &self,
        document: RenderedDocument,
        _config: &ExportConfig,
        destination: &Path,
    ) -> Result<(), ExporterError> {
        let mut pdf = self.build(&document)?;
        let mut writer = BufWriter::new(File::create(destination)?);
        pdf.save_to(&mut writer)
            .map_err(|e| ExporterError::Encoding(e.to_string()))?;
        debug!("Wrote {} PDF pages to '{}'.", document.page_count(), destination.display());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "PdfExporter"
    }
}
