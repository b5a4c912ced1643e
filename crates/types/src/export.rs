//! Output formats and their per-format exporter configuration.

use std::borrow::Cow;

/// The exporter kinds the dispatcher can route to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Pdf,
    Html,
    Csv,
    Xls,
    Rtf,
    Odt,
    Ods,
    Txt,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 8] = [
        OutputFormat::Pdf,
        OutputFormat::Html,
        OutputFormat::Csv,
        OutputFormat::Xls,
        OutputFormat::Rtf,
        OutputFormat::Odt,
        OutputFormat::Ods,
        OutputFormat::Txt,
    ];

    /// File extension conventionally used for documents of this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Html => "html",
            OutputFormat::Csv => "csv",
            OutputFormat::Xls => "xls",
            OutputFormat::Rtf => "rtf",
            OutputFormat::Odt => "odt",
            OutputFormat::Ods => "ods",
            OutputFormat::Txt => "txt",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlExportConfig {
    pub header: Cow<'static, str>,
    pub footer: Cow<'static, str>,
    pub between_pages: Cow<'static, str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XlsExportConfig {
    pub remove_empty_space_between_rows: bool,
    pub remove_empty_space_between_columns: bool,
    pub detect_cell_type: bool,
    pub white_page_background: bool,
    pub max_rows_per_sheet: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextExportConfig {
    pub page_width_chars: u32,
    pub page_height_chars: u32,
}

/// Fixed, format-specific exporter configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportConfig {
    /// The exporter's own defaults.
    Default,
    Html(HtmlExportConfig),
    Xls(XlsExportConfig),
    Text(TextExportConfig),
}
