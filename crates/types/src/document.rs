//! The paginated output of the fill step.

/// The role a line plays on a page; exporters may style lines by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Title,
    Header,
    Detail,
    /// Opens a nested section, such as a subreport.
    Section,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    pub kind: LineKind,
    pub cells: Vec<String>,
}

impl RenderedLine {
    pub fn new(kind: LineKind, cells: Vec<String>) -> Self {
        Self { kind, cells }
    }

    /// The cells joined by single spaces, for text-oriented exporters.
    pub fn text(&self) -> String {
        self.cells.join(" ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedPage {
    pub lines: Vec<RenderedLine>,
}

/// A filled report: an ordered list of pages.
///
/// Consumed exactly once by an exporter; the pipeline never persists it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub name: String,
    pub pages: Vec<RenderedPage>,
}

impl RenderedDocument {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pages: Vec::new(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Iterates every line of every page in order.
    pub fn lines(&self) -> impl Iterator<Item = &RenderedLine> {
        self.pages.iter().flat_map(|p| p.lines.iter())
    }
}
