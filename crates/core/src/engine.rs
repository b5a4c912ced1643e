//! The fill step: records and parameters in, paginated document out.

use crate::params::BoundParameters;
use crate::selector::DataSourceHandle;
use log::debug;
use quire_source::DataSource;
use quire_traits::{ConnectionError, SharedTranslator};
use quire_types::{
    CompiledReport, LineKind, Record, RenderedDocument, RenderedLine, RenderedPage,
};
use serde_json::Value;
use std::fmt::Debug;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FillError {
    #[error("Query failed: {0}")]
    Query(#[from] ConnectionError),

    #[error("Report '{0}' reads from a connection but has no query text")]
    MissingQuery(String),
}

/// Renders a compiled report against its parameters and data.
pub trait FillEngine: Send + Sync + Debug {
    fn fill(
        &self,
        report: &CompiledReport,
        parameters: BoundParameters,
        source: DataSourceHandle,
    ) -> Result<RenderedDocument, FillError>;

    /// Returns a human-readable name for this engine (for logging/debugging).
    fn name(&self) -> &'static str;
}

/// A tabular fill engine.
///
/// Lays out a title, one line per declared scalar parameter, a header of
/// column names and one line per record, then a section for every data
/// source bound as a parameter. Lines are split into pages of
/// `rows_per_page` unless `IS_IGNORE_PAGINATION` is set.
#[derive(Debug, Default, Clone, Copy)]
pub struct BasicFillEngine;

impl BasicFillEngine {
    pub fn new() -> Self {
        Self
    }
}

struct Localizer(Option<SharedTranslator>);

impl Localizer {
    fn text(&self, key: &str) -> String {
        match &self.0 {
            Some(translator) => translator.translate(key),
            None => key.to_string(),
        }
    }
}

fn drain(source: &mut dyn DataSource) -> Vec<Record> {
    std::iter::from_fn(|| source.next()).collect()
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Header plus detail lines; columns come from `declared` or the first record.
fn table(lines: &mut Vec<RenderedLine>, declared: &[String], records: &[Record], localizer: &Localizer) {
    let columns: Vec<String> = if declared.is_empty() {
        records
            .first()
            .map(|r| r.keys().cloned().collect())
            .unwrap_or_default()
    } else {
        declared.to_vec()
    };
    if columns.is_empty() {
        return;
    }
    lines.push(RenderedLine::new(
        LineKind::Header,
        columns.iter().map(|c| localizer.text(c)).collect(),
    ));
    for record in records {
        lines.push(RenderedLine::new(
            LineKind::Detail,
            columns.iter().map(|c| cell(record.get(c))).collect(),
        ));
    }
}

impl FillEngine for BasicFillEngine {
    fn fill(
        &self,
        report: &CompiledReport,
        mut parameters: BoundParameters,
        source: DataSourceHandle,
    ) -> Result<RenderedDocument, FillError> {
        let localizer = Localizer(parameters.translator().cloned());
        let sections = parameters.take_data_sources();

        let records = match source {
            DataSourceHandle::Records(mut records) => drain(records.as_mut()),
            DataSourceHandle::Connection(mut connection) => {
                let query = report
                    .query
                    .as_ref()
                    .map(|q| q.text.trim())
                    .filter(|q| !q.is_empty())
                    .ok_or_else(|| FillError::MissingQuery(report.name.clone()))?;
                connection.query(query)?
            }
        };

        let mut lines = Vec::new();
        let title = report.title.as_deref().unwrap_or(&report.name);
        lines.push(RenderedLine::new(LineKind::Title, vec![localizer.text(title)]));

        for slot in &report.parameters {
            if let Some(text) = parameters.get(&slot.name).and_then(|v| v.display_text()) {
                lines.push(RenderedLine::new(
                    LineKind::Detail,
                    vec![localizer.text(&slot.name), text],
                ));
            }
        }

        let declared: Vec<String> = report.fields.iter().map(|f| f.name.clone()).collect();
        table(&mut lines, &declared, &records, &localizer);

        for (name, mut source) in sections {
            let rows = drain(source.as_mut());
            lines.push(RenderedLine::new(LineKind::Section, vec![localizer.text(&name)]));
            table(&mut lines, &[], &rows, &localizer);
        }

        let per_page = if parameters.ignore_pagination() {
            lines.len().max(1)
        } else {
            report.rows_per_page.max(1)
        };
        let mut document = RenderedDocument::new(report.name.clone());
        document.pages = lines
            .chunks(per_page)
            .map(|chunk| RenderedPage { lines: chunk.to_vec() })
            .collect();
        if document.pages.is_empty() {
            document.pages.push(RenderedPage::default());
        }

        debug!(
            "Filled '{}': {} records, {} pages.",
            report.name,
            records.len(),
            document.page_count()
        );
        Ok(document)
    }

    fn name(&self) -> &'static str {
        "BasicFillEngine"
    }
}
