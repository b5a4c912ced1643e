//! Delimited-file data source with optional translation of text cells.

use crate::{DataSource, SourceError};
use log::debug;
use quire_traits::SharedTranslator;
use quire_types::Record;
use serde_json::Value;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Reads a UTF-8, comma-separated file whose first row names the fields.
///
/// When a translator is attached every cell is passed through it as a
/// lookup key on the way out, so exporting the same data file in several
/// languages only needs a different translator. Cells without a translation
/// come out unchanged. Without a translator no localization happens.
#[derive(Debug)]
pub struct CsvDataSource {
    records: std::vec::IntoIter<Record>,
    len: usize,
    translator: Option<SharedTranslator>,
}

impl CsvDataSource {
    pub fn open(
        path: impl AsRef<Path>,
        translator: Option<SharedTranslator>,
    ) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let source = Self::from_reader(file, translator)?;
        debug!("Read {} records from '{}'.", source.len, path.display());
        Ok(source)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        translator: Option<SharedTranslator>,
    ) -> Result<Self, SourceError> {
        let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
        let headers = reader.headers()?.clone();

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            let record: Record = headers
                .iter()
                .zip(row.iter())
                .map(|(name, cell)| (name.to_string(), Value::String(cell.to_string())))
                .collect();
            records.push(record);
        }

        Ok(Self {
            len: records.len(),
            records: records.into_iter(),
            translator,
        })
    }

    pub fn translator(&self) -> Option<&SharedTranslator> {
        self.translator.as_ref()
    }
}

impl DataSource for CsvDataSource {
    fn next(&mut self) -> Option<Record> {
        let mut record = self.records.next()?;
        if let Some(translator) = &self.translator {
            for value in record.values_mut() {
                if let Value::String(text) = value
                    && !text.is_empty()
                {
                    *text = translator.translate(text);
                }
            }
        }
        Some(record)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.len)
    }
}
