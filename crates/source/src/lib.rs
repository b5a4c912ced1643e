//! Record sources for the report pipeline.
//!
//! This module provides the `DataSource` trait and the implementations the
//! pipeline selects between when filling a report.
//!
//! ## Available Sources
//!
//! - `CsvDataSource`: Delimited files with a header row, translation aware
//! - `XmlDataSource`: Hierarchical files, records selected by an absolute path
//! - `EmptyDataSource`: No records at all, for parameter-only reports
//! - `VecDataSource`: In-memory vector of records
//!
//! ## Example
//!
//! ```ignore
//! use quire_source::{CsvDataSource, DataSource};
//!
//! let mut source = CsvDataSource::open("lines.csv", None)?;
//! while let Some(record) = source.next() {
//!     println!("Processing: {:?}", record);
//! }
//! ```

mod csv_source;
mod error;
mod patterns;
mod xml_source;

pub use csv_source::CsvDataSource;
pub use error::SourceError;
pub use patterns::{DatePattern, NumberPattern};
pub use xml_source::{XmlDataSource, XmlSourceOptions};

use quire_types::Record;
use std::fmt::Debug;

/// A trait for data sources that feed records into the fill step.
///
/// Sources are consumed once, front to back. Construction does the fallible
/// work (opening and parsing files), so iteration itself cannot fail.
pub trait DataSource: Send + Debug {
    /// Get the next record, if available.
    ///
    /// Returns `None` when the source is exhausted.
    fn next(&mut self) -> Option<Record>;

    /// Hint about the total number of records.
    ///
    /// Returns `None` if the size is unknown.
    fn size_hint(&self) -> Option<usize> {
        None
    }

    /// Check if the source has a known size.
    fn has_known_size(&self) -> bool {
        self.size_hint().is_some()
    }
}

/// A data source backed by an in-memory vector.
///
/// This is the simplest data source, useful for small datasets or testing.
#[derive(Debug)]
pub struct VecDataSource {
    data: Vec<Record>,
    index: usize,
}

impl VecDataSource {
    /// Create a new data source from a vector.
    pub fn new(data: Vec<Record>) -> Self {
        Self { data, index: 0 }
    }

    /// Get the total number of records.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the source is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get the number of records remaining.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.index
    }
}

impl DataSource for VecDataSource {
    fn next(&mut self) -> Option<Record> {
        let item = self.data.get(self.index).cloned();
        if item.is_some() {
            self.index += 1;
        }
        item
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.data.len())
    }
}

/// A source without records, used for reports that only display parameters
/// (covers, summaries).
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyDataSource;

impl DataSource for EmptyDataSource {
    fn next(&mut self) -> Option<Record> {
        None
    }

    fn size_hint(&self) -> Option<usize> {
        Some(0)
    }
}

// Blanket implementation for Box<dyn DataSource>
impl DataSource for Box<dyn DataSource> {
    fn next(&mut self) -> Option<Record> {
        (**self).next()
    }

    fn size_hint(&self) -> Option<usize> {
        (**self).size_hint()
    }
}
