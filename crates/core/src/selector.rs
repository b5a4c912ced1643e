//! Chooses the row source for a report from its query language.

use crate::error::DataSourceError;
use crate::params::{BoundParameters, IGNORE_PAGINATION_PARAMETER, ParameterValue};
use log::{debug, info};
use quire_source::{CsvDataSource, DataSource, EmptyDataSource, XmlDataSource, XmlSourceOptions};
use quire_traits::{Connection, ConnectionProvider, SharedTranslator};
use quire_types::{CompiledReport, ConnectionDescriptor, QueryLanguage};
use std::sync::Arc;

/// What the fill step reads rows from.
#[derive(Debug)]
pub enum DataSourceHandle {
    Records(Box<dyn DataSource>),
    /// A live database connection; the fill step runs the report query on it.
    Connection(Box<dyn Connection>),
}

impl DataSourceHandle {
    pub fn kind(&self) -> &'static str {
        match self {
            DataSourceHandle::Records(_) => "records",
            DataSourceHandle::Connection(_) => "connection",
        }
    }
}

#[derive(Debug, Clone)]
pub struct DataSourceSelector {
    connections: Option<Arc<dyn ConnectionProvider>>,
    xml_options: XmlSourceOptions,
}

impl Default for DataSourceSelector {
    fn default() -> Self {
        Self {
            connections: None,
            xml_options: XmlSourceOptions::default(),
        }
    }
}

impl DataSourceSelector {
    pub fn new(connections: Option<Arc<dyn ConnectionProvider>>) -> Self {
        Self {
            connections,
            ..Default::default()
        }
    }

    /// Builds exactly one source for the report.
    ///
    /// For `xls` output the pagination flag is injected into `parameters`
    /// whichever branch is taken.
    pub fn select(
        &self,
        report: &CompiledReport,
        descriptor: &ConnectionDescriptor,
        parameters: &mut BoundParameters,
        translator: Option<&SharedTranslator>,
    ) -> Result<DataSourceHandle, DataSourceError> {
        if descriptor.output_token().eq_ignore_ascii_case("xls") {
            debug!("Spreadsheet output requested, disabling pagination.");
            parameters.insert(IGNORE_PAGINATION_PARAMETER, ParameterValue::Flag(true));
        }

        match report.query_language() {
            Some(QueryLanguage::XPath) => self.file_source(report, descriptor, translator),
            Some(QueryLanguage::Sql) => self.connection(descriptor),
            language => {
                debug!("No usable query language ({language:?}), using an empty source.");
                Ok(DataSourceHandle::Records(Box::new(EmptyDataSource)))
            }
        }
    }

    fn file_source(
        &self,
        report: &CompiledReport,
        descriptor: &ConnectionDescriptor,
        translator: Option<&SharedTranslator>,
    ) -> Result<DataSourceHandle, DataSourceError> {
        let source: Box<dyn DataSource> = if let Some(csv) = &descriptor.csv {
            info!("Reading delimited data from '{}'.", csv.display());
            Box::new(CsvDataSource::open(csv, translator.cloned())?)
        } else if let Some(xml) = &descriptor.xml {
            info!("Reading hierarchical data from '{}'.", xml.display());
            Box::new(XmlDataSource::open(xml, &self.xml_options, &report.fields)?)
        } else {
            return Err(DataSourceError::MissingDataFile);
        };
        Ok(DataSourceHandle::Records(source))
    }

    fn connection(&self, descriptor: &ConnectionDescriptor) -> Result<DataSourceHandle, DataSourceError> {
        let dsn = descriptor.dsn.as_deref().ok_or(DataSourceError::MissingDsn)?;
        let provider = self.connections.as_ref().ok_or(DataSourceError::NoConnectionProvider)?;
        let mut connection = provider.connect(
            dsn,
            descriptor.user.as_deref().unwrap_or(""),
            descriptor.password.as_deref().unwrap_or(""),
        )?;
        connection.set_auto_commit(true)?;
        info!("Connected to '{dsn}'.");
        Ok(DataSourceHandle::Connection(connection))
    }
}
