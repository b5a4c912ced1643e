use crate::cache::CompileCache;
use crate::error::{DataSourceError, ReportError};
use crate::params::{BoundParameters, ParameterValue};
use log::{debug, info};
use quire_source::CsvDataSource;
use quire_traits::SharedTranslator;
use quire_types::{ConnectionDescriptor, SubreportTemplate};
use std::sync::Arc;

/// Compiles subreport templates and binds a delimited data source for each
/// subreport into the parent's parameters.
#[derive(Debug, Clone)]
pub struct SubreportAssembler {
    cache: Arc<CompileCache>,
}

impl SubreportAssembler {
    pub fn new(cache: Arc<CompileCache>) -> Self {
        Self { cache }
    }

    /// Processes subreports in the order supplied; the first failure aborts.
    ///
    /// Every subreport source shares `translator`. `None` means the data is
    /// used untranslated.
    pub fn assemble(
        &self,
        descriptor: &ConnectionDescriptor,
        translator: Option<&SharedTranslator>,
        parameters: &mut BoundParameters,
    ) -> Result<(), ReportError> {
        for subreport in &descriptor.subreports {
            match &subreport.template {
                SubreportTemplate::Template(path) => {
                    let outcome = self.cache.ensure_compiled(path)?;
                    debug!("Subreport template '{}': {:?}.", path.display(), outcome);
                }
                SubreportTemplate::Dataset => {
                    debug!("Subreport '{}' reuses an in-memory dataset.", subreport.parameter);
                }
            }

            let source = CsvDataSource::open(&subreport.data_file, translator.cloned()).map_err(
                |source| DataSourceError::Subreport {
                    path: subreport.data_file.clone(),
                    source,
                },
            )?;
            info!(
                "Bound subreport data '{}' to parameter '{}'.",
                subreport.data_file.display(),
                subreport.parameter
            );
            parameters.insert(subreport.parameter.clone(), ParameterValue::DataSource(Box::new(source)));
        }
        Ok(())
    }
}
