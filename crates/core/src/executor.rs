use crate::binder::ParameterBinder;
use crate::cache::CompileCache;
use crate::compiler::JsonReportCompiler;
use crate::dispatch::{ExportDispatcher, ExporterRegistry};
use crate::engine::{BasicFillEngine, FillEngine};
use crate::error::ReportError;
use crate::selector::DataSourceSelector;
use crate::subreport::SubreportAssembler;
use log::info;
use quire_resource::PropertiesTranslatorFactory;
use quire_traits::{CompilerSettings, ConnectionProvider, ReportCompiler, TranslatorFactory};
use quire_types::{ConnectionDescriptor, RawParameters};
use std::path::Path;
use std::sync::Arc;

/// Runs the full report pipeline for one request at a time.
///
/// Holds no per-request state, so one executor is shared between workers.
#[derive(Debug)]
pub struct ReportExecutor {
    cache: Arc<CompileCache>,
    binder: ParameterBinder,
    subreports: SubreportAssembler,
    selector: DataSourceSelector,
    engine: Arc<dyn FillEngine>,
    dispatcher: ExportDispatcher,
}

impl ReportExecutor {
    pub fn builder() -> ReportExecutorBuilder {
        ReportExecutorBuilder::new()
    }

    pub fn cache(&self) -> &CompileCache {
        &self.cache
    }

    /// Renders `template` into `output` and returns the page count.
    ///
    /// Stages run strictly in order: compile, load, bind, subreports, data
    /// source, fill, export. The first failure is returned unchanged.
    pub fn execute(
        &self,
        descriptor: &ConnectionDescriptor,
        template: &Path,
        output: &Path,
        parameters: RawParameters,
    ) -> Result<usize, ReportError> {
        info!("Executing '{}' as {}.", template.display(), descriptor.output_token());

        self.cache.ensure_compiled(template)?;
        let report = self.cache.load(template)?;

        let bundle_path = CompileCache::bundle_path(template);
        let binding = self.binder.bind(&report, &bundle_path, parameters)?;
        let translator = binding.translator;
        let mut bound = binding.parameters;

        self.subreports.assemble(descriptor, translator.as_ref(), &mut bound)?;
        let source = self.selector.select(&report, descriptor, &mut bound, translator.as_ref())?;
        info!("Filling '{}' from a {} source with {}.", report.name, source.kind(), self.engine.name());

        let document = self.engine.fill(&report, bound, source)?;
        let pages = self.dispatcher.export(document, descriptor.output_token(), output)?;
        info!("Rendered '{}': {} pages.", report.name, pages);
        Ok(pages)
    }
}

/// A builder for creating a `ReportExecutor`.
#[derive(Debug)]
pub struct ReportExecutorBuilder {
    compiler: Arc<dyn ReportCompiler>,
    settings: CompilerSettings,
    locking: bool,
    translators: Arc<dyn TranslatorFactory>,
    connections: Option<Arc<dyn ConnectionProvider>>,
    engine: Arc<dyn FillEngine>,
    exporters: ExporterRegistry,
}

impl Default for ReportExecutorBuilder {
    fn default() -> Self {
        Self {
            compiler: Arc::new(JsonReportCompiler::new()),
            settings: CompilerSettings::default(),
            locking: true,
            translators: Arc::new(PropertiesTranslatorFactory::new()),
            connections: None,
            engine: Arc::new(BasicFillEngine::new()),
            exporters: ExporterRegistry::with_builtin(),
        }
    }
}

impl ReportExecutorBuilder {
    /// Creates a builder with the bundled JSON compiler, properties bundles,
    /// basic fill engine and built-in exporters.
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_compiler(mut self, compiler: Arc<dyn ReportCompiler>) -> Self {
        self.compiler = compiler;
        self
    }

    pub fn with_compiler_settings(mut self, settings: CompilerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Serializes recompilation of the same template path (on by default).
    pub fn with_compile_locking(mut self, enabled: bool) -> Self {
        self.locking = enabled;
        self
    }

    pub fn with_translator_factory(mut self, translators: Arc<dyn TranslatorFactory>) -> Self {
        self.translators = translators;
        self
    }

    /// Required for templates whose query language is `sql`.
    pub fn with_connection_provider(mut self, connections: Arc<dyn ConnectionProvider>) -> Self {
        self.connections = Some(connections);
        self
    }

    pub fn with_fill_engine(mut self, engine: Arc<dyn FillEngine>) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_exporters(mut self, exporters: ExporterRegistry) -> Self {
        self.exporters = exporters;
        self
    }

    pub fn build(self) -> ReportExecutor {
        info!(
            "Building executor: compiler={}, expressions={}, translators={}.",
            self.compiler.name(),
            self.settings.expression_compiler,
            self.translators.name()
        );
        let cache = Arc::new(
            CompileCache::new(self.compiler, self.settings).with_locking(self.locking),
        );
        ReportExecutor {
            subreports: SubreportAssembler::new(cache.clone()),
            cache,
            binder: ParameterBinder::new(self.translators),
            selector: DataSourceSelector::new(self.connections),
            engine: self.engine,
            dispatcher: ExportDispatcher::new(self.exporters),
        }
    }
}
