pub mod fixtures;

use lopdf::Document as LopdfDocument;
use quire::{ExporterRegistry, ReportExecutor};
use quire_traits::{Exporter, ExporterError, InMemoryTranslatorFactory};
use quire_types::{ExportConfig, OutputFormat, RenderedDocument};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A scratch directory holding templates, data files and outputs.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> std::io::Result<Self> {
        Ok(Self { dir: tempfile::tempdir()? })
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn write(&self, name: &str, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.path(name);
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn write_template(&self, name: &str, design: &Value) -> std::io::Result<PathBuf> {
        self.write(name, &design.to_string())
    }

    pub fn file_names(&self) -> std::io::Result<Vec<String>> {
        let mut names: Vec<String> = fs::read_dir(self.dir.path())?
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        Ok(names)
    }
}

/// An exporter that records what it was asked to write.
#[derive(Debug, Default)]
pub struct RecordingExporter {
    pub calls: Mutex<Vec<(ExportConfig, usize)>>,
}

impl Exporter for RecordingExporter {
    fn export(
        &self,
        document: RenderedDocument,
        config: &ExportConfig,
        destination: &Path,
    ) -> Result<(), ExporterError> {
        fs::write(destination, document.name.as_bytes())?;
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((config.clone(), document.page_count()));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "RecordingExporter"
    }
}

/// Built-in exporters plus a recorder registered for `format`.
pub fn registry_recording(format: OutputFormat) -> (ExporterRegistry, Arc<RecordingExporter>) {
    let recorder = Arc::new(RecordingExporter::default());
    let mut registry = ExporterRegistry::with_builtin();
    registry.register(format, recorder.clone());
    (registry, recorder)
}

pub fn executor_with(registry: ExporterRegistry) -> ReportExecutor {
    ReportExecutor::builder().with_exporters(registry).build()
}

/// An executor whose translations come from an in-memory table.
pub fn executor_with_translations(entries: &[(&str, &str, &str)]) -> ReportExecutor {
    let factory = InMemoryTranslatorFactory::new();
    for (tag, key, value) in entries {
        factory.add(tag, *key, *value);
    }
    ReportExecutor::builder()
        .with_translator_factory(Arc::new(factory))
        .build()
}

pub fn pdf_page_count(path: &Path) -> Result<usize, Box<dyn std::error::Error>> {
    let doc = LopdfDocument::load_mem(&fs::read(path)?)?;
    Ok(doc.get_pages().len())
}
