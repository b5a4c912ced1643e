//! Reference compiler for JSON report designs.

use log::debug;
use quire_traits::{CompileError, CompilerSettings, ReportCompiler};
use quire_types::{CompiledReport, FieldSpec, ParameterSlot, ReportQuery};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

fn default_rows_per_page() -> usize {
    40
}

/// The authoring form of a report, as found in a `.json` template file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDesign {
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub query: Option<ReportQuery>,
    #[serde(default)]
    pub parameters: Vec<ParameterSlot>,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
    #[serde(default = "default_rows_per_page")]
    pub rows_per_page: usize,
}

impl ReportDesign {
    fn validate(&self, path: &Path) -> Result<(), CompileError> {
        let invalid = |message: String| CompileError::Invalid {
            path: path.to_path_buf(),
            message,
        };
        if self.name.trim().is_empty() {
            return Err(invalid("report name is empty".to_string()));
        }
        if self.rows_per_page == 0 {
            return Err(invalid("rowsPerPage must be at least 1".to_string()));
        }
        let mut seen = HashSet::new();
        for slot in &self.parameters {
            if !seen.insert(slot.name.as_str()) {
                return Err(invalid(format!("parameter '{}' is declared twice", slot.name)));
            }
        }
        Ok(())
    }

    fn into_compiled(self, settings: &CompilerSettings) -> CompiledReport {
        CompiledReport {
            name: self.name,
            title: self.title,
            query: self.query,
            parameters: self.parameters,
            fields: self.fields,
            rows_per_page: self.rows_per_page,
            expression_compiler: settings.expression_compiler.clone(),
        }
    }
}

/// Compiles JSON report designs into `CompiledReport` artifacts.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonReportCompiler;

impl JsonReportCompiler {
    pub fn new() -> Self {
        Self
    }
}

impl ReportCompiler for JsonReportCompiler {
    fn compile(
        &self,
        source: &Path,
        artifact: &Path,
        settings: &CompilerSettings,
    ) -> Result<(), CompileError> {
        let text = fs::read_to_string(source).map_err(|e| CompileError::io(source, e))?;
        let design: ReportDesign = serde_json::from_str(&text).map_err(|e| CompileError::Invalid {
            path: source.to_path_buf(),
            message: e.to_string(),
        })?;
        design.validate(source)?;

        let compiled = design.into_compiled(settings);
        let bytes = serde_json::to_vec_pretty(&compiled).map_err(|e| CompileError::Artifact {
            path: artifact.to_path_buf(),
            message: e.to_string(),
        })?;
        fs::write(artifact, bytes).map_err(|e| CompileError::io(artifact, e))?;
        debug!(
            "Compiled '{}' with expression compiler '{}'.",
            source.display(),
            settings.expression_compiler
        );
        Ok(())
    }

    fn load(&self, artifact: &Path) -> Result<CompiledReport, CompileError> {
        let bytes = fs::read(artifact).map_err(|e| CompileError::io(artifact, e))?;
        serde_json::from_slice(&bytes).map_err(|e| CompileError::Artifact {
            path: artifact.to_path_buf(),
            message: e.to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "JsonReportCompiler"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_types::ValueType;

    #[test]
    fn compile_then_load_records_settings() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("invoice.json");
        fs::write(
            &source,
            r#"{ "name": "invoice", "parameters": [{ "name": "total", "class": "java.math.BigDecimal" }] }"#,
        )
        .unwrap();
        let artifact = dir.path().join("invoice.compiled");
        let settings = CompilerSettings { expression_compiler: "groovy".to_string() };

        let compiler = JsonReportCompiler::new();
        compiler.compile(&source, &artifact, &settings).unwrap();
        let report = compiler.load(&artifact).unwrap();

        assert_eq!(report.name, "invoice");
        assert_eq!(report.expression_compiler, "groovy");
        assert_eq!(report.parameter("total").unwrap().value_type, ValueType::Decimal);
    }

    #[test]
    fn duplicate_parameters_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("dup.json");
        fs::write(
            &source,
            r#"{ "name": "dup", "parameters": [{ "name": "a" }, { "name": "a" }] }"#,
        )
        .unwrap();

        let result = JsonReportCompiler::new().compile(
            &source,
            &dir.path().join("dup.compiled"),
            &CompilerSettings::default(),
        );
        assert!(matches!(result, Err(CompileError::Invalid { .. })));
        assert!(!dir.path().join("dup.compiled").exists());
    }

    #[test]
    fn malformed_json_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("bad.json");
        fs::write(&source, "{ not json").unwrap();
        let result = JsonReportCompiler::new().compile(
            &source,
            &dir.path().join("bad.compiled"),
            &CompilerSettings::default(),
        );
        assert!(matches!(result, Err(CompileError::Invalid { .. })));
    }
}
