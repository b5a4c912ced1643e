//! ReportCompiler trait for turning a template source into its executable artifact.

use quire_types::CompiledReport;
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Failed to access '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Template '{path}' is invalid: {message}")]
    Invalid { path: PathBuf, message: String },

    #[error("Compiled artifact '{path}' is unreadable: {message}")]
    Artifact { path: PathBuf, message: String },
}

impl CompileError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        CompileError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Selects how report expressions are compiled.
///
/// Passed explicitly to every compilation so concurrent requests against
/// different templates never share ambient process state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerSettings {
    pub expression_compiler: String,
}

impl Default for CompilerSettings {
    fn default() -> Self {
        Self {
            expression_compiler: "i18n-groovy".to_string(),
        }
    }
}

/// Compiles template sources and loads compiled artifacts.
///
/// Compilation must be deterministic: the same source and settings always
/// produce the same artifact, which is what makes racing recompilations safe.
pub trait ReportCompiler: Send + Sync + Debug {
    /// Compiles `source` and writes the executable artifact to `artifact`,
    /// replacing any previous artifact.
    fn compile(
        &self,
        source: &Path,
        artifact: &Path,
        settings: &CompilerSettings,
    ) -> Result<(), CompileError>;

    /// Loads a previously written artifact.
    fn load(&self, artifact: &Path) -> Result<CompiledReport, CompileError>;

    /// Returns a human-readable name for this compiler (for logging/debugging).
    fn name(&self) -> &'static str;
}
