use quire_types::{ConnectionDescriptor, OutputFormat, RawParameters};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One report execution: what to render, from which data, to where.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteRequest {
    #[serde(default)]
    pub connection: ConnectionDescriptor,
    pub template: PathBuf,
    pub output: PathBuf,
    #[serde(default)]
    pub parameters: RawParameters,
    /// Files that belong to this request only (generated data files) and
    /// are removed once it completes, unless the service keeps them.
    #[serde(default)]
    pub temporary_files: Vec<PathBuf>,
}

impl ExecuteRequest {
    pub fn new(template: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            template: template.into(),
            output: output.into(),
            ..Default::default()
        }
    }

    pub fn with_connection(mut self, connection: ConnectionDescriptor) -> Self {
        self.connection = connection;
        self
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.parameters.insert(name.into(), value);
        self
    }

    pub fn with_temporary_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.temporary_files.push(path.into());
        self
    }
}

/// A report rendered into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedOutput {
    pub format: OutputFormat,
    pub bytes: Vec<u8>,
    pub pages: usize,
}
