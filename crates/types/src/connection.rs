//! The per-request connection descriptor: where the data lives and what
//! output format is wanted.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Template value meaning "reuse an already-filled in-memory dataset"
/// instead of compiling a subreport template.
pub const DATASET_SENTINEL: &str = "DATASET";

/// The template a subreport is rendered from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SubreportTemplate {
    Template(PathBuf),
    Dataset,
}

impl From<String> for SubreportTemplate {
    fn from(value: String) -> Self {
        if value == DATASET_SENTINEL {
            SubreportTemplate::Dataset
        } else {
            SubreportTemplate::Template(PathBuf::from(value))
        }
    }
}

impl From<SubreportTemplate> for String {
    fn from(template: SubreportTemplate) -> Self {
        match template {
            SubreportTemplate::Template(path) => path.to_string_lossy().into_owned(),
            SubreportTemplate::Dataset => DATASET_SENTINEL.to_string(),
        }
    }
}

/// Binds a subreport's data file to a parameter of the parent report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubreportDescriptor {
    #[serde(alias = "jrxmlFile")]
    pub template: SubreportTemplate,
    pub data_file: PathBuf,
    /// Name of the parent parameter that receives the constructed data source.
    pub parameter: String,
}

impl SubreportDescriptor {
    pub fn new(
        template: SubreportTemplate,
        data_file: impl Into<PathBuf>,
        parameter: impl Into<String>,
    ) -> Self {
        Self {
            template,
            data_file: data_file.into(),
            parameter: parameter.into(),
        }
    }
}

/// Describes how to obtain data for one execution request.
///
/// Immutable for the duration of a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionDescriptor {
    /// Output-format token; `pdf` when absent.
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub subreports: Vec<SubreportDescriptor>,
    /// Delimited (tabular) data file.
    #[serde(default)]
    pub csv: Option<PathBuf>,
    /// Hierarchical data file.
    #[serde(default)]
    pub xml: Option<PathBuf>,
    #[serde(default)]
    pub dsn: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl ConnectionDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output_token(&self) -> &str {
        self.output.as_deref().unwrap_or("pdf")
    }

    pub fn with_output(mut self, token: impl Into<String>) -> Self {
        self.output = Some(token.into());
        self
    }

    pub fn with_csv(mut self, path: impl Into<PathBuf>) -> Self {
        self.csv = Some(path.into());
        self
    }

    pub fn with_xml(mut self, path: impl Into<PathBuf>) -> Self {
        self.xml = Some(path.into());
        self
    }

    pub fn with_database(
        mut self,
        dsn: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.dsn = Some(dsn.into());
        self.user = Some(user.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_subreport(mut self, subreport: SubreportDescriptor) -> Self {
        self.subreports.push(subreport);
        self
    }
}
