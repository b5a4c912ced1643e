use crate::error::ServiceError;
use quire_core::ReportExecutorBuilder;
use quire_traits::CompilerSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_expression_compiler() -> String {
    CompilerSettings::default().expression_compiler
}

fn enabled() -> bool {
    true
}

/// Service settings, usually read from a JSON file.
///
/// ```json
/// { "workers": 4, "expressionCompiler": "i18n-groovy", "unlink": true }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceConfig {
    /// Number of report workers; defaults to the number of CPUs.
    #[serde(default)]
    pub workers: Option<usize>,
    /// Pending requests allowed before `execute` waits; defaults to twice the workers.
    #[serde(default)]
    pub queue_capacity: Option<usize>,
    #[serde(default = "default_expression_compiler")]
    pub expression_compiler: String,
    #[serde(default = "enabled")]
    pub compile_locking: bool,
    /// Remove temporary files once a request completes.
    #[serde(default = "enabled")]
    pub unlink: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            workers: None,
            queue_capacity: None,
            expression_compiler: default_expression_compiler(),
            compile_locking: true,
            unlink: true,
        }
    }
}

impl ServiceConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ServiceError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config: ServiceConfig = serde_json::from_str(&text)
            .map_err(|e| ServiceError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ServiceError> {
        if self.workers == Some(0) {
            return Err(ServiceError::Config("workers must be at least 1".to_string()));
        }
        if self.queue_capacity == Some(0) {
            return Err(ServiceError::Config("queueCapacity must be at least 1".to_string()));
        }
        if self.expression_compiler.trim().is_empty() {
            return Err(ServiceError::Config("expressionCompiler is empty".to_string()));
        }
        Ok(())
    }

    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(num_cpus::get).max(1)
    }

    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity.unwrap_or(self.worker_count() * 2).max(1)
    }

    pub fn compiler_settings(&self) -> CompilerSettings {
        CompilerSettings {
            expression_compiler: self.expression_compiler.clone(),
        }
    }

    /// An executor builder carrying this configuration's compiler settings.
    pub fn executor(&self) -> ReportExecutorBuilder {
        ReportExecutorBuilder::new()
            .with_compiler_settings(self.compiler_settings())
            .with_compile_locking(self.compile_locking)
    }
}
