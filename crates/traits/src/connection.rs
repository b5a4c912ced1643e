//! Relational connectivity, consumed as an opaque capability.

use quire_types::Record;
use std::fmt::Debug;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ConnectionError {
    #[error("Could not connect to '{dsn}': {message}")]
    Unreachable { dsn: String, message: String },

    #[error("Connection rejected setting: {0}")]
    Setting(String),

    #[error("Query failed: {0}")]
    Query(String),
}

/// A live database connection handed to the fill step.
pub trait Connection: Send + Debug {
    fn set_auto_commit(&mut self, enabled: bool) -> Result<(), ConnectionError>;

    fn auto_commit(&self) -> bool;

    /// Runs a report query and returns its rows.
    fn query(&mut self, sql: &str) -> Result<Vec<Record>, ConnectionError>;
}

/// Acquires connections. Connections are requested fresh for every report
/// execution; pooling, if any, is the provider's business.
pub trait ConnectionProvider: Send + Sync + Debug {
    fn connect(
        &self,
        dsn: &str,
        user: &str,
        password: &str,
    ) -> Result<Box<dyn Connection>, ConnectionError>;
}
