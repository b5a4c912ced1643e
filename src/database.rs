//! Connection settings derived from a database URI.

use std::env;
use thiserror::Error;
use url::Url;

const DEFAULT_SCHEME: &str = "postgresql";
const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 5432;

#[derive(Error, Debug)]
pub enum DatabaseUriError {
    #[error("Invalid database URI '{uri}': {source}")]
    Parse {
        uri: String,
        #[source]
        source: url::ParseError,
    },
}

/// The `dsn`/`user`/`password` triple passed in a connection descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseSettings {
    pub dsn: String,
    pub user: String,
    pub password: String,
}

impl DatabaseSettings {
    /// Derives `jdbc:<scheme>://<host>:<port>/<database>` from a URI such as
    /// `postgresql://erp:secret@db:5433/`.
    ///
    /// Missing parts default to `postgresql`, `localhost` and `5432`; a
    /// missing user falls back to the account running the process, a missing
    /// password to the empty string. An empty URI yields all defaults.
    pub fn from_uri(uri: &str, database: &str) -> Result<Self, DatabaseUriError> {
        let uri = uri.trim();
        let parsed = if uri.is_empty() {
            None
        } else {
            Some(Url::parse(uri).map_err(|source| DatabaseUriError::Parse {
                uri: uri.to_string(),
                source,
            })?)
        };

        let scheme = parsed
            .as_ref()
            .map(Url::scheme)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SCHEME);
        let host = parsed
            .as_ref()
            .and_then(Url::host_str)
            .filter(|h| !h.is_empty())
            .unwrap_or(DEFAULT_HOST);
        let port = parsed.as_ref().and_then(Url::port).unwrap_or(DEFAULT_PORT);
        let user = parsed
            .as_ref()
            .map(Url::username)
            .filter(|u| !u.is_empty())
            .map(str::to_string)
            .unwrap_or_else(system_user);
        let password = parsed
            .as_ref()
            .and_then(Url::password)
            .unwrap_or_default()
            .to_string();

        Ok(Self {
            dsn: format!("jdbc:{scheme}://{host}:{port}/{database}"),
            user,
            password,
        })
    }
}

fn system_user() -> String {
    env::var("USER")
        .or_else(|_| env::var("USERNAME"))
        .unwrap_or_default()
}
