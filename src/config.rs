//! Daemon configuration.
//!
//! [`ServerConfig`] is assembled from the command-line options of `audio-catalogd` and
//! decides which [`DataStore`] backs the service and where it listens.

use std::sync::Arc;

use crate::sql::SqliteDataStore;
use crate::{DataStore, DataStoreError, InMemoryDataStore};

/// Database used when no `--database` is given.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://audio_catalog.db";
/// Host used when no `--host` is given.
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Port used when no `--port` is given.
pub const DEFAULT_PORT: u16 = 8000;

/// Which store implementation to serve from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// A SQLite database at the given URL.
    Sqlite(String),
    /// A process-local store that is lost on exit.
    InMemory,
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreBackend::Sqlite(url) => write!(f, "{}", url),
            StoreBackend::InMemory => write!(f, "in-memory (not persisted)"),
        }
    }
}

/// Errors detected while assembling a [`ServerConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `--database` and `--in-memory` were both given.
    ConflictingBackends,
    /// The host option was present but blank.
    EmptyHost,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConflictingBackends => {
                write!(f, "--database and --in-memory cannot be used together")
            }
            ConfigError::EmptyHost => write!(f, "--host must not be empty"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Resolved configuration for the daemon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub backend: StoreBackend,
    pub host: String,
    pub port: u16,
    pub verbose: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Sqlite(DEFAULT_DATABASE_URL.to_string()),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            verbose: false,
        }
    }
}

impl ServerConfig {
    /// Builds a configuration from optional command-line values, filling in defaults.
    ///
    /// # Arguments
    /// * `database` - SQLite URL, if given
    /// * `in_memory` - Serve from the non-durable store instead
    /// * `host` - Bind host, if given
    /// * `port` - Bind port, if given
    /// * `verbose` - Raise the default log level to debug
    pub fn from_options(
        database: Option<String>,
        in_memory: bool,
        host: Option<String>,
        port: Option<u16>,
        verbose: bool,
    ) -> Result<Self, ConfigError> {
        let backend = match (database, in_memory) {
            (Some(_), true) => return Err(ConfigError::ConflictingBackends),
            (Some(url), false) => StoreBackend::Sqlite(url),
            (None, true) => StoreBackend::InMemory,
            (None, false) => StoreBackend::Sqlite(DEFAULT_DATABASE_URL.to_string()),
        };
        let host = match host {
            Some(h) if h.trim().is_empty() => return Err(ConfigError::EmptyHost),
            Some(h) => h,
            None => DEFAULT_HOST.to_string(),
        };
        Ok(Self {
            backend,
            host,
            port: port.unwrap_or(DEFAULT_PORT),
            verbose,
        })
    }

    /// The `host:port` string to bind the listener to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Default `tracing` filter directive when `RUST_LOG` is unset.
    pub fn log_filter(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Opens the configured store.
    pub async fn open_store(&self) -> Result<Arc<dyn DataStore>, DataStoreError> {
        match &self.backend {
            StoreBackend::Sqlite(url) => Ok(Arc::new(SqliteDataStore::connect(url).await?)),
            StoreBackend::InMemory => Ok(Arc::new(InMemoryDataStore::new())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AudioKind, Song};

    #[test]
    fn defaults() {
        let config = ServerConfig::from_options(None, false, None, None, false).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.bind_address(), "127.0.0.1:8000");
        assert_eq!(config.log_filter(), "info");
    }

    #[test]
    fn explicit_options() {
        let config = ServerConfig::from_options(
            Some("sqlite://other.db".to_string()),
            false,
            Some("0.0.0.0".to_string()),
            Some(9000),
            true,
        )
        .unwrap();
        assert_eq!(
            config.backend,
            StoreBackend::Sqlite("sqlite://other.db".to_string())
        );
        assert_eq!(config.bind_address(), "0.0.0.0:9000");
        assert_eq!(config.log_filter(), "debug");
    }

    #[test]
    fn rejects_bad_combinations() {
        assert_eq!(
            ServerConfig::from_options(Some("sqlite://x.db".to_string()), true, None, None, false),
            Err(ConfigError::ConflictingBackends)
        );
        assert_eq!(
            ServerConfig::from_options(None, false, Some("  ".to_string()), None, false),
            Err(ConfigError::EmptyHost)
        );
    }

    #[tokio::test]
    async fn open_in_memory_store() {
        let config = ServerConfig::from_options(None, true, None, None, false).unwrap();
        let store = config.open_store().await.unwrap();
        let id = store
            .insert(
                &Song {
                    name: "s".to_string(),
                    duration: 1,
                }
                .into(),
            )
            .await
            .unwrap();
        assert!(store.get(AudioKind::Song, id).await.unwrap().is_some());
    }
}
