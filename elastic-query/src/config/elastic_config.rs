//! Connection configuration loading.

use std::collections::HashMap;
use std::env;

use serde::{Deserialize, Serialize};
use tracing::info;

use elastic_query_repository::ElasticError;
use elastic_query_shared::ConnectionConfig;

/// Default connection name.
const DEFAULT_CONNECTION: &str = "default";

/// Default server host.
const DEFAULT_HOST: &str = "localhost";

/// Default server port.
const DEFAULT_PORT: u16 = 9200;

/// Default URL scheme.
const DEFAULT_SCHEME: &str = "http";

/// Default index name.
const DEFAULT_INDEX: &str = "default";

/// Default display timezone.
const DEFAULT_TIME_ZONE: &str = "+08:00";

/// All configured connections plus the name used when none is given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElasticConfig {
    /// Name of the connection used by default.
    #[serde(default = "default_connection_name")]
    pub default: String,
    /// Connection blocks keyed by name.
    #[serde(default)]
    pub connections: HashMap<String, ConnectionConfig>,
}

fn default_connection_name() -> String {
    DEFAULT_CONNECTION.to_string()
}

impl Default for ElasticConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CONNECTION)
    }
}

impl ElasticConfig {
    /// Create an empty config with the given default connection name.
    pub fn new(default: impl Into<String>) -> Self {
        Self {
            default: default.into(),
            connections: HashMap::new(),
        }
    }

    /// Add a connection block, keyed by its name.
    pub fn with_connection(mut self, connection: ConnectionConfig) -> Self {
        self.connections.insert(connection.name.clone(), connection);
        self
    }

    /// Look up a connection block by name.
    pub fn connection(&self, name: &str) -> Option<&ConnectionConfig> {
        self.connections.get(name)
    }

    /// Load the default connection from environment variables.
    ///
    /// A `.env` file in the working directory is read first if present.
    ///
    /// # Environment Variables
    ///
    /// - `ELASTIC_CONNECTION`: default connection name (default: default)
    /// - `ELASTIC_HOST`: server host (default: localhost)
    /// - `ELASTIC_PORT`: server port (default: 9200)
    /// - `ELASTIC_SCHEME`: URL scheme (default: http)
    /// - `ELASTIC_USER` / `ELASTIC_PASS`: basic auth credentials (default: none)
    /// - `ELASTIC_INDEX`: index name, may end with `*` (default: default)
    /// - `ELASTIC_TYPE`: mapping type (default: none)
    /// - `ELASTIC_TIME_ZONE`: timezone for time ranges (default: +08:00)
    pub fn from_env() -> Result<Self, ElasticError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from a variable lookup. The single connection block
    /// is registered under the default connection name.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ElasticError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let name = var("ELASTIC_CONNECTION", DEFAULT_CONNECTION);
        let port = match lookup("ELASTIC_PORT") {
            Some(port) => port.parse::<u16>().map_err(|e| {
                ElasticError::configuration(format!("Invalid ELASTIC_PORT {}: {}", port, e))
            })?,
            None => DEFAULT_PORT,
        };

        let connection = ConnectionConfig::new(name.clone())
            .with_host(var("ELASTIC_HOST", DEFAULT_HOST), port)
            .with_scheme(var("ELASTIC_SCHEME", DEFAULT_SCHEME))
            .with_credentials(var("ELASTIC_USER", ""), var("ELASTIC_PASS", ""))
            .with_index(var("ELASTIC_INDEX", DEFAULT_INDEX))
            .with_doc_type(var("ELASTIC_TYPE", ""))
            .with_time_zone(var("ELASTIC_TIME_ZONE", DEFAULT_TIME_ZONE));

        info!(
            connection = %name,
            url = %connection.url(),
            index = %connection.index,
            "Loaded elastic configuration from environment"
        );

        Ok(Self::new(name).with_connection(connection))
    }

    /// Parse a JSON config of the form
    /// `{"default": "...", "connections": {"name": {...}}}`.
    pub fn from_json(json: &str) -> Result<Self, ElasticError> {
        let mut config: Self = serde_json::from_str(json)
            .map_err(|e| ElasticError::configuration(format!("Invalid elastic config: {}", e)))?;

        for (name, connection) in config.connections.iter_mut() {
            connection.name = name.clone();
        }
        Ok(config)
    }
}
