//! Connection configuration types.

use serde::{de, Deserialize, Deserializer, Serialize};

/// Configuration block for a single named search engine connection.
///
/// One block exists per configured backend. Blocks are immutable once
/// loaded; the registry turns each into a cached connection on first use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Connection name. Filled in from the key of the `connections` map.
    #[serde(skip)]
    pub name: String,
    /// Server host name.
    pub host: String,
    /// Server port. Accepts a number or a numeric string.
    #[serde(deserialize_with = "port_number")]
    pub port: u16,
    /// URL scheme, `http` or `https`.
    pub scheme: String,
    /// Basic auth user. Empty disables authentication.
    pub user: String,
    /// Basic auth password.
    pub pass: String,
    /// Index name. May end with `*` to address a group of indices.
    pub index: String,
    /// Mapping type. `None` for engines that address documents by index only.
    #[serde(
        rename = "type",
        deserialize_with = "non_empty",
        skip_serializing_if = "Option::is_none"
    )]
    pub doc_type: Option<String>,
    /// Timezone applied to time range filters, e.g. `+08:00`.
    pub time_zone: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            host: "localhost".to_string(),
            port: 9200,
            scheme: "http".to_string(),
            user: String::new(),
            pass: String::new(),
            index: "default".to_string(),
            doc_type: None,
            time_zone: "+08:00".to_string(),
        }
    }
}

impl ConnectionConfig {
    /// Create a config for the given name with default server coordinates.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the server host and port.
    pub fn with_host(mut self, host: impl Into<String>, port: u16) -> Self {
        self.host = host.into();
        self.port = port;
        self
    }

    /// Set the URL scheme.
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// Set basic auth credentials.
    pub fn with_credentials(mut self, user: impl Into<String>, pass: impl Into<String>) -> Self {
        self.user = user.into();
        self.pass = pass.into();
        self
    }

    /// Set the index name.
    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = index.into();
        self
    }

    /// Set the mapping type. An empty string clears it.
    pub fn with_doc_type(mut self, doc_type: impl Into<String>) -> Self {
        let doc_type = doc_type.into();
        self.doc_type = (!doc_type.is_empty()).then_some(doc_type);
        self
    }

    /// Set the display timezone.
    pub fn with_time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.time_zone = time_zone.into();
        self
    }

    /// Base URL of the server, `scheme://host:port`.
    pub fn url(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host, self.port)
    }

    /// Whether basic auth credentials are configured.
    pub fn has_credentials(&self) -> bool {
        !self.user.is_empty()
    }
}

fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

fn port_number<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Port {
        Number(u16),
        Text(String),
    }

    match Port::deserialize(deserializer)? {
        Port::Number(port) => Ok(port),
        Port::Text(port) => port
            .trim()
            .parse()
            .map_err(|e| de::Error::custom(format!("invalid port {:?}: {}", port, e))),
    }
}
