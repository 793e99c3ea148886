//! Connection factory backed by OpenSearch clients.

use std::sync::Arc;

use crate::config::QueryConfig;
use crate::connection::{Connection, ConnectionFactory};
use crate::errors::ElasticError;
use crate::opensearch::OpenSearchBackend;
use elastic_query_shared::ConnectionConfig;

/// Builds one OpenSearch client per connection.
#[derive(Debug, Clone, Default)]
pub struct OpenSearchConnectionFactory {
    query_config: QueryConfig,
}

impl OpenSearchConnectionFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use custom query builder defaults for every connection made.
    pub fn with_query_config(query_config: QueryConfig) -> Self {
        Self { query_config }
    }
}

impl ConnectionFactory for OpenSearchConnectionFactory {
    fn make(&self, config: &ConnectionConfig) -> Result<Connection, ElasticError> {
        let backend = OpenSearchBackend::new(config)?;

        Ok(Connection::with_query_config(
            Arc::new(backend),
            config,
            self.query_config.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_connection() {
        let config = ConnectionConfig::new("default")
            .with_index("material-log")
            .with_doc_type("log")
            .with_time_zone("+08:00");

        let connection = OpenSearchConnectionFactory::new().make(&config).unwrap();

        assert_eq!(connection.name(), "default");
        assert_eq!(connection.index(), "material-log");
        assert_eq!(connection.doc_type(), Some("log"));
        assert_eq!(connection.time_zone(), "+08:00");
    }

    #[test]
    fn test_make_uses_query_config() {
        let factory =
            OpenSearchConnectionFactory::with_query_config(QueryConfig::with_time_field("created_at"));

        let connection = factory.make(&ConnectionConfig::new("default")).unwrap();
        assert_eq!(connection.query_config().time_field, "created_at");
    }

    #[test]
    fn test_make_rejects_bad_url() {
        let config = ConnectionConfig::new("broken").with_scheme("not a scheme");

        let result = OpenSearchConnectionFactory::new().make(&config);
        assert!(matches!(result, Err(ElasticError::ConfigurationError(_))));
    }
}
