//! Named connections to a search engine.
//!
//! A `Connection` pairs a shared client handle with the index, optional
//! type and timezone it was configured with. Clones are cheap and refer to
//! the same connection.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::config::QueryConfig;
use crate::errors::ElasticError;
use crate::interfaces::SearchBackend;
use crate::query_builder::QueryBuilder;
use elastic_query_shared::{Condition, ConnectionConfig, SortDirection};

/// Builds connections from configuration blocks.
///
/// The registry owns one factory and calls it at most once per connection
/// name. Implementations are injected so tests can count constructions
/// without a live cluster.
pub trait ConnectionFactory: Send + Sync {
    /// Establish a connection described by `config`.
    fn make(&self, config: &ConnectionConfig) -> Result<Connection, ElasticError>;
}

/// Handle to a configured search engine connection.
#[derive(Clone)]
pub struct Connection {
    inner: Arc<ConnectionInner>,
}

struct ConnectionInner {
    name: String,
    client: Arc<dyn SearchBackend>,
    index: String,
    doc_type: Option<String>,
    time_zone: String,
    query_config: QueryConfig,
}

impl Connection {
    /// Create a connection over `client` using the index, type and timezone
    /// from `config`.
    pub fn new(client: Arc<dyn SearchBackend>, config: &ConnectionConfig) -> Self {
        Self::with_query_config(client, config, QueryConfig::default())
    }

    /// Create a connection with custom query builder defaults.
    pub fn with_query_config(
        client: Arc<dyn SearchBackend>,
        config: &ConnectionConfig,
        query_config: QueryConfig,
    ) -> Self {
        Self {
            inner: Arc::new(ConnectionInner {
                name: config.name.clone(),
                client,
                index: config.index.clone(),
                doc_type: config.doc_type.clone(),
                time_zone: config.time_zone.clone(),
                query_config,
            }),
        }
    }

    /// Name of the configuration block this connection was built from.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn index(&self) -> &str {
        &self.inner.index
    }

    /// Mapping type, or `None` for index-only addressing.
    pub fn doc_type(&self) -> Option<&str> {
        self.inner.doc_type.as_deref()
    }

    pub fn time_zone(&self) -> &str {
        &self.inner.time_zone
    }

    /// Shared client handle for issuing raw requests.
    pub fn client(&self) -> Arc<dyn SearchBackend> {
        Arc::clone(&self.inner.client)
    }

    pub fn query_config(&self) -> &QueryConfig {
        &self.inner.query_config
    }

    /// Whether both handles refer to the same connection.
    pub fn ptr_eq(&self, other: &Connection) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Start a new query builder bound to this connection.
    pub fn query(&self) -> QueryBuilder {
        QueryBuilder::new(self.clone())
    }

    // Shortcuts that start a fresh builder with one option applied.

    pub fn select<I, S>(&self, fields: I) -> QueryBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.query().select(fields)
    }

    pub fn term(&self, field: impl Into<String>, value: impl Into<Value>) -> QueryBuilder {
        self.query().term(field, value)
    }

    pub fn should(&self, field: impl Into<String>, value: impl Into<Value>) -> QueryBuilder {
        self.query().should(field, value)
    }

    pub fn term_with(
        &self,
        field: impl Into<String>,
        value: impl Into<Value>,
        condition: Condition,
    ) -> QueryBuilder {
        self.query().term_with(field, value, condition)
    }

    pub fn set_time_range(&self, start: impl Into<String>, end: impl Into<String>) -> QueryBuilder {
        self.query().set_time_range(start, end)
    }

    pub fn order(&self, field: impl Into<String>, direction: SortDirection) -> QueryBuilder {
        self.query().order(field, direction)
    }

    pub fn latest(&self) -> QueryBuilder {
        self.query().latest()
    }

    pub fn oldest(&self) -> QueryBuilder {
        self.query().oldest()
    }

    pub fn from(&self, offset: u64) -> QueryBuilder {
        self.query().from(offset)
    }

    pub fn size(&self, size: u64) -> QueryBuilder {
        self.query().size(size)
    }

    pub fn scroll_size(&self, scroll_size: u64) -> QueryBuilder {
        self.query().scroll_size(scroll_size)
    }

    pub fn set_scroll_keep_time(&self, seconds: u64) -> QueryBuilder {
        self.query().set_scroll_keep_time(seconds)
    }

    /// Fetch hits with no filters applied.
    pub async fn get(&self) -> Result<Vec<Value>, ElasticError> {
        self.query().get().await
    }

    /// Count every document in the connection's index.
    pub async fn count(&self) -> Result<u64, ElasticError> {
        self.query().count().await
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("name", &self.inner.name)
            .field("index", &self.inner.index)
            .field("doc_type", &self.inner.doc_type)
            .field("time_zone", &self.inner.time_zone)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockBackend;

    fn config() -> ConnectionConfig {
        ConnectionConfig::new("logs")
            .with_index("logs-*")
            .with_doc_type("doc")
            .with_time_zone("+00:00")
    }

    #[test]
    fn test_accessors() {
        let connection = Connection::new(Arc::new(MockBackend::new()), &config());

        assert_eq!(connection.name(), "logs");
        assert_eq!(connection.index(), "logs-*");
        assert_eq!(connection.doc_type(), Some("doc"));
        assert_eq!(connection.time_zone(), "+00:00");
        assert_eq!(connection.query_config().time_field, "@timestamp");
    }

    #[test]
    fn test_clone_is_same_connection() {
        let connection = Connection::new(Arc::new(MockBackend::new()), &config());
        let other = Connection::new(Arc::new(MockBackend::new()), &config());

        assert!(connection.ptr_eq(&connection.clone()));
        assert!(!connection.ptr_eq(&other));
    }

    #[test]
    fn test_client_is_shared() {
        let backend: Arc<dyn SearchBackend> = Arc::new(MockBackend::new());
        let connection = Connection::new(Arc::clone(&backend), &config());

        assert!(Arc::ptr_eq(&connection.client(), &backend));
    }

    #[tokio::test]
    async fn test_shortcut_starts_builder() {
        let backend = Arc::new(MockBackend::new());
        let connection = Connection::new(backend.clone(), &config());

        connection.term("level", "error").get().await.unwrap();

        let requests = backend.search_requests().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].index, "logs-*");
        assert_eq!(requests[0].doc_type.as_deref(), Some("doc"));
        assert_eq!(
            requests[0].body["query"]["bool"]["must"][0]["term"]["level"],
            "error"
        );
    }

    #[tokio::test]
    async fn test_count_shortcut() {
        let backend = Arc::new(MockBackend::new().with_count(7));
        let connection = Connection::new(backend.clone(), &config());

        assert_eq!(connection.count().await.unwrap(), 7);
        assert_eq!(backend.count_requests().await.len(), 1);
    }
}
