//! Registry of named connections.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::config::ElasticConfig;
use elastic_query_repository::{
    Connection, ConnectionFactory, ElasticError, OpenSearchConnectionFactory, QueryBuilder,
    SearchBackend,
};
use elastic_query_shared::ConnectionConfig;

/// Resolves connection names to cached connections.
///
/// Each name is built at most once, on first use, and the same connection
/// is handed out on every later call. The cache lock is held while a
/// connection is built so concurrent first calls cannot create duplicates.
///
/// # Example
///
/// ```ignore
/// let manager = ElasticManager::from_env()?;
/// let hits = manager
///     .connection(None)?
///     .query()
///     .term("material_type", 1)
///     .latest()
///     .get()
///     .await?;
/// ```
pub struct ElasticManager {
    config: ElasticConfig,
    factory: Box<dyn ConnectionFactory>,
    connections: Mutex<HashMap<String, Connection>>,
}

impl ElasticManager {
    /// Create a manager that builds OpenSearch connections.
    pub fn new(config: ElasticConfig) -> Self {
        Self::with_factory(config, Box::new(OpenSearchConnectionFactory::new()))
    }

    /// Create a manager with a custom connection factory.
    pub fn with_factory(config: ElasticConfig, factory: Box<dyn ConnectionFactory>) -> Self {
        Self {
            config,
            factory,
            connections: Mutex::new(HashMap::new()),
        }
    }

    /// Create a manager from `ELASTIC_*` environment variables.
    pub fn from_env() -> Result<Self, ElasticError> {
        Ok(Self::new(ElasticConfig::from_env()?))
    }

    /// Name of the connection used when none is given.
    pub fn default_connection_name(&self) -> &str {
        &self.config.default
    }

    /// Get the configuration block for `name`.
    ///
    /// # Errors
    ///
    /// `ElasticError::ConfigurationError` if no block is configured under
    /// that name.
    pub fn configuration(&self, name: &str) -> Result<&ConnectionConfig, ElasticError> {
        self.config
            .connection(name)
            .ok_or_else(|| ElasticError::not_configured(name))
    }

    /// Get the connection for `name`, or the default connection for `None`
    /// or an empty name.
    pub fn connection(&self, name: Option<&str>) -> Result<Connection, ElasticError> {
        let name = name
            .filter(|name| !name.is_empty())
            .unwrap_or(self.config.default.as_str());

        let mut connections = self.connections.lock();
        if let Some(connection) = connections.get(name) {
            debug!(connection = %name, "Reusing cached connection");
            return Ok(connection.clone());
        }

        let config = self.configuration(name)?;
        let connection = self.factory.make(config)?;
        info!(connection = %name, index = %connection.index(), "Connection established");

        connections.insert(name.to_string(), connection.clone());
        Ok(connection)
    }

    pub fn default_connection(&self) -> Result<Connection, ElasticError> {
        self.connection(None)
    }

    // Shortcuts to the default connection.

    /// Start a query builder on the default connection.
    pub fn query(&self) -> Result<QueryBuilder, ElasticError> {
        Ok(self.default_connection()?.query())
    }

    pub fn index(&self) -> Result<String, ElasticError> {
        Ok(self.default_connection()?.index().to_string())
    }

    pub fn doc_type(&self) -> Result<Option<String>, ElasticError> {
        Ok(self.default_connection()?.doc_type().map(str::to_string))
    }

    pub fn time_zone(&self) -> Result<String, ElasticError> {
        Ok(self.default_connection()?.time_zone().to_string())
    }

    pub fn client(&self) -> Result<Arc<dyn SearchBackend>, ElasticError> {
        Ok(self.default_connection()?.client())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use elastic_query_repository::SearchError;
    use elastic_query_shared::{CountResponse, ScrollRequest, SearchRequest, SearchResponse};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    struct NullBackend;

    #[async_trait]
    impl SearchBackend for NullBackend {
        async fn search(&self, _request: &SearchRequest) -> Result<SearchResponse, SearchError> {
            Ok(SearchResponse::default())
        }

        async fn count(&self, _request: &SearchRequest) -> Result<CountResponse, SearchError> {
            Ok(CountResponse { count: 3 })
        }

        async fn scroll(&self, _request: &ScrollRequest) -> Result<SearchResponse, SearchError> {
            Ok(SearchResponse::default())
        }
    }

    /// Factory that counts how many connections it built.
    #[derive(Default)]
    struct CountingFactory {
        made: Arc<AtomicUsize>,
    }

    impl ConnectionFactory for CountingFactory {
        fn make(&self, config: &ConnectionConfig) -> Result<Connection, ElasticError> {
            self.made.fetch_add(1, Ordering::SeqCst);
            Ok(Connection::new(Arc::new(NullBackend), config))
        }
    }

    fn config() -> ElasticConfig {
        ElasticConfig::new("default")
            .with_connection(
                ConnectionConfig::new("default")
                    .with_index("material-log")
                    .with_time_zone("+08:00"),
            )
            .with_connection(
                ConnectionConfig::new("audit")
                    .with_index("audit-*")
                    .with_doc_type("entry"),
            )
    }

    fn manager() -> (ElasticManager, Arc<AtomicUsize>) {
        let factory = CountingFactory::default();
        let made = Arc::clone(&factory.made);
        (ElasticManager::with_factory(config(), Box::new(factory)), made)
    }

    #[test]
    fn test_same_name_returns_cached_connection() {
        let (manager, made) = manager();

        let first = manager.connection(Some("audit")).unwrap();
        let second = manager.connection(Some("audit")).unwrap();

        assert!(first.ptr_eq(&second));
        assert_eq!(made.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_default_name_shares_cache() {
        let (manager, made) = manager();

        let by_default = manager.connection(None).unwrap();
        let by_name = manager.connection(Some("default")).unwrap();

        assert!(by_default.ptr_eq(&by_name));
        assert_eq!(by_default.index(), "material-log");
        assert_eq!(made.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_empty_name_resolves_default() {
        let (manager, made) = manager();

        let by_empty = manager.connection(Some("")).unwrap();
        let by_default = manager.connection(None).unwrap();

        assert!(by_empty.ptr_eq(&by_default));
        assert_eq!(by_empty.name(), "default");
        assert_eq!(made.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_distinct_names_distinct_connections() {
        let (manager, made) = manager();

        let default = manager.connection(None).unwrap();
        let audit = manager.connection(Some("audit")).unwrap();

        assert!(!default.ptr_eq(&audit));
        assert_eq!(audit.doc_type(), Some("entry"));
        assert_eq!(made.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_unknown_name_is_configuration_error() {
        let (manager, made) = manager();

        let result = manager.connection(Some("reports"));
        assert!(matches!(result, Err(ElasticError::ConfigurationError(_))));
        assert!(matches!(
            manager.configuration("reports"),
            Err(ElasticError::ConfigurationError(_))
        ));
        assert_eq!(made.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_missing_default_fails_eagerly() {
        let manager = ElasticManager::with_factory(
            ElasticConfig::new("missing"),
            Box::new(CountingFactory::default()),
        );

        assert!(matches!(
            manager.index(),
            Err(ElasticError::ConfigurationError(_))
        ));
        assert!(manager.query().is_err());
    }

    #[test]
    fn test_concurrent_first_access_builds_once() {
        let (manager, made) = manager();

        let connections: Vec<Connection> = thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| manager.connection(Some("default")).unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(made.load(Ordering::SeqCst), 1);
        assert!(connections.iter().all(|c| c.ptr_eq(&connections[0])));
    }

    #[test]
    fn test_default_connection_shortcuts() {
        let (manager, _) = manager();

        assert_eq!(manager.default_connection_name(), "default");
        assert_eq!(manager.index().unwrap(), "material-log");
        assert_eq!(manager.doc_type().unwrap(), None);
        assert_eq!(manager.time_zone().unwrap(), "+08:00");
        assert_eq!(manager.configuration("audit").unwrap().index, "audit-*");
    }

    #[tokio::test]
    async fn test_query_through_manager() {
        let (manager, _) = manager();

        let count = manager.query().unwrap().term("material_type", 1).count().await;
        assert_eq!(count.unwrap(), 3);

        let client = manager.client().unwrap();
        assert!(client.search(&manager.query().unwrap().compose_query()).await.is_ok());
    }
}
