//! # Elastic Query
//!
//! Named search engine connections with a fluent query builder.
//!
//! This crate provides the connection registry, configuration loading and
//! the optional process-wide manager. Connections and the query builder
//! live in `elastic-query-repository` and are re-exported here.

pub mod config;
pub mod facade;
pub mod manager;

pub use config::ElasticConfig;
pub use manager::ElasticManager;

pub use elastic_query_repository::{
    Connection, ConnectionFactory, ElasticError, OpenSearchBackend, OpenSearchConnectionFactory,
    QueryBuilder, QueryConfig, SearchBackend, SearchError,
};
pub use elastic_query_shared::{Condition, ConnectionConfig, SortDirection};
