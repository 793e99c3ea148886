//! # Elastic Query Repository
//!
//! This crate provides connections to a search engine and a fluent query
//! builder on top of them. It includes definitions for errors, the backend
//! interface, and a concrete implementation for OpenSearch.

pub mod config;
pub mod connection;
pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod query_builder;

#[cfg(test)]
mod testing;

pub use config::QueryConfig;
pub use connection::{Connection, ConnectionFactory};
pub use errors::{ElasticError, SearchError};
pub use interfaces::SearchBackend;
pub use self::opensearch::{OpenSearchBackend, OpenSearchConnectionFactory};
pub use query_builder::QueryBuilder;
