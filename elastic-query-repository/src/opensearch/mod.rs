//! OpenSearch implementation of the search backend.
//!
//! This module provides the concrete `SearchBackend` using OpenSearch and
//! the connection factory that wires it into connections.

mod client;
mod factory;

pub use client::OpenSearchBackend;
pub use factory::OpenSearchConnectionFactory;
