//! Interface definitions for the search engine client.
//!
//! This module defines the abstract `SearchBackend` trait so connections can
//! be backed by OpenSearch in production and by recording mocks in tests.

mod search_backend;

pub use search_backend::SearchBackend;
