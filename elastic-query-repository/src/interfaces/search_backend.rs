//! Search backend trait definition.
//!
//! This module defines the three calls this layer delegates to the wrapped
//! client. Everything else (transport, pooling, retries) belongs to the
//! implementation.

use async_trait::async_trait;

use crate::errors::SearchError;
use elastic_query_shared::{CountResponse, ScrollRequest, SearchRequest, SearchResponse};

/// Abstract interface to the search engine client.
///
/// Implementations receive fully composed requests and return the parsed
/// responses. They must not alter the request semantics.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` so one handle can be shared by
/// every connection clone.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Execute a search request.
    ///
    /// If the request carries a `scroll` keep-alive the response includes a
    /// scroll cursor for follow-up [`SearchBackend::scroll`] calls.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let response = backend.search(&request).await?;
    /// println!("Fetched {} hits", response.hits.hits.len());
    /// ```
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError>;

    /// Count documents matching the request's query.
    async fn count(&self, request: &SearchRequest) -> Result<CountResponse, SearchError>;

    /// Fetch the next batch of an open scroll.
    async fn scroll(&self, request: &ScrollRequest) -> Result<SearchResponse, SearchError>;
}
