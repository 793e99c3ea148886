//! OpenSearch client implementation.
//!
//! This module provides the concrete implementation of `SearchBackend`
//! using the OpenSearch Rust client.

use async_trait::async_trait;
use opensearch::{
    auth::Credentials,
    http::{
        headers::HeaderMap,
        request::JsonBody,
        response::Response,
        transport::{SingleNodeConnectionPool, TransportBuilder},
        Method,
    },
    OpenSearch,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error, info};
use url::Url;

use crate::errors::{ElasticError, SearchError};
use crate::interfaces::SearchBackend;
use elastic_query_shared::{
    ConnectionConfig, CountResponse, ScrollRequest, SearchRequest, SearchResponse,
};

/// Query string parameters of a search call.
#[derive(Debug, Serialize)]
struct SearchParams<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    scroll: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<u64>,
}

/// OpenSearch-backed implementation of [`SearchBackend`].
///
/// Requests are addressed as `/{index}/_search`, or `/{index}/{type}/_search`
/// when the connection has a mapping type, so older clusters that still use
/// types can be reached through the same client.
///
/// # Example
///
/// ```ignore
/// let config = ConnectionConfig::new("default").with_index("material-log");
/// let backend = OpenSearchBackend::new(&config)?;
/// let response = backend.search(&request).await?;
/// ```
#[derive(Clone)]
pub struct OpenSearchBackend {
    client: OpenSearch,
}

impl OpenSearchBackend {
    /// Create a client for the server described by `config`.
    ///
    /// Basic auth is enabled when a user is configured.
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchBackend)` - A new client instance
    /// * `Err(ElasticError::ConfigurationError)` - If the URL is invalid or
    ///   the transport cannot be built
    pub fn new(config: &ConnectionConfig) -> Result<Self, ElasticError> {
        let url = config.url();
        let parsed_url = Url::parse(&url).map_err(|e| {
            ElasticError::configuration(format!("Invalid URL {} for [{}]: {}", url, config.name, e))
        })?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let mut builder = TransportBuilder::new(conn_pool).disable_proxy();
        if config.has_credentials() {
            builder = builder.auth(Credentials::Basic(config.user.clone(), config.pass.clone()));
        }
        let transport = builder
            .build()
            .map_err(|e| ElasticError::configuration(e.to_string()))?;

        info!(
            connection = %config.name,
            url = %url,
            index = %config.index,
            "Created OpenSearch client"
        );

        Ok(Self {
            client: OpenSearch::new(transport),
        })
    }

    /// Wrap an already configured OpenSearch client.
    pub fn from_client(client: OpenSearch) -> Self {
        Self { client }
    }

    async fn post<Q, T>(
        &self,
        path: &str,
        params: Option<&Q>,
        body: Value,
    ) -> Result<T, SearchError>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!(path = %path, "Sending request");
        let response = self
            .client
            .send(
                Method::Post,
                path,
                HeaderMap::new(),
                params,
                Some(JsonBody::new(body)),
                None,
            )
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        Self::parse_response(path, response).await
    }

    async fn parse_response<T: DeserializeOwned>(
        path: &str,
        response: Response,
    ) -> Result<T, SearchError> {
        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, path = %path, body = %error_body, "Request failed");
            return Err(SearchError::query(format!(
                "Request to {} failed with status {}: {}",
                path, status, error_body
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| SearchError::parse(e.to_string()))
    }
}

/// Build the endpoint path for an index-level action.
fn endpoint(index: &str, doc_type: Option<&str>, action: &str) -> String {
    match doc_type {
        Some(doc_type) => format!("/{}/{}/{}", index, doc_type, action),
        None => format!("/{}/{}", index, action),
    }
}

#[async_trait]
impl SearchBackend for OpenSearchBackend {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError> {
        let path = endpoint(&request.index, request.doc_type.as_deref(), "_search");
        let params = SearchParams {
            scroll: request.scroll.as_deref(),
            size: request.size,
        };

        self.post(&path, Some(&params), request.body.clone()).await
    }

    async fn count(&self, request: &SearchRequest) -> Result<CountResponse, SearchError> {
        let path = endpoint(&request.index, request.doc_type.as_deref(), "_count");

        self.post::<SearchParams, _>(&path, None, request.body.clone())
            .await
    }

    async fn scroll(&self, request: &ScrollRequest) -> Result<SearchResponse, SearchError> {
        let body = json!({
            "scroll": request.scroll,
            "scroll_id": request.scroll_id
        });

        self.post::<SearchParams, _>("/_search/scroll", None, body)
            .await
    }
}
