//! Recording backend used by unit tests.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::errors::SearchError;
use crate::interfaces::SearchBackend;
use elastic_query_shared::{CountResponse, ScrollRequest, SearchRequest, SearchResponse};

/// Mock backend that records every request and replays queued responses.
#[derive(Default)]
pub(crate) struct MockBackend {
    searches: Arc<Mutex<Vec<SearchRequest>>>,
    counts: Arc<Mutex<Vec<SearchRequest>>>,
    scrolls: Arc<Mutex<Vec<ScrollRequest>>>,
    responses: Arc<Mutex<VecDeque<SearchResponse>>>,
    count: u64,
    should_fail: bool,
}

impl MockBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    pub(crate) fn with_count(mut self, count: u64) -> Self {
        self.count = count;
        self
    }

    /// Queue responses returned by successive search and scroll calls.
    pub(crate) fn with_responses(self, responses: Vec<SearchResponse>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into())),
            ..self
        }
    }

    pub(crate) async fn search_requests(&self) -> Vec<SearchRequest> {
        self.searches.lock().await.clone()
    }

    pub(crate) async fn count_requests(&self) -> Vec<SearchRequest> {
        self.counts.lock().await.clone()
    }

    pub(crate) async fn scroll_requests(&self) -> Vec<ScrollRequest> {
        self.scrolls.lock().await.clone()
    }

    async fn next_response(&self) -> SearchResponse {
        self.responses.lock().await.pop_front().unwrap_or_default()
    }
}

#[async_trait]
impl SearchBackend for MockBackend {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError> {
        if self.should_fail {
            return Err(SearchError::connection("Mock failure"));
        }
        self.searches.lock().await.push(request.clone());
        Ok(self.next_response().await)
    }

    async fn count(&self, request: &SearchRequest) -> Result<CountResponse, SearchError> {
        if self.should_fail {
            return Err(SearchError::connection("Mock failure"));
        }
        self.counts.lock().await.push(request.clone());
        Ok(CountResponse { count: self.count })
    }

    async fn scroll(&self, request: &ScrollRequest) -> Result<SearchResponse, SearchError> {
        if self.should_fail {
            return Err(SearchError::connection("Mock failure"));
        }
        self.scrolls.lock().await.push(request.clone());
        Ok(self.next_response().await)
    }
}
