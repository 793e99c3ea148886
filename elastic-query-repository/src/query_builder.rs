//! Fluent builder for search request bodies.
//!
//! A `QueryBuilder` accumulates query options through chained calls and
//! compiles them into a [`SearchRequest`] only when a terminal operation
//! (`get`, `count`, `scroll`) runs. The builder is stateful: it can be
//! reused across terminal calls, and it remembers the scroll cursor of the
//! last response.
//!
//! A compiled request looks like:
//!
//! ```text
//! {
//!     "index": "logs-*",
//!     "scroll": "30s",
//!     "size": 50,
//!     "body": {
//!         "query": {
//!             "bool": {
//!                 "filter": [
//!                     { "range": { "@timestamp": {
//!                         "gte": "2018-04-03 11:00:00",
//!                         "lte": "2018-04-04 21:00:00",
//!                         "format": "yyyy-MM-dd HH:mm:ss",
//!                         "time_zone": "+08:00"
//!                     } } }
//!                 ],
//!                 "must": [
//!                     { "term": { "material_id": 268 } },
//!                     { "term": { "material_type": 1 } }
//!                 ]
//!             }
//!         },
//!         "sort": [ { "@timestamp": { "order": "desc" } } ],
//!         "from": 5,
//!         "size": 2
//!     }
//! }
//! ```

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use tracing::{debug, instrument};

use crate::config::keep_alive_param;
use crate::connection::Connection;
use crate::errors::{ElasticError, SearchError};
use elastic_query_shared::{Condition, ScrollRequest, SearchRequest, SortDirection, TimeRange};

/// chrono pattern matching the `yyyy-MM-dd HH:mm:ss` range format.
const RANGE_BOUND_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Body keys that have no meaning for a count request.
const NON_COUNT_BODY_KEYS: [&str; 4] = ["from", "size", "sort", "_source"];

#[derive(Debug, Clone, Default)]
struct QueryState {
    index: Option<String>,
    doc_type: Option<Option<String>>,
    selected_fields: Vec<String>,
    time_range: Option<TimeRange>,
    terms: BTreeMap<Condition, Vec<(String, Value)>>,
    orders: Vec<(String, SortDirection)>,
    from: Option<u64>,
    size: Option<u64>,
    scroll_size: Option<u64>,
    scroll_keep_alive: Option<Duration>,
    scroll_id: Option<String>,
}

/// Builder for search, count and scroll requests against one connection.
///
/// # Example
///
/// ```ignore
/// let mut query = connection
///     .query()
///     .set_time_range("2018-04-03 11:00:00", "2018-04-04 21:00:00")
///     .term("material_id", 268)
///     .latest()
///     .from(5)
///     .size(2);
///
/// let hits = query.get().await?;
/// let total = query.count().await?;
/// ```
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    connection: Connection,
    state: QueryState,
}

impl QueryBuilder {
    /// Create an empty builder bound to `connection`.
    pub fn new(connection: Connection) -> Self {
        Self {
            connection,
            state: QueryState::default(),
        }
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Scroll cursor returned by the last search or scroll response.
    pub fn scroll_id(&self) -> Option<&str> {
        self.state.scroll_id.as_deref()
    }

    /// Limit returned `_source` fields to exactly `fields`.
    ///
    /// Replaces any earlier selection. Duplicates are dropped, keeping the
    /// first occurrence. The selection applies to the next compiled request
    /// only.
    pub fn select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state.selected_fields.clear();
        for field in fields {
            let field = field.into();
            if !self.state.selected_fields.contains(&field) {
                self.state.selected_fields.push(field);
            }
        }
        self
    }

    /// Filter on the default time field between `start` and `end` inclusive.
    ///
    /// Bounds are `yyyy-MM-dd HH:mm:ss` strings interpreted in the
    /// connection's timezone.
    pub fn set_time_range(self, start: impl Into<String>, end: impl Into<String>) -> Self {
        let field = self.connection.query_config().time_field.clone();
        self.set_time_range_on(field, start, end)
    }

    /// Filter on `field` between `start` and `end` inclusive.
    ///
    /// Only one time range is held; a later call replaces the earlier one.
    pub fn set_time_range_on(
        mut self,
        field: impl Into<String>,
        start: impl Into<String>,
        end: impl Into<String>,
    ) -> Self {
        self.state.time_range = Some(TimeRange::new(field, start, end));
        self
    }

    /// Same as [`QueryBuilder::set_time_range`] with chrono bounds.
    pub fn set_time_range_between(self, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        self.set_time_range(
            start.format(RANGE_BOUND_FORMAT).to_string(),
            end.format(RANGE_BOUND_FORMAT).to_string(),
        )
    }

    /// Require `field` to equal `value`.
    pub fn term(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.term_with(field, value, Condition::Must)
    }

    /// Add `field == value` as an alternative: at least one should-term must match.
    pub fn should(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.term_with(field, value, Condition::Should)
    }

    /// Add an equality filter under `condition`.
    ///
    /// Repeated calls accumulate, even for the same field, in call order.
    pub fn term_with(
        mut self,
        field: impl Into<String>,
        value: impl Into<Value>,
        condition: Condition,
    ) -> Self {
        self.state
            .terms
            .entry(condition)
            .or_default()
            .push((field.into(), value.into()));
        self
    }

    /// Sort by `field` in `direction`.
    ///
    /// Fields keep the position of their first `order` call; setting a field
    /// again only changes its direction.
    pub fn order(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        let field = field.into();
        match self.state.orders.iter_mut().find(|(f, _)| *f == field) {
            Some((_, existing)) => *existing = direction,
            None => self.state.orders.push((field, direction)),
        }
        self
    }

    /// Newest documents first, by the default time field.
    pub fn latest(self) -> Self {
        let field = self.connection.query_config().time_field.clone();
        self.latest_by(field)
    }

    pub fn latest_by(self, field: impl Into<String>) -> Self {
        self.order(field, SortDirection::Desc)
    }

    /// Oldest documents first, by the default time field.
    pub fn oldest(self) -> Self {
        let field = self.connection.query_config().time_field.clone();
        self.oldest_by(field)
    }

    pub fn oldest_by(self, field: impl Into<String>) -> Self {
        self.order(field, SortDirection::Asc)
    }

    /// Offset of the first hit within the whole result set.
    pub fn from(mut self, offset: u64) -> Self {
        self.state.from = Some(offset);
        self
    }

    /// Number of hits in a single page.
    pub fn size(mut self, size: u64) -> Self {
        self.state.size = Some(size);
        self
    }

    /// Per-shard batch size of a scrolled search. Independent of `size`.
    pub fn scroll_size(mut self, scroll_size: u64) -> Self {
        self.state.scroll_size = Some(scroll_size);
        self
    }

    /// Keep the scroll context alive for `seconds` between scroll calls.
    ///
    /// Setting a keep-alive makes `get` open a scroll.
    pub fn set_scroll_keep_time(mut self, seconds: u64) -> Self {
        self.state.scroll_keep_alive = Some(Duration::from_secs(seconds));
        self
    }

    /// Query `index` instead of the connection's index.
    ///
    /// Only this builder is affected; the connection keeps its own index.
    pub fn index(mut self, index: impl Into<String>) -> Self {
        self.state.index = Some(index.into());
        self
    }

    /// Query with `doc_type` instead of the connection's mapping type.
    /// `None` or an empty type addresses the index only.
    pub fn doc_type(mut self, doc_type: Option<&str>) -> Self {
        self.state.doc_type = Some(doc_type.filter(|t| !t.is_empty()).map(str::to_string));
        self
    }

    /// Compile the accumulated options into a request.
    ///
    /// Clears the field selection; all other options are kept for later
    /// calls.
    pub fn compose_query(&mut self) -> SearchRequest {
        let mut filter = Vec::new();
        if let Some(range) = &self.state.time_range {
            filter.push(range.to_filter(self.connection.time_zone()));
        }

        let mut bool_query = Map::new();
        bool_query.insert("filter".to_string(), Value::Array(filter));
        for (condition, terms) in &self.state.terms {
            let clauses = terms
                .iter()
                .map(|(field, value)| json!({ "term": { field.as_str(): value } }))
                .collect();
            bool_query.insert(condition.as_str().to_string(), Value::Array(clauses));
        }
        if self.state.terms.contains_key(&Condition::Should) {
            bool_query.insert("minimum_should_match".to_string(), json!(1));
        }

        let mut body = Map::new();
        body.insert("query".to_string(), json!({ "bool": bool_query }));

        if !self.state.selected_fields.is_empty() {
            let fields = std::mem::take(&mut self.state.selected_fields);
            body.insert("_source".to_string(), json!(fields));
        }
        if let Some(from) = self.state.from {
            body.insert("from".to_string(), json!(from));
        }
        if let Some(size) = self.state.size {
            body.insert("size".to_string(), json!(size));
        }
        if !self.state.orders.is_empty() {
            let sort: Vec<Value> = self
                .state
                .orders
                .iter()
                .map(|(field, direction)| json!({ field.as_str(): { "order": direction.as_str() } }))
                .collect();
            body.insert("sort".to_string(), Value::Array(sort));
        }

        let index = match &self.state.index {
            Some(index) => index.clone(),
            None => self.connection.index().to_string(),
        };
        let doc_type = match &self.state.doc_type {
            Some(doc_type) => doc_type.clone(),
            None => self.connection.doc_type().map(str::to_string),
        };

        SearchRequest {
            index,
            doc_type,
            scroll: self.state.scroll_keep_alive.map(keep_alive_param),
            size: self.state.scroll_size,
            body: Value::Object(body),
        }
    }

    /// Run the search and return the matching hits.
    ///
    /// Records the scroll cursor of the response (or clears it when the
    /// response has none).
    #[instrument(skip(self), fields(connection = %self.connection.name()))]
    pub async fn get(&mut self) -> Result<Vec<Value>, ElasticError> {
        let request = self.compose_query();
        debug!(request = ?request, "Composed search request");

        let response = self.connection.client().search(&request).await?;
        self.state.scroll_id = response.scroll_id.clone();

        let hits = response.into_hits();
        debug!(hits = hits.len(), scroll = self.state.scroll_id.is_some(), "Search completed");
        Ok(hits)
    }

    /// Run the search and deserialize each hit's `_source` into `T`.
    pub async fn get_sources<T: DeserializeOwned>(&mut self) -> Result<Vec<T>, ElasticError> {
        let hits = self.get().await?;
        hits.into_iter().map(parse_source::<T>).collect()
    }

    /// Count documents matching the query.
    ///
    /// Pagination, sorting, field selection and scroll options are left out
    /// of the count request.
    #[instrument(skip(self), fields(connection = %self.connection.name()))]
    pub async fn count(&mut self) -> Result<u64, ElasticError> {
        let mut request = self.compose_query();
        request.scroll = None;
        request.size = None;
        for key in NON_COUNT_BODY_KEYS {
            request.remove_body_key(key);
        }
        debug!(request = ?request, "Composed count request");

        let response = self.connection.client().count(&request).await?;
        Ok(response.count)
    }

    /// Fetch the next batch of hits of the scroll opened by `get`.
    ///
    /// # Errors
    ///
    /// Returns `ElasticError::PreconditionError` without contacting the
    /// backend when no scroll cursor is held.
    #[instrument(skip(self), fields(connection = %self.connection.name()))]
    pub async fn scroll(&mut self) -> Result<Vec<Value>, ElasticError> {
        let scroll_id = self.state.scroll_id.clone().ok_or_else(|| {
            ElasticError::precondition("scroll() requires a scroll cursor from a previous get()")
        })?;
        let keep_alive = self
            .state
            .scroll_keep_alive
            .unwrap_or(self.connection.query_config().scroll_keep_alive);

        let request = ScrollRequest {
            scroll_id,
            scroll: keep_alive_param(keep_alive),
        };
        let response = self.connection.client().scroll(&request).await?;
        self.state.scroll_id = response.scroll_id.clone();

        let hits = response.into_hits();
        debug!(hits = hits.len(), "Scroll batch fetched");
        Ok(hits)
    }
}

fn parse_source<T: DeserializeOwned>(mut hit: Value) -> Result<T, ElasticError> {
    let source = hit
        .get_mut("_source")
        .map(Value::take)
        .ok_or_else(|| SearchError::parse("hit has no _source"))?;
    serde_json::from_value(source).map_err(|e| SearchError::parse(e.to_string()).into())
}
