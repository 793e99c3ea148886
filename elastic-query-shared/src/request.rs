//! Request shapes handed to the search engine client.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A fully composed search or count request.
///
/// Serialises to the nested structure the client consumes:
///
/// ```text
/// {
///     "index": "logs-*",
///     "type": "doc",            // only when configured
///     "scroll": "30s",          // only when a keep-alive is set
///     "size": 50,               // per-shard scroll batch size
///     "body": { "query": { "bool": { "filter": [...] } }, ... }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub index: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none", default)]
    pub doc_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub scroll: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub size: Option<u64>,
    pub body: Value,
}

impl SearchRequest {
    /// Look up a value inside the body by dotted path, e.g. `query.bool.must`.
    pub fn body_at(&self, path: &str) -> Option<&Value> {
        path.split('.')
            .try_fold(&self.body, |value, key| value.get(key))
    }

    /// Remove a top-level key from the body, returning it if present.
    pub fn remove_body_key(&mut self, key: &str) -> Option<Value> {
        self.body.as_object_mut().and_then(|body| body.remove(key))
    }
}

/// Continuation request for a scroll cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrollRequest {
    pub scroll_id: String,
    /// Keep-alive for the scroll context, e.g. `30s`.
    pub scroll: String,
}
