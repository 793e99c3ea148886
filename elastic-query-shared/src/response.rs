//! Response shapes returned by the search engine client.
//!
//! Only the parts this layer reads are modelled; hits stay opaque JSON
//! documents whose fields are defined by the caller's index.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response of a search or scroll call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Cursor for the next scroll batch, present when the search opened a scroll.
    #[serde(rename = "_scroll_id", default, skip_serializing_if = "Option::is_none")]
    pub scroll_id: Option<String>,
    #[serde(default)]
    pub hits: Hits,
}

/// The `hits` section of a search response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hits {
    #[serde(default)]
    pub hits: Vec<Value>,
}

impl SearchResponse {
    /// Build a response from hit documents, mostly useful for test backends.
    pub fn new(hits: Vec<Value>, scroll_id: Option<String>) -> Self {
        Self {
            scroll_id,
            hits: Hits { hits },
        }
    }

    pub fn into_hits(self) -> Vec<Value> {
        self.hits.hits
    }
}

/// Response of a count call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountResponse {
    pub count: u64,
}
