//! # Elastic Query Shared
//!
//! Plain data types shared between the repository and the registry crates:
//! connection configuration, query option enums, and the request/response
//! shapes exchanged with the search engine client.

pub mod config;
pub mod query;
pub mod request;
pub mod response;

pub use config::ConnectionConfig;
pub use query::{Condition, SortDirection, TimeRange, DATE_FORMAT, DEFAULT_TIME_FIELD};
pub use request::{ScrollRequest, SearchRequest};
pub use response::{CountResponse, Hits, SearchResponse};
