//! Query option types.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

/// Field used by time range and time ordering helpers when none is given.
pub const DEFAULT_TIME_FIELD: &str = "@timestamp";

/// Date format sent with every time range filter.
pub const DATE_FORMAT: &str = "yyyy-MM-dd HH:mm:ss";

/// Boolean composition kind for term filters.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    /// Every clause must match (AND).
    #[default]
    Must,
    /// At least one clause should match (OR).
    Should,
}

impl Condition {
    /// Key used for this condition inside a `bool` query.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Must => "must",
            Self::Should => "should",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive time range on a single field.
///
/// Bounds are kept as strings in `yyyy-MM-dd HH:mm:ss` form; the timezone is
/// supplied by the connection when the filter is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeRange {
    pub field: String,
    pub start: String,
    pub end: String,
}

impl TimeRange {
    pub fn new(field: impl Into<String>, start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            start: start.into(),
            end: end.into(),
        }
    }

    /// Render as a `range` filter clause.
    pub fn to_filter(&self, time_zone: &str) -> Value {
        json!({
            "range": {
                self.field.as_str(): {
                    "gte": self.start,
                    "lte": self.end,
                    "format": DATE_FORMAT,
                    "time_zone": time_zone
                }
            }
        })
    }
}
