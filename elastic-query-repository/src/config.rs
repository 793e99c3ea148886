//! Configuration types for query builders.

use std::time::Duration;

use elastic_query_shared::DEFAULT_TIME_FIELD;

/// Keep-alive used for scroll continuations when none was configured.
pub const DEFAULT_SCROLL_KEEP_ALIVE: Duration = Duration::from_secs(30);

/// Defaults applied by every query builder created from a connection.
#[derive(Debug, Clone)]
pub struct QueryConfig {
    /// Field used by `set_time_range`, `latest` and `oldest`.
    pub time_field: String,
    /// Keep-alive sent with scroll continuations unless the builder sets one.
    pub scroll_keep_alive: Duration,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            time_field: DEFAULT_TIME_FIELD.to_string(),
            scroll_keep_alive: DEFAULT_SCROLL_KEEP_ALIVE,
        }
    }
}

impl QueryConfig {
    /// Create a config with a custom time field.
    pub fn with_time_field(time_field: impl Into<String>) -> Self {
        Self {
            time_field: time_field.into(),
            ..Default::default()
        }
    }

    /// Set the default scroll keep-alive.
    pub fn scroll_keep_alive(mut self, keep_alive: Duration) -> Self {
        self.scroll_keep_alive = keep_alive;
        self
    }
}

/// Render a keep-alive in the `<seconds>s` form the engine expects.
pub(crate) fn keep_alive_param(keep_alive: Duration) -> String {
    format!("{}s", keep_alive.as_secs())
}
