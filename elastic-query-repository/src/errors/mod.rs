//! Error types for the elastic query repository.

mod elastic_error;
mod search_error;

pub use elastic_error::ElasticError;
pub use search_error::SearchError;
