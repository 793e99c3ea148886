//! Configuration loading for elastic connections.

mod elastic_config;

pub use elastic_config::ElasticConfig;
