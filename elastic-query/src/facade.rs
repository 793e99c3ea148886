//! Process-wide elastic manager.
//!
//! Applications that want a single shared registry install it once at
//! startup and reach it from anywhere through [`try_elastic`].

use once_cell::sync::OnceCell;

use crate::manager::ElasticManager;
use elastic_query_repository::ElasticError;

/// Global manager instance
static ELASTIC: OnceCell<ElasticManager> = OnceCell::new();

/// Install `manager` as the global manager.
pub fn init(manager: ElasticManager) -> Result<&'static ElasticManager, ElasticError> {
    ELASTIC
        .set(manager)
        .map_err(|_| ElasticError::configuration("Elastic manager already initialized"))?;
    try_elastic()
}

/// Install a manager built from `ELASTIC_*` environment variables.
pub fn init_from_env() -> Result<&'static ElasticManager, ElasticError> {
    init(ElasticManager::from_env()?)
}

/// Get the global manager.
pub fn try_elastic() -> Result<&'static ElasticManager, ElasticError> {
    ELASTIC
        .get()
        .ok_or_else(|| ElasticError::configuration("Elastic manager not initialized"))
}

/// Check if the global manager has been installed
pub fn is_initialized() -> bool {
    ELASTIC.get().is_some()
}
