#[cfg(any(test, feature = "test-util"))]
pub mod memory;
pub mod postgres;
pub mod queries;
pub mod rest;
pub mod store;

use bulletin_core::config::StoreSettings;
use std::sync::Arc;

#[cfg(any(test, feature = "test-util"))]
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use rest::RestStore;
pub use store::{Collection, DataStore, Direction, Filter, FilterValue, StoreError};

/// Build the store client for the configured backend. Called once at startup;
/// the returned handle is shared for the life of the process.
pub async fn connect(settings: &StoreSettings) -> Result<Arc<dyn DataStore>, StoreError> {
    let store: Arc<dyn DataStore> = match settings {
        StoreSettings::Postgres {
            database_url,
            max_connections,
        } => Arc::new(PgStore::connect(database_url, *max_connections).await?),
        StoreSettings::Rest {
            url,
            service_key,
            timeout,
        } => Arc::new(RestStore::new(url, service_key, *timeout)?),
    };
    Ok(store)
}
