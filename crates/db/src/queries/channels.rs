use bulletin_core::types::Channel;

use super::decode_rows;
use crate::store::{Collection, DataStore, StoreError};

/// Every channel, in the order the store returns them.
pub async fn list(store: &dyn DataStore) -> Result<Vec<Channel>, StoreError> {
    let rows = store.select(Collection::Channels, None).await?;
    decode_rows(Collection::Channels, rows)
}
