use bulletin_core::types::RecordId;

use crate::store::{Collection, DataStore, Filter, StoreError};

pub async fn count_for_channel(
    store: &dyn DataStore,
    channel_id: &RecordId,
) -> Result<u64, StoreError> {
    let filter = Filter::new().eq("channel_id", channel_id);
    store.count(Collection::Subscriptions, &filter).await
}
