pub mod articles;
pub mod channels;
pub mod subscriptions;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::store::{Collection, StoreError};

fn decode_rows<T: DeserializeOwned>(
    collection: Collection,
    rows: Vec<Value>,
) -> Result<Vec<T>, StoreError> {
    rows.into_iter()
        .map(|row| {
            serde_json::from_value(row).map_err(|source| StoreError::Decode { collection, source })
        })
        .collect()
}
