use bulletin_core::types::Article;

use super::decode_rows;
use crate::store::{Collection, DataStore, Direction, Filter, StoreError};

/// Published articles, newest first.
pub async fn list_published(store: &dyn DataStore) -> Result<Vec<Article>, StoreError> {
    let filter = Filter::new()
        .eq("published", true)
        .order_by("created_at", Direction::Desc);
    let rows = store.select(Collection::Articles, Some(&filter)).await?;
    decode_rows(Collection::Articles, rows)
}
