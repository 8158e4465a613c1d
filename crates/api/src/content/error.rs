use bulletin_core::types::RecordId;
use db::{Collection, StoreError};
use std::error::Error as StdError;

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// A whole-result query failed. Fatal to the request.
    #[error("failed to fetch {collection}")]
    Fetch {
        collection: Collection,
        #[source]
        source: StoreError,
    },
    /// One per-channel count failed. Absorbed by the enrichment pipeline.
    #[error("failed to count subscribers for channel {channel_id}")]
    PartialAggregation {
        channel_id: RecordId,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl ContentError {
    /// The error and each of its sources, joined for logs and 500 bodies.
    pub fn details(&self) -> String {
        let mut details = self.to_string();
        let mut source = self.source();
        while let Some(err) = source {
            details.push_str(": ");
            details.push_str(&err.to_string());
            source = err.source();
        }
        details
    }
}
