use bulletin_core::types::{Channel, EnrichedChannel};
use db::{queries, Collection, DataStore};
use futures_util::future::join_all;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, Instrument};

use super::ContentError;

/// Lists channels and attaches a subscriber count to each one.
///
/// Counts are fetched with one query per channel, all in flight at once
/// unless a concurrency limit is set. A failed count degrades that channel
/// to zero subscribers; it never fails the listing.
#[derive(Clone)]
pub struct ChannelEnrichment {
    store: Arc<dyn DataStore>,
    limiter: Option<Arc<Semaphore>>,
}

impl ChannelEnrichment {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self {
            store,
            limiter: None,
        }
    }

    /// Cap the number of count queries in flight. `None` removes the cap and
    /// a limit of zero is treated as one.
    pub fn with_max_concurrency(mut self, limit: Option<usize>) -> Self {
        self.limiter = limit.map(|limit| Arc::new(Semaphore::new(limit.max(1))));
        self
    }

    /// Base fetch, then enrichment. A failed base fetch fails the whole call.
    pub async fn list(&self) -> Result<Vec<EnrichedChannel>, ContentError> {
        let channels = queries::channels::list(self.store.as_ref())
            .await
            .map_err(|source| ContentError::Fetch {
                collection: Collection::Channels,
                source,
            })?;
        info!(count = channels.len(), "fetched channels");

        Ok(self.enrich(channels).await)
    }

    /// One subscriber count per input channel, returned in input order.
    ///
    /// Each count runs as its own task, so dropping this future does not stop
    /// counts that were already launched.
    pub async fn enrich(&self, channels: Vec<Channel>) -> Vec<EnrichedChannel> {
        let handles: Vec<_> = channels
            .iter()
            .map(|channel| {
                let store = Arc::clone(&self.store);
                let limiter = self.limiter.clone();
                let channel_id = channel.id.clone();
                tokio::spawn(async move {
                    let _permit = match limiter {
                        Some(limiter) => limiter.acquire_owned().await.ok(),
                        None => None,
                    };
                    queries::subscriptions::count_for_channel(store.as_ref(), &channel_id).await
                }
                .in_current_span())
            })
            .collect();

        let results = join_all(handles).await;

        channels
            .into_iter()
            .zip(results)
            .map(|(channel, result)| {
                let failure = match result {
                    Ok(Ok(count)) => return EnrichedChannel::new(channel, count),
                    Ok(Err(err)) => ContentError::PartialAggregation {
                        channel_id: channel.id.clone(),
                        source: Box::new(err),
                    },
                    Err(err) => ContentError::PartialAggregation {
                        channel_id: channel.id.clone(),
                        source: Box::new(err),
                    },
                };
                error!(
                    channel_id = %channel.id,
                    error = %failure.details(),
                    "subscriber count failed, defaulting to 0"
                );
                EnrichedChannel::new(channel, 0)
            })
            .collect()
    }
}
