use db::DataStore;
use std::sync::Arc;

use crate::content::{ArticleList, ChannelEnrichment};

#[derive(Clone)]
pub struct AppState {
    pub channels: ChannelEnrichment,
    pub articles: ArticleList,
}

impl AppState {
    /// Both services share the one store handle built at startup.
    pub fn new(store: Arc<dyn DataStore>, enrich_concurrency: Option<usize>) -> Self {
        Self {
            channels: ChannelEnrichment::new(Arc::clone(&store))
                .with_max_concurrency(enrich_concurrency),
            articles: ArticleList::new(store),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RequestId(pub String);
