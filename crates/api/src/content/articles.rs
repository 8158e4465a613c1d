use bulletin_core::types::Article;
use db::{queries, Collection, DataStore};
use std::sync::Arc;
use tracing::info;

use super::ContentError;

/// Published articles, newest first. One round trip, all or nothing.
#[derive(Clone)]
pub struct ArticleList {
    store: Arc<dyn DataStore>,
}

impl ArticleList {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    pub async fn fetch(&self) -> Result<Vec<Article>, ContentError> {
        let articles = queries::articles::list_published(self.store.as_ref())
            .await
            .map_err(|source| ContentError::Fetch {
                collection: Collection::Articles,
                source,
            })?;
        info!(count = articles.len(), "fetched articles");
        Ok(articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use db::MemoryStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_unpublished_never_returned() {
        let store = Arc::new(MemoryStore::new().with_rows(
            Collection::Articles,
            vec![
                json!({ "id": 1, "published": true, "created_at": "2024-01-10T00:00:00Z" }),
                json!({ "id": 2, "published": false, "created_at": "2030-01-01T00:00:00Z" }),
                json!({ "id": 3, "published": true, "created_at": "2024-02-10T00:00:00Z" }),
                json!({ "id": 4, "published": true, "created_at": "2023-12-31T23:59:59Z" }),
            ],
        ));

        let articles = ArticleList::new(store.clone()).fetch().await.unwrap();

        let ids: Vec<String> = articles.iter().map(|a| a.id.to_string()).collect();
        assert_eq!(ids, vec!["3", "1", "4"]);
        assert!(articles.iter().all(|a| a.published));
        assert_eq!(store.select_calls(), 1);
    }

    #[tokio::test]
    async fn test_offset_less_and_null_timestamps_are_served() {
        let store = Arc::new(MemoryStore::new().with_rows(
            Collection::Articles,
            vec![
                json!({ "id": 1, "published": true, "created_at": "2024-03-01T12:30:00" }),
                json!({ "id": 2, "published": true, "created_at": null }),
                json!({ "id": 3, "published": true, "created_at": "2024-03-01T12:30:00.123456+00:00" }),
            ],
        ));

        let articles = ArticleList::new(store).fetch().await.unwrap();

        assert_eq!(
            serde_json::to_value(&articles).unwrap(),
            json!([
                { "id": 3, "published": true, "created_at": "2024-03-01T12:30:00.123456+00:00" },
                { "id": 1, "published": true, "created_at": "2024-03-01T12:30:00" },
                { "id": 2, "published": true, "created_at": null }
            ])
        );
    }

    #[tokio::test]
    async fn test_fetch_failure_is_fatal() {
        let store = Arc::new(MemoryStore::new().failing_select(Collection::Articles));

        let err = ArticleList::new(store).fetch().await.unwrap_err();

        assert!(matches!(
            err,
            ContentError::Fetch {
                collection: Collection::Articles,
                ..
            }
        ));
    }
}
