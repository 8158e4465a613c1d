use async_trait::async_trait;
use reqwest::{header, Client, RequestBuilder, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::store::{column_ident, Collection, DataStore, Filter, StoreError};

/// Store reached over a PostgREST endpoint (`{url}/rest/v1/{table}`), the
/// dialect hosted Supabase projects expose.
#[derive(Clone)]
pub struct RestStore {
    client: Client,
    base_url: String,
    service_key: String,
}

impl RestStore {
    pub fn new(url: &str, service_key: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: url.trim_end_matches('/').to_string(),
            service_key: service_key.to_string(),
        })
    }

    fn endpoint(&self, collection: Collection) -> String {
        format!("{}/rest/v1/{}", self.base_url, collection.table())
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", self.service_key.as_str())
            .bearer_auth(&self.service_key)
    }
}

#[async_trait]
impl DataStore for RestStore {
    async fn select(
        &self,
        collection: Collection,
        filter: Option<&Filter>,
    ) -> Result<Vec<Value>, StoreError> {
        let params = query_params(filter, true)?;
        debug!(%collection, ?params, "select");
        let resp = self
            .authorize(self.client.get(self.endpoint(collection)))
            .query(&params)
            .send()
            .await?;
        let resp = ensure_success(resp).await?;
        Ok(resp.json::<Vec<Value>>().await?)
    }

    async fn count(&self, collection: Collection, filter: &Filter) -> Result<u64, StoreError> {
        let params = query_params(Some(filter), false)?;
        debug!(%collection, ?params, "count");
        let resp = self
            .authorize(self.client.head(self.endpoint(collection)))
            .header("Prefer", "count=exact")
            .query(&params)
            .send()
            .await?;
        let resp = ensure_success(resp).await?;

        let range = resp
            .headers()
            .get(header::CONTENT_RANGE)
            .ok_or_else(|| StoreError::MalformedCount("missing content-range".to_string()))?
            .to_str()
            .map_err(|_| StoreError::MalformedCount("non-ascii content-range".to_string()))?;
        parse_content_range(range).ok_or_else(|| StoreError::MalformedCount(range.to_string()))
    }
}

fn query_params(
    filter: Option<&Filter>,
    with_order: bool,
) -> Result<Vec<(String, String)>, StoreError> {
    let mut params = vec![("select".to_string(), "*".to_string())];
    let Some(filter) = filter else {
        return Ok(params);
    };

    for (column, value) in filter.conditions() {
        let column = column_ident(column)?;
        params.push((column.to_string(), format!("eq.{}", value.to_text())));
    }
    if with_order {
        if let Some(order) = filter.order() {
            let column = column_ident(&order.column)?;
            params.push((
                "order".to_string(),
                format!("{}.{}", column, order.direction.as_str()),
            ));
        }
    }
    Ok(params)
}

async fn ensure_success(resp: Response) -> Result<Response, StoreError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(StoreError::Status {
        status: status.as_u16(),
        body,
    })
}

/// Total from a `Content-Range` header such as `0-24/57` or `*/0`.
fn parse_content_range(value: &str) -> Option<u64> {
    let (_, total) = value.split_once('/')?;
    total.trim().parse().ok()
}
