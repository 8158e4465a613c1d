use async_trait::async_trait;
use serde_json::Value;
use sqlx::{postgres::PgPoolOptions, types::Json, PgPool, Postgres, QueryBuilder};
use tracing::debug;

use crate::store::{column_ident, Collection, DataStore, Filter, StoreError};

/// Postgres-backed store. Rows come back as `to_jsonb` objects so every
/// column the table has is passed through.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DataStore for PgStore {
    async fn select(
        &self,
        collection: Collection,
        filter: Option<&Filter>,
    ) -> Result<Vec<Value>, StoreError> {
        let mut qb = select_query(collection, filter)?;
        debug!(%collection, sql = qb.sql(), "select");
        let rows = qb
            .build_query_scalar::<Json<Value>>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|row| row.0).collect())
    }

    async fn count(&self, collection: Collection, filter: &Filter) -> Result<u64, StoreError> {
        let mut qb = count_query(collection, filter)?;
        debug!(%collection, sql = qb.sql(), "count");
        let count = qb.build_query_scalar::<i64>().fetch_one(&self.pool).await?;
        u64::try_from(count).map_err(|_| StoreError::MalformedCount(count.to_string()))
    }
}

fn select_query(
    collection: Collection,
    filter: Option<&Filter>,
) -> Result<QueryBuilder<'static, Postgres>, StoreError> {
    let mut qb = QueryBuilder::new("SELECT to_jsonb(t) FROM \"");
    qb.push(collection.table()).push("\" AS t");

    if let Some(filter) = filter {
        push_conditions(&mut qb, filter)?;
        if let Some(order) = filter.order() {
            let column = column_ident(&order.column)?;
            qb.push(format!(
                " ORDER BY t.\"{}\" {}",
                column,
                order.direction.as_str().to_uppercase()
            ));
        }
    }

    Ok(qb)
}

fn count_query(
    collection: Collection,
    filter: &Filter,
) -> Result<QueryBuilder<'static, Postgres>, StoreError> {
    let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM \"");
    qb.push(collection.table()).push("\" AS t");
    push_conditions(&mut qb, filter)?;
    Ok(qb)
}

fn push_conditions(
    qb: &mut QueryBuilder<'static, Postgres>,
    filter: &Filter,
) -> Result<(), StoreError> {
    for (i, (column, value)) in filter.conditions().iter().enumerate() {
        let column = column_ident(column)?;
        qb.push(if i == 0 { " WHERE " } else { " AND " });
        qb.push(format!("t.\"{}\"::text = ", column))
            .push_bind(value.to_text());
    }
    Ok(())
}
