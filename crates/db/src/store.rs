use async_trait::async_trait;
use bulletin_core::types::RecordId;
use serde_json::Value;
use std::fmt;

/// Tables this service reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Channels,
    Subscriptions,
    Articles,
}

impl Collection {
    pub fn table(self) -> &'static str {
        match self {
            Collection::Channels => "channels",
            Collection::Subscriptions => "subscriptions",
            Collection::Articles => "articles",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("store responded with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid column name {0:?}")]
    InvalidColumn(String),
    #[error("unexpected count response: {0}")]
    MalformedCount(String),
    #[error("failed to decode {collection} row: {source}")]
    Decode {
        collection: Collection,
        #[source]
        source: serde_json::Error,
    },
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Int(i64),
    Text(String),
    Bool(bool),
}

impl FilterValue {
    /// Textual form used by both the SQL `::text` comparison and PostgREST `eq.`.
    pub fn to_text(&self) -> String {
        match self {
            FilterValue::Int(value) => value.to_string(),
            FilterValue::Text(value) => value.clone(),
            FilterValue::Bool(value) => value.to_string(),
        }
    }

    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (FilterValue::Int(expected), Value::Number(n)) => n.as_i64() == Some(*expected),
            (FilterValue::Text(expected), Value::String(s)) => s == expected,
            (FilterValue::Bool(expected), Value::Bool(b)) => b == expected,
            _ => false,
        }
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Int(value)
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        FilterValue::Int(value.into())
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Bool(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<&RecordId> for FilterValue {
    fn from(value: &RecordId) -> Self {
        match value {
            RecordId::Int(id) => FilterValue::Int(*id),
            RecordId::Text(id) => FilterValue::Text(id.clone()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub direction: Direction,
}

/// Conjunction of equality conditions with an optional ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    conditions: Vec<(String, FilterValue)>,
    order: Option<Order>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: &str, value: impl Into<FilterValue>) -> Self {
        self.conditions.push((column.to_string(), value.into()));
        self
    }

    pub fn order_by(mut self, column: &str, direction: Direction) -> Self {
        self.order = Some(Order {
            column: column.to_string(),
            direction,
        });
        self
    }

    pub fn conditions(&self) -> &[(String, FilterValue)] {
        &self.conditions
    }

    pub fn order(&self) -> Option<&Order> {
        self.order.as_ref()
    }
}

/// Column names are spliced into queries, so only plain identifiers pass.
pub fn column_ident(column: &str) -> Result<&str, StoreError> {
    let mut chars = column.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    if valid {
        Ok(column)
    } else {
        Err(StoreError::InvalidColumn(column.to_string()))
    }
}

/// Query client for the remote store. One instance is built at startup and
/// shared by every request; backends hold no per-request state.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Every row of `collection` matching `filter`, as JSON objects.
    async fn select(
        &self,
        collection: Collection,
        filter: Option<&Filter>,
    ) -> Result<Vec<Value>, StoreError>;

    /// Number of rows of `collection` matching `filter`. Ordering is ignored.
    async fn count(&self, collection: Collection, filter: &Filter) -> Result<u64, StoreError>;
}
