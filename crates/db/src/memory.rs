use async_trait::async_trait;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::time::Duration;

use crate::store::{Collection, DataStore, Direction, Filter, FilterValue, StoreError};

/// In-process store holding fixed rows per collection.
///
/// Failures and latency can be injected per collection or per counted
/// `(column, value)` pair, and calls are counted so callers can assert how
/// many round trips an operation made.
#[derive(Default)]
pub struct MemoryStore {
    rows: HashMap<Collection, Vec<Value>>,
    failing_selects: HashSet<Collection>,
    failing_counts: Vec<(String, FilterValue)>,
    count_delays: Vec<((String, FilterValue), Duration)>,
    default_count_delay: Option<Duration>,
    select_calls: AtomicUsize,
    count_calls: AtomicUsize,
    counts_in_flight: AtomicUsize,
    max_counts_in_flight: AtomicUsize,
    completed_counts: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(mut self, collection: Collection, rows: Vec<Value>) -> Self {
        self.rows.entry(collection).or_default().extend(rows);
        self
    }

    pub fn failing_select(mut self, collection: Collection) -> Self {
        self.failing_selects.insert(collection);
        self
    }

    /// Any count whose filter contains `column = value` fails.
    pub fn failing_count(mut self, column: &str, value: impl Into<FilterValue>) -> Self {
        self.failing_counts.push((column.to_string(), value.into()));
        self
    }

    /// Any count whose filter contains `column = value` sleeps first.
    pub fn count_delay(
        mut self,
        column: &str,
        value: impl Into<FilterValue>,
        delay: Duration,
    ) -> Self {
        self.count_delays
            .push(((column.to_string(), value.into()), delay));
        self
    }

    pub fn default_count_delay(mut self, delay: Duration) -> Self {
        self.default_count_delay = Some(delay);
        self
    }

    pub fn select_calls(&self) -> usize {
        self.select_calls.load(AtomicOrdering::SeqCst)
    }

    pub fn count_calls(&self) -> usize {
        self.count_calls.load(AtomicOrdering::SeqCst)
    }

    /// Count calls that ran to the end, failed ones included.
    pub fn completed_counts(&self) -> usize {
        self.completed_counts.load(AtomicOrdering::SeqCst)
    }

    /// Highest number of count calls observed running at the same time.
    pub fn max_counts_in_flight(&self) -> usize {
        self.max_counts_in_flight.load(AtomicOrdering::SeqCst)
    }

    fn matching(&self, collection: Collection, filter: Option<&Filter>) -> Vec<Value> {
        let rows = self.rows.get(&collection).cloned().unwrap_or_default();
        let Some(filter) = filter else {
            return rows;
        };
        rows.into_iter()
            .filter(|row| {
                filter
                    .conditions()
                    .iter()
                    .all(|(column, value)| row.get(column).is_some_and(|v| value.matches(v)))
            })
            .collect()
    }

    fn delay_for(&self, filter: &Filter) -> Option<Duration> {
        self.count_delays
            .iter()
            .find(|(condition, _)| filter.conditions().contains(condition))
            .map(|(_, delay)| *delay)
            .or(self.default_count_delay)
    }
}

#[async_trait]
impl DataStore for MemoryStore {
    async fn select(
        &self,
        collection: Collection,
        filter: Option<&Filter>,
    ) -> Result<Vec<Value>, StoreError> {
        self.select_calls.fetch_add(1, AtomicOrdering::SeqCst);
        if self.failing_selects.contains(&collection) {
            return Err(StoreError::Unavailable(format!("select on {}", collection)));
        }

        let mut rows = self.matching(collection, filter);
        if let Some(order) = filter.and_then(Filter::order) {
            rows.sort_by(|a, b| {
                compare_values(a.get(&order.column), b.get(&order.column), order.direction)
            });
        }
        Ok(rows)
    }

    async fn count(&self, collection: Collection, filter: &Filter) -> Result<u64, StoreError> {
        self.count_calls.fetch_add(1, AtomicOrdering::SeqCst);
        let in_flight = self.counts_in_flight.fetch_add(1, AtomicOrdering::SeqCst) + 1;
        self.max_counts_in_flight
            .fetch_max(in_flight, AtomicOrdering::SeqCst);

        if let Some(delay) = self.delay_for(filter) {
            tokio::time::sleep(delay).await;
        }
        self.counts_in_flight.fetch_sub(1, AtomicOrdering::SeqCst);
        self.completed_counts.fetch_add(1, AtomicOrdering::SeqCst);

        if self
            .failing_counts
            .iter()
            .any(|condition| filter.conditions().contains(condition))
        {
            return Err(StoreError::Unavailable(format!("count on {}", collection)));
        }
        Ok(self.matching(collection, Some(filter)).len() as u64)
    }
}

// missing and null values sort last in either direction
fn compare_values(a: Option<&Value>, b: Option<&Value>, direction: Direction) -> Ordering {
    let ordering = match (a, b) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(Value::Bool(a)), Some(Value::Bool(b))) => a.cmp(b),
        (Some(Value::Null) | None, Some(Value::Null) | None) => return Ordering::Equal,
        (Some(Value::Null) | None, _) => return Ordering::Greater,
        (_, Some(Value::Null) | None) => return Ordering::Less,
        _ => Ordering::Equal,
    };
    match direction {
        Direction::Asc => ordering,
        Direction::Desc => ordering.reverse(),
    }
}
