//! # In-Memory Backend
//!
//! Evaluates query descriptions directly against records held in a vector.
//! Column expressions are resolved through [`Record::field`], so records are
//! expected to answer both qualified (`p.id`) and plain (`id`) names where
//! queries use them. Joins are not evaluated: joined columns must be exposed
//! by the record itself.

use super::QueryBackend;
use crate::error::{PaginationError, Result};
use crate::models::{FieldValue, Record, SortDirection};
use crate::query_builder::{
    ComparisonOperator, Condition, LogicalOperator, QueryBuilder, WhereClause,
};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::cmp::Ordering;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use tracing::debug;

#[derive(Debug)]
pub struct InMemoryBackend<T> {
    records: RwLock<Vec<T>>,
    queries_executed: AtomicUsize,
}

impl<T: Record> Default for InMemoryBackend<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> InMemoryBackend<T> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            queries_executed: AtomicUsize::new(0),
        }
    }

    pub fn with_records(records: Vec<T>) -> Self {
        Self {
            records: RwLock::new(records),
            queries_executed: AtomicUsize::new(0),
        }
    }

    pub fn insert(&self, record: T) {
        self.records.write().push(record);
    }

    pub fn extend(&self, records: impl IntoIterator<Item = T>) {
        self.records.write().extend(records);
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Number of fetch/count calls served so far
    pub fn queries_executed(&self) -> usize {
        self.queries_executed.load(AtomicOrdering::Relaxed)
    }

    pub fn reset_query_counter(&self) {
        self.queries_executed.store(0, AtomicOrdering::Relaxed);
    }

    fn record_query(&self, kind: &str, query: &QueryBuilder) {
        self.queries_executed.fetch_add(1, AtomicOrdering::Relaxed);
        debug!(kind, sql = %query.build_sql(), "In-memory query");
    }

    fn column(record: &T, column: &str) -> Result<FieldValue> {
        record
            .field(column)
            .ok_or_else(|| PaginationError::backend(format!("Unknown column \"{column}\"")))
    }

    fn matches_clauses(record: &T, clauses: &[WhereClause]) -> Result<bool> {
        for clause in clauses {
            if !Self::matches_clause(record, clause)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn matches_clause(record: &T, clause: &WhereClause) -> Result<bool> {
        match clause.operator {
            LogicalOperator::And => {
                for condition in &clause.conditions {
                    if !Self::matches_condition(record, condition)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            LogicalOperator::Or => {
                if clause.conditions.is_empty() {
                    return Ok(true);
                }
                for condition in &clause.conditions {
                    if Self::matches_condition(record, condition)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }

    fn matches_condition(record: &T, condition: &Condition) -> Result<bool> {
        match condition {
            Condition::Simple {
                field,
                operator,
                value,
            } => {
                let actual = Self::column(record, field)?;
                Ok(Self::compare(&actual, *operator, value))
            }
            Condition::In { field, values } => {
                let actual = Self::column(record, field)?;
                Ok(values
                    .iter()
                    .any(|value| actual.compare_literal(value) == Some(Ordering::Equal)))
            }
            Condition::IsNull { field } => Ok(Self::column(record, field)?.is_null()),
            Condition::IsNotNull { field } => Ok(!Self::column(record, field)?.is_null()),
            Condition::Group(clause) => Self::matches_clause(record, clause),
            Condition::Raw { sql } => Err(PaginationError::backend(format!(
                "Raw SQL conditions cannot be evaluated in memory: {sql}"
            ))),
        }
    }

    fn compare(
        actual: &FieldValue,
        operator: ComparisonOperator,
        literal: &serde_json::Value,
    ) -> bool {
        if operator == ComparisonOperator::Like {
            return literal
                .as_str()
                .map(|pattern| actual.matches_like(pattern))
                .unwrap_or(false);
        }

        // NULL on either side never satisfies a comparison
        let Some(ordering) = actual.compare_literal(literal) else {
            return false;
        };

        match operator {
            ComparisonOperator::Eq => ordering == Ordering::Equal,
            ComparisonOperator::NotEq => ordering != Ordering::Equal,
            ComparisonOperator::Gt => ordering == Ordering::Greater,
            ComparisonOperator::Gte => ordering != Ordering::Less,
            ComparisonOperator::Lt => ordering == Ordering::Less,
            ComparisonOperator::Lte => ordering != Ordering::Greater,
            ComparisonOperator::Like => false,
        }
    }

    /// Matching records in storage order
    fn filtered(&self, query: &QueryBuilder) -> Result<Vec<T>>
    where
        T: Clone,
    {
        let records = self.records.read();
        let mut matching = Vec::new();
        for record in records.iter() {
            if Self::matches_clauses(record, query.where_clauses())? {
                matching.push(record.clone());
            }
        }
        Ok(matching)
    }

    fn sort(records: Vec<T>, query: &QueryBuilder) -> Result<Vec<T>> {
        let order_by = query.order_by_fields();
        if order_by.is_empty() {
            return Ok(records);
        }

        // Resolve every sort key up front so lookup errors surface before sorting
        let mut keyed: Vec<(Vec<FieldValue>, T)> = Vec::with_capacity(records.len());
        for record in records {
            let keys = order_by
                .iter()
                .map(|term| Self::column(&record, &term.expression))
                .collect::<Result<Vec<_>>>()?;
            keyed.push((keys, record));
        }

        keyed.sort_by(|(a, _), (b, _)| {
            a.iter()
                .zip(b)
                .zip(order_by)
                .map(|((a, b), term)| match term.direction {
                    SortDirection::Ascending => a.sort_cmp(b),
                    SortDirection::Descending => b.sort_cmp(a),
                })
                .find(|ordering| *ordering != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });

        Ok(keyed.into_iter().map(|(_, record)| record).collect())
    }

    /// One record per distinct grouping key, first in current order wins
    fn group(records: Vec<T>, group_by: &[String]) -> Result<Vec<T>> {
        if group_by.is_empty() {
            return Ok(records);
        }

        let mut seen: Vec<Vec<FieldValue>> = Vec::new();
        let mut grouped = Vec::new();
        for record in records {
            let key = group_by
                .iter()
                .map(|column| Self::column(&record, column))
                .collect::<Result<Vec<_>>>()?;
            if !seen.contains(&key) {
                seen.push(key);
                grouped.push(record);
            }
        }
        Ok(grouped)
    }
}

#[async_trait]
impl<T> QueryBackend for InMemoryBackend<T>
where
    T: Record + Clone + Send + Sync,
{
    type Item = T;

    async fn fetch(&self, query: &QueryBuilder) -> Result<Vec<T>> {
        self.record_query("fetch", query);

        let records = Self::sort(self.filtered(query)?, query)?;
        let records = Self::group(records, query.group_by_fields())?;

        Ok(match query.pagination() {
            Some(pagination) => pagination.apply(records),
            None => records,
        })
    }

    async fn count(&self, query: &QueryBuilder) -> Result<u64> {
        self.record_query("count", query);
        Ok(self.filtered(query)?.len() as u64)
    }

    async fn count_distinct(&self, query: &QueryBuilder, column: &str) -> Result<u64> {
        self.record_query("count_distinct", query);

        let mut values = self
            .filtered(query)?
            .iter()
            .map(|record| Self::column(record, column))
            .filter(|value| !matches!(value, Ok(FieldValue::Null)))
            .collect::<Result<Vec<_>>>()?;

        values.sort_by(|a, b| a.sort_cmp(b));
        values.dedup_by(|a, b| a.sort_cmp(b) == Ordering::Equal);
        Ok(values.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn backend() -> InMemoryBackend<Value> {
        InMemoryBackend::with_records(
            (1..=12)
                .map(|id| {
                    json!({
                        "id": id,
                        "name": format!("P{id}"),
                        "group_key": if id % 5 == 0 { Value::Null } else { json!(id % 3) },
                    })
                })
                .collect(),
        )
    }

    #[tokio::test]
    async fn test_fetch_orders_and_windows() {
        let query = QueryBuilder::new("parents").order_desc("id").limit(3).offset(1);
        let ids: Vec<i64> = backend()
            .fetch(&query)
            .await
            .expect("fetch succeeds")
            .iter()
            .filter_map(|record| record["id"].as_i64())
            .collect();

        assert_eq!(ids, vec![11, 10, 9]);
    }

    #[tokio::test]
    async fn test_numeric_literals_compare_numerically() {
        let query = QueryBuilder::new("parents")
            .where_clause(WhereClause::simple("id", ComparisonOperator::Gt, json!("9")))
            .order_asc("id");
        let records = backend().fetch(&query).await.expect("fetch succeeds");

        assert_eq!(records.len(), 3);
        assert_eq!(records[0]["id"], json!(10));
    }

    #[tokio::test]
    async fn test_counts() {
        let backend = backend();
        let all = QueryBuilder::new("parents");

        assert_eq!(backend.count(&all).await, Ok(12));
        assert_eq!(
            backend.count(&all.clone().where_like("name", "P1%")).await,
            Ok(4)
        );
        assert_eq!(backend.count_distinct(&all, "group_key").await, Ok(3));
        assert!(backend.exists(&all.where_null("group_key")).await.unwrap_or(false));
        assert_eq!(backend.queries_executed(), 4);
    }

    #[tokio::test]
    async fn test_group_by_keeps_first_of_each_group() {
        let query = QueryBuilder::new("parents")
            .group_by(&["group_key"])
            .order_asc("id");
        let records = backend().fetch(&query).await.expect("fetch succeeds");
        let ids: Vec<i64> = records.iter().filter_map(|r| r["id"].as_i64()).collect();

        assert_eq!(ids, vec![1, 2, 3, 5]);
    }

    #[tokio::test]
    async fn test_null_values_never_pass_a_boundary() {
        // an empty cursor element is what a NULL sort value encodes to
        let query = QueryBuilder::new("parents").where_clause(WhereClause::or(vec![
            Condition::simple("group_key", ComparisonOperator::Gt, json!("")),
            Condition::simple("group_key", ComparisonOperator::Eq, json!("")),
        ]));
        let records = backend().fetch(&query).await.expect("fetch succeeds");

        assert!(records.iter().all(|record| !record["group_key"].is_null()));
    }

    #[tokio::test]
    async fn test_raw_and_unknown_columns_are_backend_errors() {
        let backend = backend();

        let raw = QueryBuilder::new("parents").where_clause(WhereClause::raw("1 = 1"));
        assert!(matches!(
            backend.fetch(&raw).await,
            Err(PaginationError::Backend(_))
        ));

        let unknown = QueryBuilder::new("parents").order_asc("missing");
        assert!(matches!(
            backend.fetch(&unknown).await,
            Err(PaginationError::Backend(_))
        ));
    }
}
