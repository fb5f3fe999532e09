//! # Query Backends
//!
//! The pagination engine describes every query it needs as a [`QueryBuilder`]
//! and leaves execution to a [`QueryBackend`]. Two implementations ship with
//! the crate:
//!
//! - [`InMemoryBackend`] evaluates descriptions against records held in memory
//! - [`PgBackend`] renders them to SQL and runs them on PostgreSQL (feature `postgres`)

use crate::error::Result;
use crate::models::Record;
use crate::query_builder::QueryBuilder;
use async_trait::async_trait;

pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use memory::InMemoryBackend;
#[cfg(feature = "postgres")]
pub use postgres::PgBackend;

/// Executes query descriptions produced by the pagination engine
#[async_trait]
pub trait QueryBackend: Send + Sync {
    type Item: Record + Send + Sync;

    /// Records matching the where clauses, in ORDER BY order, windowed by
    /// LIMIT/OFFSET
    async fn fetch(&self, query: &QueryBuilder) -> Result<Vec<Self::Item>>;

    /// Number of records matching the where clauses
    async fn count(&self, query: &QueryBuilder) -> Result<u64>;

    /// Number of distinct non-null values of `column` among matching records
    async fn count_distinct(&self, query: &QueryBuilder, column: &str) -> Result<u64>;

    async fn exists(&self, query: &QueryBuilder) -> Result<bool> {
        let probe = query.clone().limit(1);
        Ok(!self.fetch(&probe).await?.is_empty())
    }
}
