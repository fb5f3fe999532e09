//! # PostgreSQL Backend
//!
//! Renders query descriptions with [`QueryBuilder::build_sql`] and runs them
//! through an sqlx connection pool. Cursor literals are inlined as quoted
//! strings and left to PostgreSQL to coerce against the column type.

use super::QueryBackend;
use crate::error::Result;
use crate::models::Record;
use crate::query_builder::QueryBuilder;
use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{FromRow, PgPool};
use std::marker::PhantomData;
use tracing::{debug, info};

pub struct PgBackend<T> {
    pool: PgPool,
    _record: PhantomData<fn() -> T>,
}

impl<T> PgBackend<T> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _record: PhantomData,
        }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        info!(
            max_connections,
            "Pagination backend connected to PostgreSQL"
        );
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl<T> Clone for PgBackend<T> {
    fn clone(&self) -> Self {
        Self::new(self.pool.clone())
    }
}

impl<T> std::fmt::Debug for PgBackend<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgBackend").field("pool", &self.pool).finish()
    }
}

#[async_trait]
impl<T> QueryBackend for PgBackend<T>
where
    T: Record + for<'r> FromRow<'r, PgRow> + Send + Sync + Unpin,
{
    type Item = T;

    async fn fetch(&self, query: &QueryBuilder) -> Result<Vec<T>> {
        let sql = query.build_sql();
        debug!(sql = %sql, "Fetching page");

        let records = sqlx::query_as::<_, T>(&sql).fetch_all(&self.pool).await?;
        Ok(records)
    }

    async fn count(&self, query: &QueryBuilder) -> Result<u64> {
        let sql = query.build_count_sql();
        debug!(sql = %sql, "Counting rows");

        let count: i64 = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn count_distinct(&self, query: &QueryBuilder, column: &str) -> Result<u64> {
        let sql = query.build_count_distinct_sql(column);
        debug!(sql = %sql, "Counting distinct values");

        let count: i64 = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
        Ok(u64::try_from(count).unwrap_or_default())
    }
}
