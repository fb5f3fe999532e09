#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Paging Core
//!
//! Offset and cursor (keyset) pagination over arbitrarily large, totally
//! ordered collections.
//!
//! ## Overview
//!
//! Callers describe a base query once ([`ConfiguredQuery`]: the query, the
//! orderings it may be sorted by, paging options) and request windows of it
//! with a [`Pager`]. Every [`PageResult`] carries the items, cursors for the
//! neighbouring windows, flags telling whether those windows hold anything,
//! and optionally the total count.
//!
//! ## Key Features
//!
//! - **Two navigation modes**: numeric offset and opaque cursors, freely mixed
//! - **Stable ordering**: the root identity field always breaks ties
//! - **Empty-window cursors**: navigation continues from empty pages
//! - **Grouped counts**: total count of single-column `GROUP BY` queries
//! - **Streaming**: [`ResultIterator`] walks a whole collection page by page
//! - **Pluggable storage**: anything implementing [`QueryBackend`]
//!
//! ## Module Organization
//!
//! - [`models`] - Ordering model, paging request and result types
//! - [`query_builder`] - Backend-neutral query descriptions
//! - [`services`] - Cursor codec, query analysis, result provider, iterator
//! - [`backend`] - In-memory and PostgreSQL query backends
//! - [`config`] - Configuration management
//! - [`error`] - Structured error handling
//! - [`logging`] - Structured logging setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use paging_core::{
//!     ConfiguredQuery, InMemoryBackend, OrderingConfiguration, OrderingPair, Pager,
//!     QueryBuilder, ResultProvider,
//! };
//! use serde_json::json;
//!
//! # async fn example() -> paging_core::Result<()> {
//! let backend = InMemoryBackend::with_records(
//!     (1..=30).map(|id| json!({"id": id, "name": format!("P{id}")})).collect(),
//! );
//! let configured = ConfiguredQuery::new(QueryBuilder::new("parents p"))
//!     .add_ordering_configuration("name", OrderingConfiguration::with_path("name", "name"));
//!
//! let provider = ResultProvider::default();
//! let page = provider
//!     .get_result_for_query(
//!         &backend,
//!         &configured,
//!         &Pager::new().with_order_by(OrderingPair::ascending("name")).with_limit(5),
//!     )
//!     .await?;
//!
//! if let Some(after) = page.next_cursor.as_deref() {
//!     let next = Pager::new()
//!         .with_order_by(OrderingPair::ascending("name"))
//!         .with_limit(5)
//!         .with_after(after);
//!     let _second = provider.get_result_for_query(&backend, &configured, &next).await?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Testing
//!
//! ```bash
//! cargo test --lib    # Unit tests
//! cargo test          # All tests, integration tests run on InMemoryBackend
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod query_builder;
pub mod services;

pub use backend::{InMemoryBackend, QueryBackend};
#[cfg(feature = "postgres")]
pub use backend::PgBackend;
pub use config::PaginationConfig;
pub use error::{PaginationError, Result};
pub use models::{
    Accessor, ConfiguredQuery, FieldValue, Navigation, OrderingConfiguration, OrderingPair,
    PageResult, Pager, Record, SortDirection,
};
pub use query_builder::{ComparisonOperator, Condition, QueryBuilder, WhereClause};
pub use services::{
    AnalysedQuery, CursorBuilder, CycleHook, NoopCycleHook, ParsedCursor, QueryAnalyser,
    ResultIterator, ResultProvider,
};
