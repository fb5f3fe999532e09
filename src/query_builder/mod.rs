//! # Query Builder
//!
//! Backend-neutral query descriptions consumed by the pagination engine.
//!
//! ## Key Components
//!
//! - [`builder`] - [`QueryBuilder`], the base query plus ORDER BY / LIMIT / OFFSET
//! - [`conditions`] - WHERE clause building, including the OR-of-AND seek predicates
//! - [`joins`] - JOIN clauses for SQL backends
//! - [`pagination`] - LIMIT/OFFSET window
//!
//! ## Example Usage
//!
//! ```rust
//! use paging_core::query_builder::QueryBuilder;
//!
//! let query = QueryBuilder::new("children c")
//!     .inner_join("parents p", "p.id = c.parent_id")
//!     .where_like("p.name", "P2%")
//!     .order_asc("c.name")
//!     .limit(10);
//!
//! assert!(query.build_sql().contains("ORDER BY c.name ASC LIMIT 10"));
//! ```

pub mod builder;
pub mod conditions;
pub mod joins;
pub mod pagination;

pub use builder::{OrderBy, QueryBuilder};
pub use conditions::{ComparisonOperator, Condition, LogicalOperator, WhereClause};
pub use joins::{Join, JoinType};
pub use pagination::Pagination;
