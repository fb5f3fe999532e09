//! # Ordering Model
//!
//! Named sort keys a query may be ordered by ([`OrderingConfiguration`]) and
//! the caller's requested keys ([`OrderingPair`]).

use super::{FieldValue, Record};
use crate::error::{PaginationError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Sort direction of a single ordering key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    pub fn from_ascending(ascending: bool) -> Self {
        if ascending {
            SortDirection::Ascending
        } else {
            SortDirection::Descending
        }
    }

    pub fn is_ascending(&self) -> bool {
        matches!(self, SortDirection::Ascending)
    }

    pub fn reversed(&self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        }
    }
}

/// Custom value extraction function
pub type AccessorFn<T> = Arc<dyn Fn(&T) -> FieldValue + Send + Sync>;

/// Where the cursor value of an ordering key comes from
pub enum Accessor<T> {
    /// Resolved through [`Record::field`]
    Path(String),
    Function(AccessorFn<T>),
}

impl<T> Clone for Accessor<T> {
    fn clone(&self) -> Self {
        match self {
            Accessor::Path(path) => Accessor::Path(path.clone()),
            Accessor::Function(function) => Accessor::Function(Arc::clone(function)),
        }
    }
}

impl<T> fmt::Debug for Accessor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accessor::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Accessor::Function(_) => f.write_str("Function(..)"),
        }
    }
}

/// A sortable expression together with the way to read its value from a record.
///
/// Direction defaults to descending. Per-request overrides never touch the
/// configured value: [`OrderingConfiguration::with_direction`] returns a copy.
///
/// The expression must be non-nullable. A NULL value is encoded as an empty
/// cursor element, and the seek predicate built from it neither excludes the
/// rows already seen nor reaches the remaining NULL rows.
pub struct OrderingConfiguration<T> {
    expression: String,
    accessor: Accessor<T>,
    direction: SortDirection,
}

impl<T> OrderingConfiguration<T> {
    pub fn with_path(expression: &str, path: &str) -> Self {
        Self {
            expression: expression.to_string(),
            accessor: Accessor::Path(path.to_string()),
            direction: SortDirection::default(),
        }
    }

    pub fn with_fn<F>(expression: &str, function: F) -> Self
    where
        F: Fn(&T) -> FieldValue + Send + Sync + 'static,
    {
        Self {
            expression: expression.to_string(),
            accessor: Accessor::Function(Arc::new(function)),
            direction: SortDirection::default(),
        }
    }

    pub fn builder(expression: &str) -> OrderingConfigurationBuilder<T> {
        OrderingConfigurationBuilder::new(expression)
    }

    /// Default to ascending order
    pub fn ascending(mut self) -> Self {
        self.direction = SortDirection::Ascending;
        self
    }

    /// Default to descending order
    pub fn descending(mut self) -> Self {
        self.direction = SortDirection::Descending;
        self
    }

    pub fn with_direction(&self, direction: SortDirection) -> Self {
        let mut configuration = self.clone();
        configuration.direction = direction;
        configuration
    }

    pub fn reversed(&self) -> Self {
        self.with_direction(self.direction.reversed())
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn accessor(&self) -> &Accessor<T> {
        &self.accessor
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    pub fn is_ascending(&self) -> bool {
        self.direction.is_ascending()
    }
}

impl<T: Record> OrderingConfiguration<T> {
    /// Read this key's value from a record
    pub fn value_of(&self, item: &T) -> Result<FieldValue> {
        match &self.accessor {
            Accessor::Path(path) => item.field(path).ok_or_else(|| {
                PaginationError::configuration(format!(
                    "cannot read accessor path \"{path}\" for ordering \"{}\"",
                    self.expression
                ))
            }),
            Accessor::Function(function) => Ok(function(item)),
        }
    }
}

impl<T> Clone for OrderingConfiguration<T> {
    fn clone(&self) -> Self {
        Self {
            expression: self.expression.clone(),
            accessor: self.accessor.clone(),
            direction: self.direction,
        }
    }
}

impl<T> fmt::Debug for OrderingConfiguration<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderingConfiguration")
            .field("expression", &self.expression)
            .field("accessor", &self.accessor)
            .field("direction", &self.direction)
            .finish()
    }
}

/// Step-wise construction of an [`OrderingConfiguration`].
///
/// Exactly one of [`accessor_path`](Self::accessor_path) and
/// [`accessor_fn`](Self::accessor_fn) must be called before [`build`](Self::build).
pub struct OrderingConfigurationBuilder<T> {
    expression: String,
    path: Option<String>,
    function: Option<AccessorFn<T>>,
    direction: SortDirection,
}

impl<T> OrderingConfigurationBuilder<T> {
    fn new(expression: &str) -> Self {
        Self {
            expression: expression.to_string(),
            path: None,
            function: None,
            direction: SortDirection::default(),
        }
    }

    pub fn accessor_path(mut self, path: &str) -> Self {
        self.path = Some(path.to_string());
        self
    }

    pub fn accessor_fn<F>(mut self, function: F) -> Self
    where
        F: Fn(&T) -> FieldValue + Send + Sync + 'static,
    {
        self.function = Some(Arc::new(function));
        self
    }

    pub fn ascending(mut self) -> Self {
        self.direction = SortDirection::Ascending;
        self
    }

    pub fn descending(mut self) -> Self {
        self.direction = SortDirection::Descending;
        self
    }

    pub fn build(self) -> Result<OrderingConfiguration<T>> {
        let accessor = match (self.path, self.function) {
            (Some(path), None) => Accessor::Path(path),
            (None, Some(function)) => Accessor::Function(function),
            (Some(_), Some(_)) => {
                return Err(PaginationError::configuration(format!(
                    "ordering \"{}\": cannot set both accessor path and function, choose one",
                    self.expression
                )))
            }
            (None, None) => {
                return Err(PaginationError::configuration(format!(
                    "ordering \"{}\": must set either accessor path or accessor function",
                    self.expression
                )))
            }
        };

        Ok(OrderingConfiguration {
            expression: self.expression,
            accessor,
            direction: self.direction,
        })
    }
}

/// A requested ordering: a configured ordering name plus an optional
/// direction override
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderingPair {
    order_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    direction: Option<SortDirection>,
}

impl OrderingPair {
    /// Use the configured default direction
    pub fn new(order_by: &str) -> Self {
        Self {
            order_by: order_by.to_string(),
            direction: None,
        }
    }

    pub fn ascending(order_by: &str) -> Self {
        Self::with_direction(order_by, SortDirection::Ascending)
    }

    pub fn descending(order_by: &str) -> Self {
        Self::with_direction(order_by, SortDirection::Descending)
    }

    pub fn with_direction(order_by: &str, direction: SortDirection) -> Self {
        Self {
            order_by: order_by.to_string(),
            direction: Some(direction),
        }
    }

    pub fn order_by(&self) -> &str {
        &self.order_by
    }

    pub fn direction(&self) -> Option<SortDirection> {
        self.direction
    }
}
