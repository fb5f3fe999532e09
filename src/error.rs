//! # Pagination Error Types
//!
//! Structured error handling for the pagination engine using thiserror.
//! The first four variants are caused by caller input and can be recovered
//! from (for example by re-requesting with a valid cursor); configuration and
//! backend errors are fatal for the call and are never retried.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PaginationError {
    #[error("Unsupported order-by field: \"{order_by}\"")]
    InvalidOrderBy { order_by: String },

    #[error(
        "Given offset ({given}) is bigger than maximum allowed ({maximum}). Please use cursor-based navigation"
    )]
    TooLargeOffset { maximum: u32, given: u32 },

    #[error("Invalid cursor \"{cursor}\": {reason}")]
    InvalidCursor { cursor: String, reason: String },

    #[error(
        "Calculating total-count only supported with single group-by, instead provided: \"{group_by}\""
    )]
    InvalidGroupBy { group_by: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Backend error: {0}")]
    Backend(String),
}

impl PaginationError {
    pub fn invalid_order_by(order_by: impl Into<String>) -> Self {
        Self::InvalidOrderBy {
            order_by: order_by.into(),
        }
    }

    pub fn invalid_cursor(cursor: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidCursor {
            cursor: cursor.into(),
            reason: reason.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }

    /// Errors caused by the caller's request rather than by the setup
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidOrderBy { .. }
                | Self::TooLargeOffset { .. }
                | Self::InvalidCursor { .. }
                | Self::InvalidGroupBy { .. }
        )
    }

    pub fn order_by(&self) -> Option<&str> {
        match self {
            Self::InvalidOrderBy { order_by } => Some(order_by),
            _ => None,
        }
    }

    pub fn maximum_offset(&self) -> Option<u32> {
        match self {
            Self::TooLargeOffset { maximum, .. } => Some(*maximum),
            _ => None,
        }
    }

    pub fn given_offset(&self) -> Option<u32> {
        match self {
            Self::TooLargeOffset { given, .. } => Some(*given),
            _ => None,
        }
    }

    pub fn group_by(&self) -> Option<&str> {
        match self {
            Self::InvalidGroupBy { group_by } => Some(group_by),
            _ => None,
        }
    }
}

#[cfg(feature = "postgres")]
impl From<sqlx::Error> for PaginationError {
    fn from(error: sqlx::Error) -> Self {
        Self::Backend(error.to_string())
    }
}

impl From<config::ConfigError> for PaginationError {
    fn from(error: config::ConfigError) -> Self {
        Self::Configuration(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PaginationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_large_offset_message() {
        let error = PaginationError::TooLargeOffset {
            maximum: 10,
            given: 11,
        };
        assert_eq!(
            error.to_string(),
            "Given offset (11) is bigger than maximum allowed (10). Please use cursor-based navigation"
        );
        assert_eq!(error.maximum_offset(), Some(10));
        assert_eq!(error.given_offset(), Some(11));
    }

    #[test]
    fn test_recoverable_classification() {
        assert!(PaginationError::invalid_order_by("name").is_recoverable());
        assert!(PaginationError::invalid_cursor("x", "bad").is_recoverable());
        assert!(PaginationError::InvalidGroupBy {
            group_by: "a, b".to_string()
        }
        .is_recoverable());
        assert!(!PaginationError::configuration("no root alias").is_recoverable());
        assert!(!PaginationError::backend("connection reset").is_recoverable());
    }

    #[test]
    fn test_order_by_accessor() {
        let error = PaginationError::invalid_order_by("undefined_field");
        assert_eq!(error.order_by(), Some("undefined_field"));
        assert_eq!(
            error.to_string(),
            "Unsupported order-by field: \"undefined_field\""
        );
    }
}
