//! # Cursor Codec
//!
//! Cursors are opaque to callers but have a fixed textual shape: an optional
//! leading `=` marking that the referenced item itself belongs to the window,
//! followed by the item's ordering values as comma separated JSON strings,
//! e.g. `"2020-02-02 12:00:01","3"` or `="30"`.

use crate::error::{PaginationError, Result};
use crate::models::{OrderingConfiguration, Record};
use tracing::debug;

const INCLUDED_MARKER: char = '=';

/// Decoded cursor: one string per resolved ordering key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCursor {
    elements: Vec<String>,
    item_included: bool,
}

impl ParsedCursor {
    pub fn elements(&self) -> &[String] {
        &self.elements
    }

    pub fn element_at(&self, index: usize) -> Option<&str> {
        self.elements.get(index).map(String::as_str)
    }

    /// Whether the cursor's own item satisfies the boundary
    pub fn is_item_included(&self) -> bool {
        self.item_included
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CursorBuilder;

impl CursorBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Decode a cursor, requiring exactly `required_count` string elements
    pub fn parse_cursor(&self, cursor: &str, required_count: usize) -> Result<ParsedCursor> {
        let (item_included, body) = match cursor.strip_prefix(INCLUDED_MARKER) {
            Some(rest) => (true, rest),
            None => (false, cursor),
        };

        let decoded: serde_json::Value = serde_json::from_str(&format!("[{body}]"))
            .map_err(|e| PaginationError::invalid_cursor(cursor, format!("malformed: {e}")))?;

        let values = match decoded {
            serde_json::Value::Array(values) => values,
            _ => return Err(PaginationError::invalid_cursor(cursor, "not a value list")),
        };

        if values.len() != required_count {
            return Err(PaginationError::invalid_cursor(
                cursor,
                format!(
                    "expected {required_count} elements, got {}",
                    values.len()
                ),
            ));
        }

        let elements = values
            .into_iter()
            .map(|value| match value {
                serde_json::Value::String(element) => Ok(element),
                other => Err(PaginationError::invalid_cursor(
                    cursor,
                    format!("element {other} is not a string"),
                )),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ParsedCursor {
            elements,
            item_included,
        })
    }

    pub fn build_cursor_with_included_item(&self, cursor: &str) -> String {
        format!("{INCLUDED_MARKER}{cursor}")
    }

    /// Toggle the leading inclusion marker
    pub fn invert_cursor_inclusion(&self, cursor: &str) -> String {
        match cursor.strip_prefix(INCLUDED_MARKER) {
            Some(rest) => rest.to_string(),
            None => self.build_cursor_with_included_item(cursor),
        }
    }

    /// Encode the ordering values of `item` as a non-inclusive cursor
    pub fn cursor_from_item<T: Record>(
        &self,
        item: &T,
        ordering_configurations: &[OrderingConfiguration<T>],
    ) -> Result<String> {
        let elements = ordering_configurations
            .iter()
            .map(|configuration| {
                configuration
                    .value_of(item)
                    .map(|value| value.to_cursor_string())
            })
            .collect::<Result<Vec<_>>>()?;

        let encoded = serde_json::to_string(&elements)
            .map_err(|e| PaginationError::configuration(format!("cursor encoding failed: {e}")))?;

        let cursor = encoded
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .unwrap_or(&encoded)
            .to_string();

        debug!(cursor = %cursor, "Built cursor from item");
        Ok(cursor)
    }
}
