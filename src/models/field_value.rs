//! # Field Values
//!
//! Comparable values read from records, and the [`Record`] trait that
//! resolves accessor paths against a record.

use chrono::{DateTime, NaiveDateTime, Utc};
use std::cmp::Ordering;

/// Canonical cursor representation of timestamps
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single sortable value extracted from a record
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Timestamp(NaiveDateTime),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// String form written into cursors
    pub fn to_cursor_string(&self) -> String {
        match self {
            FieldValue::Null => String::new(),
            FieldValue::Bool(true) => "1".to_string(),
            FieldValue::Bool(false) => "0".to_string(),
            FieldValue::Int(value) => value.to_string(),
            FieldValue::Float(value) => value.to_string(),
            FieldValue::Text(value) => value.clone(),
            FieldValue::Timestamp(value) => value.format(TIMESTAMP_FORMAT).to_string(),
        }
    }

    /// Total order used for sorting; NULL sorts after every other value
    pub fn sort_cmp(&self, other: &FieldValue) -> Ordering {
        match (self, other) {
            (FieldValue::Null, FieldValue::Null) => Ordering::Equal,
            (FieldValue::Null, _) => Ordering::Greater,
            (_, FieldValue::Null) => Ordering::Less,
            _ => self
                .partial_cmp_value(other)
                .unwrap_or_else(|| self.to_cursor_string().cmp(&other.to_cursor_string())),
        }
    }

    /// SQL-style comparison against a literal.
    ///
    /// String literals are coerced to this value's type the way a database
    /// coerces an untyped literal against a typed column. Comparisons with
    /// NULL on either side yield `None`.
    pub fn compare_literal(&self, literal: &serde_json::Value) -> Option<Ordering> {
        if self.is_null() {
            return None;
        }
        let coerced = self.coerce_literal(literal)?;
        self.partial_cmp_value(&coerced)
            .or_else(|| Some(self.to_cursor_string().cmp(&coerced.to_cursor_string())))
    }

    /// SQL LIKE with `%` and `_` wildcards over the cursor string form
    pub fn matches_like(&self, pattern: &str) -> bool {
        if self.is_null() {
            return false;
        }
        let text: Vec<char> = self.to_cursor_string().chars().collect();
        let pattern: Vec<char> = pattern.chars().collect();
        like_matches(&text, &pattern)
    }

    fn coerce_literal(&self, literal: &serde_json::Value) -> Option<FieldValue> {
        match literal {
            serde_json::Value::Null => None,
            serde_json::Value::Bool(value) => Some(FieldValue::Bool(*value)),
            serde_json::Value::Number(number) => Some(
                number
                    .as_i64()
                    .map(FieldValue::Int)
                    .unwrap_or_else(|| FieldValue::Float(number.as_f64().unwrap_or(f64::NAN))),
            ),
            serde_json::Value::String(text) => Some(self.coerce_text(text)),
            other => Some(FieldValue::Text(other.to_string())),
        }
    }

    fn coerce_text(&self, text: &str) -> FieldValue {
        let parsed = match self {
            FieldValue::Int(_) => text
                .parse::<i64>()
                .map(FieldValue::Int)
                .ok()
                .or_else(|| text.parse::<f64>().map(FieldValue::Float).ok()),
            FieldValue::Float(_) => text.parse::<f64>().map(FieldValue::Float).ok(),
            FieldValue::Bool(_) => match text {
                "1" | "true" => Some(FieldValue::Bool(true)),
                "0" | "" | "false" => Some(FieldValue::Bool(false)),
                _ => None,
            },
            FieldValue::Timestamp(_) => NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT)
                .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S"))
                .map(FieldValue::Timestamp)
                .ok(),
            FieldValue::Text(_) | FieldValue::Null => None,
        };
        parsed.unwrap_or_else(|| FieldValue::Text(text.to_string()))
    }

    fn partial_cmp_value(&self, other: &FieldValue) -> Option<Ordering> {
        match (self, other) {
            (FieldValue::Bool(a), FieldValue::Bool(b)) => Some(a.cmp(b)),
            (FieldValue::Int(a), FieldValue::Int(b)) => Some(a.cmp(b)),
            (FieldValue::Float(a), FieldValue::Float(b)) => a.partial_cmp(b),
            (FieldValue::Int(a), FieldValue::Float(b)) => (*a as f64).partial_cmp(b),
            (FieldValue::Float(a), FieldValue::Int(b)) => a.partial_cmp(&(*b as f64)),
            (FieldValue::Text(a), FieldValue::Text(b)) => Some(a.cmp(b)),
            (FieldValue::Timestamp(a), FieldValue::Timestamp(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

fn like_matches(text: &[char], pattern: &[char]) -> bool {
    let (mut t, mut p) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pattern.len() && (pattern[p] == '_' || pattern[p] == text[t]) {
            t += 1;
            p += 1;
        } else if p < pattern.len() && pattern[p] == '%' {
            backtrack = Some((p, t));
            p += 1;
        } else if let Some((star, mark)) = backtrack {
            p = star + 1;
            t = mark + 1;
            backtrack = Some((star, mark + 1));
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|c| *c == '%')
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Int(i64::from(value))
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Int(i64::from(value))
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        i64::try_from(value)
            .map(FieldValue::Int)
            .unwrap_or(FieldValue::Float(value as f64))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<NaiveDateTime> for FieldValue {
    fn from(value: NaiveDateTime) -> Self {
        FieldValue::Timestamp(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::Timestamp(value.naive_utc())
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

/// Field accessor contract: resolve a path (`"id"`, `"parent.name"`) or a
/// query expression (`"p.id"`) to a value.
///
/// Returning `None` means the record has no such field.
pub trait Record {
    fn field(&self, path: &str) -> Option<FieldValue>;
}

/// Dotted-path lookup through JSON objects. A qualified column (`p.id`)
/// whose alias is not a key of the object resolves as the unqualified name.
impl Record for serde_json::Value {
    fn field(&self, path: &str) -> Option<FieldValue> {
        let found = json_path(self, path).or_else(|| {
            path.split_once('.')
                .and_then(|(_, column)| json_path(self, column))
        })?;

        Some(match found {
            serde_json::Value::Null => FieldValue::Null,
            serde_json::Value::Bool(value) => FieldValue::Bool(*value),
            serde_json::Value::Number(number) => match number.as_i64() {
                Some(value) => FieldValue::Int(value),
                None => FieldValue::Float(number.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(value) => FieldValue::Text(value.clone()),
            other => FieldValue::Text(other.to_string()),
        })
    }
}

fn json_path<'a>(value: &'a serde_json::Value, path: &str) -> Option<&'a serde_json::Value> {
    path.split('.')
        .try_fold(value, |current, segment| current.get(segment))
}
