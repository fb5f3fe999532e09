use super::OrderingPair;
use serde::{Deserialize, Serialize};

/// How a request positions its window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation<'a> {
    /// First page, no bound
    Start,
    Offset(u32),
    After(&'a str),
    Before(&'a str),
}

/// A paging request: requested ordering, window size and position.
///
/// At most one of offset / after / before is meant to be set. When several
/// are, offset wins over before, and before wins over after.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pager {
    ordering_pairs: Vec<OrderingPair>,
    /// `None` means no limit
    limit: Option<u32>,
    offset: Option<u32>,
    after: Option<String>,
    before: Option<String>,
}

impl Pager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_order_by(mut self, ordering_pair: OrderingPair) -> Self {
        self.ordering_pairs.push(ordering_pair);
        self
    }

    pub fn with_ordering_pairs(mut self, ordering_pairs: Vec<OrderingPair>) -> Self {
        self.ordering_pairs = ordering_pairs;
        self
    }

    pub fn with_limit(mut self, limit: impl Into<Option<u32>>) -> Self {
        self.limit = limit.into();
        self
    }

    pub fn with_offset(mut self, offset: impl Into<Option<u32>>) -> Self {
        self.offset = offset.into();
        self
    }

    pub fn with_after(mut self, after: impl Into<String>) -> Self {
        self.after = Some(after.into());
        self
    }

    pub fn with_before(mut self, before: impl Into<String>) -> Self {
        self.before = Some(before.into());
        self
    }

    pub fn ordering_pairs(&self) -> &[OrderingPair] {
        &self.ordering_pairs
    }

    pub fn limit(&self) -> Option<u32> {
        self.limit
    }

    pub fn offset(&self) -> Option<u32> {
        self.offset
    }

    pub fn after(&self) -> Option<&str> {
        self.after.as_deref()
    }

    pub fn before(&self) -> Option<&str> {
        self.before.as_deref()
    }

    pub fn navigation(&self) -> Navigation<'_> {
        if let Some(offset) = self.offset {
            Navigation::Offset(offset)
        } else if let Some(before) = self.before.as_deref() {
            Navigation::Before(before)
        } else if let Some(after) = self.after.as_deref() {
            Navigation::After(after)
        } else {
            Navigation::Start
        }
    }

    /// True when the backend is asked for the rows preceding a cursor
    pub fn is_backward(&self) -> bool {
        matches!(self.navigation(), Navigation::Before(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_precedence() {
        assert_eq!(Pager::new().navigation(), Navigation::Start);
        assert_eq!(
            Pager::new().with_after("\"5\"").navigation(),
            Navigation::After("\"5\"")
        );
        assert_eq!(
            Pager::new()
                .with_after("\"5\"")
                .with_before("\"9\"")
                .navigation(),
            Navigation::Before("\"9\"")
        );
        assert_eq!(
            Pager::new().with_before("\"9\"").with_offset(3).navigation(),
            Navigation::Offset(3)
        );
    }

    #[test]
    fn test_limit_accepts_value_or_none() {
        let pager = Pager::new().with_limit(5);
        assert_eq!(pager.limit(), Some(5));
        assert_eq!(pager.with_limit(None).limit(), None);
    }

    #[test]
    fn test_deserialize_partial_request() {
        let pager: Pager = serde_json::from_str(
            r#"{"ordering_pairs":[{"order_by":"id","direction":"ascending"}],"limit":5,"after":"\"5\""}"#,
        )
        .expect("valid pager json");

        assert_eq!(pager.ordering_pairs(), &[OrderingPair::ascending("id")]);
        assert_eq!(pager.limit(), Some(5));
        assert_eq!(pager.after(), Some("\"5\""));
        assert_eq!(pager.offset(), None);
    }
}
