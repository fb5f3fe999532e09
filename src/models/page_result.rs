use serde::Serialize;

/// One window of a paged collection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u64>,
    pub has_next: bool,
    pub has_previous: bool,
    /// Cursor to pass as `after` for the following page
    pub next_cursor: Option<String>,
    /// Cursor to pass as `before` for the preceding page
    pub previous_cursor: Option<String>,
}

impl<T> PageResult<T> {
    /// Window with no items, no cursors and nothing on either side
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total_count: None,
            has_next: false,
            has_previous: false,
            next_cursor: None,
            previous_cursor: None,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Transform every item, keeping cursors, flags and count
    pub fn map_items<U, F>(self, transform: F) -> PageResult<U>
    where
        F: FnMut(T) -> U,
    {
        PageResult {
            items: self.items.into_iter().map(transform).collect(),
            total_count: self.total_count,
            has_next: self.has_next,
            has_previous: self.has_previous,
            next_cursor: self.next_cursor,
            previous_cursor: self.previous_cursor,
        }
    }
}

impl<T> IntoIterator for PageResult<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
