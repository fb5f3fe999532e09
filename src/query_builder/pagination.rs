/// LIMIT/OFFSET window applied to a query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pagination {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl Pagination {
    /// Create pagination with only limit
    pub fn limit_only(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            offset: None,
        }
    }

    /// Create pagination with only offset
    pub fn offset_only(offset: u32) -> Self {
        Self {
            limit: None,
            offset: Some(offset),
        }
    }

    /// Create pagination with both limit and offset
    pub fn limit_offset(limit: u32, offset: u32) -> Self {
        Self {
            limit: Some(limit),
            offset: Some(offset),
        }
    }

    /// Convert to SQL string
    pub fn to_sql(&self) -> String {
        let mut sql = String::new();

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        if let Some(offset) = self.offset {
            sql.push_str(&format!(" OFFSET {}", offset));
        }

        sql
    }

    /// Apply the window to an already ordered sequence
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        let skip = self.offset.unwrap_or(0) as usize;
        let iter = items.into_iter().skip(skip);
        match self.limit {
            Some(limit) => iter.take(limit as usize).collect(),
            None => iter.collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_only() {
        let pagination = Pagination::limit_only(5);
        assert_eq!(pagination.limit, Some(5));
        assert_eq!(pagination.offset, None);
        assert_eq!(pagination.to_sql(), " LIMIT 5");
    }

    #[test]
    fn test_offset_only() {
        let pagination = Pagination::offset_only(15);
        assert_eq!(pagination.limit, None);
        assert_eq!(pagination.offset, Some(15));
        assert_eq!(pagination.to_sql(), " OFFSET 15");
    }

    #[test]
    fn test_zero_limit_is_rendered() {
        assert_eq!(Pagination::limit_offset(0, 10).to_sql(), " LIMIT 0 OFFSET 10");
    }

    #[test]
    fn test_apply_window() {
        let items: Vec<u32> = (1..=10).collect();
        assert_eq!(Pagination::limit_offset(3, 2).apply(items.clone()), vec![3, 4, 5]);
        assert_eq!(Pagination::offset_only(8).apply(items.clone()), vec![9, 10]);
        assert_eq!(Pagination::limit_only(0).apply(items.clone()), Vec::<u32>::new());
        assert_eq!(Pagination::offset_only(50).apply(items), Vec::<u32>::new());
    }
}
