use super::{ComparisonOperator, Join, Pagination, WhereClause};
use crate::models::SortDirection;

/// One ORDER BY term
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub expression: String,
    pub direction: SortDirection,
}

impl OrderBy {
    pub fn to_sql(&self) -> String {
        format!("{} {}", self.expression, self.direction.as_sql())
    }
}

/// Backend-neutral description of a query.
///
/// The pagination engine never executes SQL itself: it derives copies of a
/// caller supplied base query (adding ordering, boundary predicates and a
/// LIMIT/OFFSET window) and hands them to a [`QueryBackend`](crate::backend::QueryBackend).
/// SQL backends render the description with [`QueryBuilder::build_sql`],
/// in-memory backends evaluate it directly.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryBuilder {
    base_table: String,
    select_fields: Vec<String>,
    joins: Vec<Join>,
    where_clauses: Vec<WhereClause>,
    group_by: Vec<String>,
    order_by: Vec<OrderBy>,
    pagination: Option<Pagination>,
}

impl QueryBuilder {
    /// Create a new query builder for the given table, optionally aliased (`"parents p"`)
    pub fn new(table: &str) -> Self {
        Self {
            base_table: table.to_string(),
            select_fields: Vec::new(),
            joins: Vec::new(),
            where_clauses: Vec::new(),
            group_by: Vec::new(),
            order_by: Vec::new(),
            pagination: None,
        }
    }

    /// Set specific fields to select
    pub fn select(mut self, fields: &[&str]) -> Self {
        self.select_fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    /// Add a JOIN clause
    pub fn join(mut self, join: Join) -> Self {
        self.joins.push(join);
        self
    }

    /// Add an INNER JOIN
    pub fn inner_join(self, table: &str, on_condition: &str) -> Self {
        self.join(Join::inner(table, on_condition))
    }

    /// Add a LEFT JOIN
    pub fn left_join(self, table: &str, on_condition: &str) -> Self {
        self.join(Join::left(table, on_condition))
    }

    /// Add a WHERE clause
    pub fn where_clause(mut self, clause: WhereClause) -> Self {
        self.where_clauses.push(clause);
        self
    }

    /// Add a simple WHERE condition
    pub fn where_eq(self, field: &str, value: serde_json::Value) -> Self {
        self.where_clause(WhereClause::simple(field, ComparisonOperator::Eq, value))
    }

    /// Add WHERE LIKE condition
    pub fn where_like(self, field: &str, pattern: &str) -> Self {
        self.where_clause(WhereClause::simple(
            field,
            ComparisonOperator::Like,
            serde_json::Value::String(pattern.to_string()),
        ))
    }

    /// Add WHERE IN condition
    pub fn where_in(self, field: &str, values: Vec<serde_json::Value>) -> Self {
        self.where_clause(WhereClause::in_condition(field, values))
    }

    /// Add WHERE IS NULL condition
    pub fn where_null(self, field: &str) -> Self {
        self.where_clause(WhereClause::is_null(field))
    }

    /// Add GROUP BY clause, one entry per field
    pub fn group_by(mut self, fields: &[&str]) -> Self {
        self.group_by.extend(fields.iter().map(|f| f.to_string()));
        self
    }

    /// Drop all GROUP BY entries
    pub fn clear_group_by(mut self) -> Self {
        self.group_by.clear();
        self
    }

    /// Add ORDER BY clause
    pub fn order_by(mut self, field: &str, direction: SortDirection) -> Self {
        self.order_by.push(OrderBy {
            expression: field.to_string(),
            direction,
        });
        self
    }

    /// Add ORDER BY ASC
    pub fn order_asc(self, field: &str) -> Self {
        self.order_by(field, SortDirection::Ascending)
    }

    /// Add ORDER BY DESC
    pub fn order_desc(self, field: &str) -> Self {
        self.order_by(field, SortDirection::Descending)
    }

    /// Add LIMIT clause
    pub fn limit(mut self, limit: u32) -> Self {
        if let Some(ref mut pagination) = self.pagination {
            pagination.limit = Some(limit);
        } else {
            self.pagination = Some(Pagination::limit_only(limit));
        }
        self
    }

    /// Add OFFSET clause
    pub fn offset(mut self, offset: u32) -> Self {
        if let Some(ref mut pagination) = self.pagination {
            pagination.offset = Some(offset);
        } else {
            self.pagination = Some(Pagination::offset_only(offset));
        }
        self
    }

    pub fn base_table(&self) -> &str {
        &self.base_table
    }

    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    pub fn where_clauses(&self) -> &[WhereClause] {
        &self.where_clauses
    }

    pub fn group_by_fields(&self) -> &[String] {
        &self.group_by
    }

    pub fn order_by_fields(&self) -> &[OrderBy] {
        &self.order_by
    }

    pub fn pagination(&self) -> Option<&Pagination> {
        self.pagination.as_ref()
    }

    /// Alias of the root entity: the last token of the base table expression.
    ///
    /// Returns `None` for sub-selects and multi-table roots.
    pub fn root_alias(&self) -> Option<&str> {
        let table = self.base_table.trim();
        if table.is_empty() || table.contains('(') || table.contains(',') {
            return None;
        }
        table.split_whitespace().last()
    }

    /// Build the complete SQL query string
    pub fn build_sql(&self) -> String {
        let mut sql = String::from("SELECT ");

        if self.select_fields.is_empty() {
            match self.root_alias() {
                Some(alias) => sql.push_str(&format!("{alias}.*")),
                None => sql.push('*'),
            }
        } else {
            sql.push_str(&self.select_fields.join(", "));
        }

        self.push_from_and_filters(&mut sql);

        if !self.group_by.is_empty() {
            sql.push_str(&format!(" GROUP BY {}", self.group_by.join(", ")));
        }

        if !self.order_by.is_empty() {
            let order_parts: Vec<String> = self.order_by.iter().map(OrderBy::to_sql).collect();
            sql.push_str(&format!(" ORDER BY {}", order_parts.join(", ")));
        }

        if let Some(ref pagination) = self.pagination {
            sql.push_str(&pagination.to_sql());
        }

        sql
    }

    /// COUNT(*) over the filtered rows, ignoring ordering and window
    pub fn build_count_sql(&self) -> String {
        let mut sql = String::from("SELECT COUNT(*)");
        self.push_from_and_filters(&mut sql);
        sql
    }

    /// COUNT(DISTINCT column) over the filtered rows; NULLs are not counted
    pub fn build_count_distinct_sql(&self, column: &str) -> String {
        let mut sql = format!("SELECT COUNT(DISTINCT {column})");
        self.push_from_and_filters(&mut sql);
        sql
    }

    fn push_from_and_filters(&self, sql: &mut String) {
        sql.push_str(&format!(" FROM {}", self.base_table));

        for join in &self.joins {
            sql.push(' ');
            sql.push_str(&join.to_sql());
        }

        if !self.where_clauses.is_empty() {
            sql.push_str(" WHERE ");
            let where_parts: Vec<String> = self
                .where_clauses
                .iter()
                .map(|clause| clause.to_sql())
                .collect();
            sql.push_str(&where_parts.join(" AND "));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_query_building() {
        let query = QueryBuilder::new("parents p")
            .where_eq("p.name", serde_json::Value::String("P1".to_string()))
            .order_desc("p.id")
            .limit(10);

        assert_eq!(
            query.build_sql(),
            "SELECT p.* FROM parents p WHERE p.name = 'P1' ORDER BY p.id DESC LIMIT 10"
        );
    }

    #[test]
    fn test_count_queries_skip_order_and_window() {
        let query = QueryBuilder::new("parents p")
            .where_like("p.name", "P2%")
            .order_asc("p.id")
            .limit(5)
            .offset(10);

        assert_eq!(
            query.build_count_sql(),
            "SELECT COUNT(*) FROM parents p WHERE p.name LIKE 'P2%'"
        );
        assert_eq!(
            query.build_count_distinct_sql("p.group_key"),
            "SELECT COUNT(DISTINCT p.group_key) FROM parents p WHERE p.name LIKE 'P2%'"
        );
    }

    #[test]
    fn test_root_alias_resolution() {
        assert_eq!(QueryBuilder::new("parents p").root_alias(), Some("p"));
        assert_eq!(QueryBuilder::new("parents").root_alias(), Some("parents"));
        assert_eq!(QueryBuilder::new("").root_alias(), None);
        assert_eq!(QueryBuilder::new("parents p, children c").root_alias(), None);
        assert_eq!(
            QueryBuilder::new("(SELECT * FROM parents) p").root_alias(),
            None
        );
    }

    #[test]
    fn test_limit_then_offset_share_window() {
        let query = QueryBuilder::new("parents p").limit(5).offset(20);
        assert_eq!(query.pagination(), Some(&Pagination::limit_offset(5, 20)));
    }
}
