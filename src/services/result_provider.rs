//! # Result Provider
//!
//! Turns a [`ConfiguredQuery`] and a [`Pager`] into one [`PageResult`]:
//! analyse the request, derive a page query from the base query, run it on
//! the backend, then probe either side of the window for the navigation flags.
//!
//! ## Empty windows
//!
//! When the page query finds nothing the result still carries cursors
//! wherever a position can be derived, so clients can keep navigating:
//!
//! - `limit = 0` peeks one item to position the (empty) window in front of it
//! - `before` / `after` reuse the given cursor with its inclusion inverted
//! - an offset past the end points at the true last item of the collection

use super::{AnalysedQuery, CursorBuilder, QueryAnalyser};
use crate::backend::QueryBackend;
use crate::error::{PaginationError, Result};
use crate::logging::log_page_operation;
use crate::models::{ConfiguredQuery, Navigation, OrderingConfiguration, PageResult, Pager};
use crate::query_builder::{ComparisonOperator, Condition, QueryBuilder, WhereClause};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Default)]
pub struct ResultProvider {
    query_analyser: QueryAnalyser,
    cursor_builder: CursorBuilder,
}

impl ResultProvider {
    pub fn new(query_analyser: QueryAnalyser, cursor_builder: CursorBuilder) -> Self {
        Self {
            query_analyser,
            cursor_builder,
        }
    }

    pub fn cursor_builder(&self) -> &CursorBuilder {
        &self.cursor_builder
    }

    /// Fetch one page. The total count is attached only when the configured
    /// query asks for it.
    pub async fn get_result_for_query<B: QueryBackend>(
        &self,
        backend: &B,
        configured_query: &ConfiguredQuery<B::Item>,
        pager: &Pager,
    ) -> Result<PageResult<B::Item>> {
        let analysed = self.query_analyser.analyse_query(configured_query, pager)?;

        debug!(
            limit = ?pager.limit(),
            navigation = ?pager.navigation(),
            "Building page"
        );

        let mut result = self.build_result(backend, &analysed, pager).await?;

        if configured_query.is_total_count_needed() {
            let total_count = match Self::calculate_total_count(pager, result.len()) {
                Some(total_count) => total_count,
                None => self.find_count(backend, &analysed).await?,
            };
            result.total_count = Some(total_count);
        }

        log_page_operation(
            analysed.root_alias(),
            result.len(),
            result.has_previous,
            result.has_next,
            result.total_count,
        );

        Ok(result)
    }

    /// Count every record of the base query, ignoring any paging
    pub async fn get_total_count_for_query<B: QueryBackend>(
        &self,
        backend: &B,
        configured_query: &ConfiguredQuery<B::Item>,
    ) -> Result<u64> {
        let analysed = self
            .query_analyser
            .analyse_query_without_pager(configured_query)?;
        self.find_count(backend, &analysed).await
    }

    async fn build_result<B: QueryBackend>(
        &self,
        backend: &B,
        analysed: &AnalysedQuery<B::Item>,
        pager: &Pager,
    ) -> Result<PageResult<B::Item>> {
        let items = self.find_items(backend, analysed, pager).await?;

        let (first, last) = match (items.first(), items.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return self.build_result_for_empty_items(backend, analysed, pager).await,
        };

        let ordering_configurations = analysed.ordering_configurations();
        let previous_cursor = self
            .cursor_builder
            .cursor_from_item(first, ordering_configurations)?;
        let next_cursor = self
            .cursor_builder
            .cursor_from_item(last, ordering_configurations)?;

        let has_previous = self.exists_before(backend, analysed, &previous_cursor).await?;
        let has_next = self.exists_after(backend, analysed, &next_cursor).await?;

        Ok(PageResult {
            items,
            total_count: None,
            has_next,
            has_previous,
            next_cursor: Some(next_cursor),
            previous_cursor: Some(previous_cursor),
        })
    }

    async fn find_items<B: QueryBackend>(
        &self,
        backend: &B,
        analysed: &AnalysedQuery<B::Item>,
        pager: &Pager,
    ) -> Result<Vec<B::Item>> {
        let query = self.page_query(analysed, pager)?;
        let mut items = backend.fetch(&query).await?;

        if pager.is_backward() {
            items.reverse();
        }
        Ok(items)
    }

    /// Base query plus ordering, limit and exactly one of offset / boundary
    fn page_query<T>(&self, analysed: &AnalysedQuery<T>, pager: &Pager) -> Result<QueryBuilder> {
        let mut query = analysed.query_builder();

        if let Some(limit) = pager.limit() {
            query = query.limit(limit);
        }

        let navigation = pager.navigation();
        let backward = matches!(navigation, Navigation::Before(_));
        for configuration in analysed.ordering_configurations() {
            let direction = if backward {
                configuration.direction().reversed()
            } else {
                configuration.direction()
            };
            query = query.order_by(configuration.expression(), direction);
        }

        Ok(match navigation {
            Navigation::Offset(offset) => query.offset(offset),
            Navigation::Before(cursor) => query.where_clause(self.apply_cursor(
                cursor,
                analysed.ordering_configurations(),
                true,
            )?),
            Navigation::After(cursor) => query.where_clause(self.apply_cursor(
                cursor,
                analysed.ordering_configurations(),
                false,
            )?),
            Navigation::Start => query,
        })
    }

    /// Seek predicate: OR over each key i of (keys before i equal) AND (key i beyond the cursor)
    fn apply_cursor<T>(
        &self,
        cursor: &str,
        ordering_configurations: &[OrderingConfiguration<T>],
        invert: bool,
    ) -> Result<WhereClause> {
        let parsed = self
            .cursor_builder
            .parse_cursor(cursor, ordering_configurations.len())?;
        let last_index = ordering_configurations.len().saturating_sub(1);

        let mut branches = Vec::with_capacity(ordering_configurations.len());
        let mut equal_prefix: Vec<Condition> = Vec::new();

        for (index, (configuration, element)) in ordering_configurations
            .iter()
            .zip(parsed.elements())
            .enumerate()
        {
            let larger_than = configuration.is_ascending() != invert;
            let inclusive = parsed.is_item_included() && index == last_index;
            let literal = serde_json::Value::String(element.clone());

            let mut branch = equal_prefix.clone();
            branch.push(Condition::simple(
                configuration.expression(),
                ComparisonOperator::seek(larger_than, inclusive),
                literal.clone(),
            ));
            branches.push(Condition::Group(WhereClause::and(branch)));

            equal_prefix.push(Condition::simple(
                configuration.expression(),
                ComparisonOperator::Eq,
                literal,
            ));
        }

        Ok(WhereClause::or(branches))
    }

    async fn build_result_for_empty_items<B: QueryBackend>(
        &self,
        backend: &B,
        analysed: &AnalysedQuery<B::Item>,
        pager: &Pager,
    ) -> Result<PageResult<B::Item>> {
        if pager.limit() == Some(0) {
            return self.build_result_for_zero_limit(backend, analysed, pager).await;
        }
        self.build_result_for_exhausted_window(backend, analysed, pager)
            .await
    }

    /// Position an empty window right in front of the first matching item
    async fn build_result_for_zero_limit<B: QueryBackend>(
        &self,
        backend: &B,
        analysed: &AnalysedQuery<B::Item>,
        zero_limit_pager: &Pager,
    ) -> Result<PageResult<B::Item>> {
        let peek_pager = zero_limit_pager.clone().with_limit(1);
        let items = self.find_items(backend, analysed, &peek_pager).await?;

        let Some(first) = items.first() else {
            return self
                .build_result_for_exhausted_window(backend, analysed, &peek_pager)
                .await;
        };

        let previous_cursor = self
            .cursor_builder
            .cursor_from_item(first, analysed.ordering_configurations())?;
        let next_cursor = self
            .cursor_builder
            .build_cursor_with_included_item(&previous_cursor);
        let has_previous = self.exists_before(backend, analysed, &previous_cursor).await?;

        Ok(PageResult {
            has_previous,
            has_next: true,
            previous_cursor: Some(previous_cursor),
            next_cursor: Some(next_cursor),
            ..PageResult::empty()
        })
    }

    async fn build_result_for_exhausted_window<B: QueryBackend>(
        &self,
        backend: &B,
        analysed: &AnalysedQuery<B::Item>,
        pager: &Pager,
    ) -> Result<PageResult<B::Item>> {
        match pager.navigation() {
            Navigation::Before(before) => {
                let next_cursor = self.cursor_builder.invert_cursor_inclusion(before);
                let has_next = self.exists_after(backend, analysed, &next_cursor).await?;
                Ok(PageResult {
                    has_previous: false,
                    has_next,
                    previous_cursor: Some(before.to_string()),
                    next_cursor: Some(next_cursor),
                    ..PageResult::empty()
                })
            }
            Navigation::After(after) => {
                let previous_cursor = self.cursor_builder.invert_cursor_inclusion(after);
                let has_previous = self.exists_before(backend, analysed, &previous_cursor).await?;
                Ok(PageResult {
                    has_previous,
                    has_next: false,
                    previous_cursor: Some(previous_cursor),
                    next_cursor: Some(after.to_string()),
                    ..PageResult::empty()
                })
            }
            Navigation::Offset(offset) if offset > 0 => {
                self.build_result_for_too_large_offset(backend, analysed, offset)
                    .await
            }
            _ => Ok(PageResult::empty()),
        }
    }

    /// Point both cursors at the last item of the whole collection
    async fn build_result_for_too_large_offset<B: QueryBackend>(
        &self,
        backend: &B,
        analysed: &AnalysedQuery<B::Item>,
        offset: u32,
    ) -> Result<PageResult<B::Item>> {
        let reversed = analysed.reversed();
        let items = self
            .find_items(backend, &reversed, &Pager::new().with_limit(1))
            .await?;

        let Some(last_item) = items.first() else {
            return Ok(PageResult::empty());
        };

        warn!(offset, "Offset is past the end of the collection");

        let last_item_cursor = self
            .cursor_builder
            .cursor_from_item(last_item, reversed.ordering_configurations())?;

        Ok(PageResult {
            has_previous: true,
            has_next: false,
            previous_cursor: Some(
                self.cursor_builder
                    .build_cursor_with_included_item(&last_item_cursor),
            ),
            next_cursor: Some(last_item_cursor),
            ..PageResult::empty()
        })
    }

    async fn exists_before<B: QueryBackend>(
        &self,
        backend: &B,
        analysed: &AnalysedQuery<B::Item>,
        previous_cursor: &str,
    ) -> Result<bool> {
        let probe = Pager::new().with_before(previous_cursor).with_limit(1);
        let query = self.page_query(analysed, &probe)?;
        backend.exists(&query).await
    }

    async fn exists_after<B: QueryBackend>(
        &self,
        backend: &B,
        analysed: &AnalysedQuery<B::Item>,
        next_cursor: &str,
    ) -> Result<bool> {
        let probe = Pager::new().with_after(next_cursor).with_limit(1);
        let query = self.page_query(analysed, &probe)?;
        backend.exists(&query).await
    }

    /// Total count derivable from an offset window without another query.
    ///
    /// Best effort: the window and the count are not read in one transaction.
    fn calculate_total_count(pager: &Pager, item_count: usize) -> Option<u64> {
        let offset = pager.offset()?;
        let item_count = item_count as u64;

        let window_not_full = pager
            .limit()
            .map_or(true, |limit| item_count < u64::from(limit));

        if window_not_full && (item_count != 0 || offset == 0) {
            Some(item_count + u64::from(offset))
        } else {
            None
        }
    }

    async fn find_count<B: QueryBackend>(
        &self,
        backend: &B,
        analysed: &AnalysedQuery<B::Item>,
    ) -> Result<u64> {
        let query = analysed.query_builder();

        let Some(column) = Self::single_valid_group_by_column(&query)? else {
            return backend.count(&query).await;
        };

        // Each group is one row: distinct non-null values, plus one for the NULL group
        let ungrouped = query.clear_group_by();
        let non_null_count = backend.count_distinct(&ungrouped, &column).await?;
        let null_exists = backend
            .exists(&ungrouped.where_null(&column).limit(1))
            .await?;

        debug!(
            column = %column,
            non_null_count,
            null_exists,
            "Counted grouped query"
        );
        Ok(non_null_count + u64::from(null_exists))
    }

    fn single_valid_group_by_column(query: &QueryBuilder) -> Result<Option<String>> {
        match query.group_by_fields() {
            [] => Ok(None),
            [single] => {
                let parts: Vec<&str> = single.split(',').map(str::trim).collect();
                if parts.len() > 1 {
                    return Err(PaginationError::InvalidGroupBy {
                        group_by: parts.join(", "),
                    });
                }
                Ok(Some(single.trim().to_string()))
            }
            many => Err(PaginationError::InvalidGroupBy {
                group_by: many.join(", "),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OrderingPair;
    use serde_json::Value;

    fn analysed(pager: &Pager) -> AnalysedQuery<Value> {
        let configured = ConfiguredQuery::new(QueryBuilder::new("children c"))
            .add_ordering_configuration(
                "name",
                OrderingConfiguration::with_path("c.name", "name").ascending(),
            );
        QueryAnalyser::new()
            .analyse_query(&configured, pager)
            .expect("valid request")
    }

    #[test]
    fn test_after_predicate_sql() {
        let pager = Pager::new()
            .with_order_by(OrderingPair::new("name"))
            .with_limit(2)
            .with_after("\"C1\",\"3\"");
        let query = ResultProvider::default()
            .page_query(&analysed(&pager), &pager)
            .expect("valid cursor");

        assert_eq!(
            query.build_sql(),
            "SELECT c.* FROM children c WHERE (c.name > 'C1' OR (c.name = 'C1' AND c.id > '3')) \
             ORDER BY c.name ASC, c.id ASC LIMIT 2"
        );
    }

    #[test]
    fn test_inclusive_before_predicate_reverses_ordering() {
        let pager = Pager::new()
            .with_order_by(OrderingPair::new("name"))
            .with_before("=\"C1\",\"3\"");
        let query = ResultProvider::default()
            .page_query(&analysed(&pager), &pager)
            .expect("valid cursor");

        assert_eq!(
            query.build_sql(),
            "SELECT c.* FROM children c WHERE (c.name < 'C1' OR (c.name = 'C1' AND c.id <= '3')) \
             ORDER BY c.name DESC, c.id DESC"
        );
    }

    #[test]
    fn test_offset_wins_over_cursor() {
        let pager = Pager::new().with_offset(4).with_after("\"7\"");
        let query = ResultProvider::default()
            .page_query(&analysed(&pager), &pager)
            .expect("offset needs no cursor");

        assert!(query.where_clauses().is_empty());
        assert_eq!(query.pagination().and_then(|p| p.offset), Some(4));
    }

    #[test]
    fn test_cursor_arity_is_checked() {
        let pager = Pager::new().with_after("\"C1\"");
        let result = ResultProvider::default().page_query(&analysed(&pager), &pager);
        assert!(matches!(result, Err(PaginationError::InvalidCursor { .. })));
    }

    #[test]
    fn test_total_count_shortcut() {
        let with = |limit: Option<u32>, offset: Option<u32>| {
            Pager::new().with_limit(limit).with_offset(offset)
        };

        assert_eq!(ResultProvider::calculate_total_count(&with(None, Some(28)), 2), Some(30));
        assert_eq!(ResultProvider::calculate_total_count(&with(Some(5), Some(0)), 0), Some(0));
        assert_eq!(ResultProvider::calculate_total_count(&with(Some(5), Some(0)), 5), None);
        assert_eq!(ResultProvider::calculate_total_count(&with(Some(5), Some(50)), 0), None);
        assert_eq!(ResultProvider::calculate_total_count(&with(Some(5), None), 2), None);
    }

    #[test]
    fn test_group_by_validation() {
        let single = QueryBuilder::new("parents p").group_by(&["p.group_key"]);
        assert_eq!(
            ResultProvider::single_valid_group_by_column(&single),
            Ok(Some("p.group_key".to_string()))
        );

        let many = QueryBuilder::new("parents p").group_by(&["p.group_key", "p.id"]);
        assert_eq!(
            ResultProvider::single_valid_group_by_column(&many),
            Err(PaginationError::InvalidGroupBy {
                group_by: "p.group_key, p.id".to_string()
            })
        );

        let composite = QueryBuilder::new("parents p").group_by(&["p.group_key,p.id"]);
        assert_eq!(
            ResultProvider::single_valid_group_by_column(&composite)
                .err()
                .and_then(|e| e.group_by().map(str::to_string)),
            Some("p.group_key, p.id".to_string())
        );
    }
}
