use crate::error::{PaginationError, Result};
use crate::models::{ConfiguredQuery, OrderingConfiguration, Pager, SortDirection};
use crate::query_builder::QueryBuilder;
use tracing::debug;

/// A validated base query with its fully resolved ordering.
///
/// The ordering always ends with a key on the root identity field, so every
/// record has a distinct position and cursors built against it are unique.
#[derive(Debug)]
pub struct AnalysedQuery<T> {
    query: QueryBuilder,
    root_alias: String,
    ordering_configurations: Vec<OrderingConfiguration<T>>,
}

impl<T> AnalysedQuery<T> {
    /// Clone of the base query, ready for ordering and windowing
    pub fn query_builder(&self) -> QueryBuilder {
        self.query.clone()
    }

    pub fn query(&self) -> &QueryBuilder {
        &self.query
    }

    pub fn root_alias(&self) -> &str {
        &self.root_alias
    }

    pub fn ordering_configurations(&self) -> &[OrderingConfiguration<T>] {
        &self.ordering_configurations
    }

    /// Same query with every ordering key reversed
    pub fn reversed(&self) -> Self {
        Self {
            query: self.query.clone(),
            root_alias: self.root_alias.clone(),
            ordering_configurations: self
                .ordering_configurations
                .iter()
                .map(OrderingConfiguration::reversed)
                .collect(),
        }
    }
}

impl<T> Clone for AnalysedQuery<T> {
    fn clone(&self) -> Self {
        Self {
            query: self.query.clone(),
            root_alias: self.root_alias.clone(),
            ordering_configurations: self.ordering_configurations.clone(),
        }
    }
}

/// Validates paging requests against a configured query and resolves the
/// requested ordering. Never touches the backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryAnalyser;

impl QueryAnalyser {
    pub fn new() -> Self {
        Self
    }

    pub fn analyse_query<T>(
        &self,
        configured_query: &ConfiguredQuery<T>,
        pager: &Pager,
    ) -> Result<AnalysedQuery<T>> {
        let mut analysed = self.analyse_query_without_pager(configured_query)?;

        if let (Some(given), Some(maximum)) = (pager.offset(), configured_query.maximum_offset()) {
            if given > maximum {
                return Err(PaginationError::TooLargeOffset { maximum, given });
            }
        }

        let identity_expression = format!(
            "{}.{}",
            analysed.root_alias,
            configured_query.identity_field()
        );

        let mut ordering_configurations = Vec::with_capacity(pager.ordering_pairs().len() + 1);
        let mut identity_included = false;
        let mut default_direction: Option<SortDirection> = None;

        for pair in pager.ordering_pairs() {
            let configured = configured_query.ordering_configuration_for(pair.order_by())?;
            let configuration = match pair.direction() {
                Some(direction) => configured.with_direction(direction),
                None => configured.clone(),
            };

            if configuration.expression() == identity_expression {
                identity_included = true;
            }
            default_direction.get_or_insert(configuration.direction());
            ordering_configurations.push(configuration);
        }

        if !identity_included {
            ordering_configurations.push(
                OrderingConfiguration::with_path(
                    &identity_expression,
                    configured_query.identity_field(),
                )
                .with_direction(default_direction.unwrap_or_default()),
            );
        }

        debug!(
            root_alias = %analysed.root_alias,
            ordering = ?ordering_configurations
                .iter()
                .map(|c| format!("{} {}", c.expression(), c.direction().as_sql()))
                .collect::<Vec<_>>(),
            "Resolved ordering"
        );

        analysed.ordering_configurations = ordering_configurations;
        Ok(analysed)
    }

    /// Validate the base query alone; the resulting ordering is empty
    pub fn analyse_query_without_pager<T>(
        &self,
        configured_query: &ConfiguredQuery<T>,
    ) -> Result<AnalysedQuery<T>> {
        let query = configured_query.query();
        let root_alias = query.root_alias().ok_or_else(|| {
            PaginationError::configuration(format!(
                "Cannot resolve a single root alias from \"{}\"",
                query.base_table()
            ))
        })?;

        Ok(AnalysedQuery {
            root_alias: root_alias.to_string(),
            query: query.clone(),
            ordering_configurations: Vec::new(),
        })
    }
}
