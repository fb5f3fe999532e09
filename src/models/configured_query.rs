use super::OrderingConfiguration;
use crate::config::{PaginationConfig, DEFAULT_IDENTITY_FIELD};
use crate::error::{PaginationError, Result};
use crate::query_builder::QueryBuilder;
use std::collections::HashMap;
use std::fmt;

/// A base query plus everything needed to page through it: the orderings
/// callers may request by name, and per-query paging options.
pub struct ConfiguredQuery<T> {
    query: QueryBuilder,
    ordering_configurations: HashMap<String, OrderingConfiguration<T>>,
    total_count_needed: bool,
    maximum_offset: Option<u32>,
    identity_field: String,
}

impl<T> ConfiguredQuery<T> {
    pub fn new(query: QueryBuilder) -> Self {
        Self {
            query,
            ordering_configurations: HashMap::new(),
            total_count_needed: false,
            maximum_offset: None,
            identity_field: DEFAULT_IDENTITY_FIELD.to_string(),
        }
    }

    /// Seed maximum offset and identity field from engine configuration
    pub fn from_config(query: QueryBuilder, config: &PaginationConfig) -> Self {
        Self::new(query)
            .with_maximum_offset(config.maximum_offset)
            .with_identity_field(&config.identity_field)
    }

    pub fn add_ordering_configuration(
        mut self,
        name: &str,
        configuration: OrderingConfiguration<T>,
    ) -> Self {
        self.ordering_configurations
            .insert(name.to_string(), configuration);
        self
    }

    pub fn add_ordering_configurations<I, S>(mut self, configurations: I) -> Self
    where
        I: IntoIterator<Item = (S, OrderingConfiguration<T>)>,
        S: Into<String>,
    {
        self.ordering_configurations.extend(
            configurations
                .into_iter()
                .map(|(name, configuration)| (name.into(), configuration)),
        );
        self
    }

    pub fn with_total_count_needed(mut self, total_count_needed: bool) -> Self {
        self.total_count_needed = total_count_needed;
        self
    }

    pub fn with_maximum_offset(mut self, maximum_offset: impl Into<Option<u32>>) -> Self {
        self.maximum_offset = maximum_offset.into();
        self
    }

    pub fn with_identity_field(mut self, identity_field: &str) -> Self {
        self.identity_field = identity_field.to_string();
        self
    }

    pub fn query(&self) -> &QueryBuilder {
        &self.query
    }

    pub fn ordering_configurations(&self) -> &HashMap<String, OrderingConfiguration<T>> {
        &self.ordering_configurations
    }

    pub fn has_ordering_configuration(&self, name: &str) -> bool {
        self.ordering_configurations.contains_key(name)
    }

    pub fn ordering_configuration_for(&self, name: &str) -> Result<&OrderingConfiguration<T>> {
        self.ordering_configurations
            .get(name)
            .ok_or_else(|| PaginationError::invalid_order_by(name))
    }

    pub fn is_total_count_needed(&self) -> bool {
        self.total_count_needed
    }

    pub fn maximum_offset(&self) -> Option<u32> {
        self.maximum_offset
    }

    pub fn identity_field(&self) -> &str {
        &self.identity_field
    }
}

impl<T> Clone for ConfiguredQuery<T> {
    fn clone(&self) -> Self {
        Self {
            query: self.query.clone(),
            ordering_configurations: self.ordering_configurations.clone(),
            total_count_needed: self.total_count_needed,
            maximum_offset: self.maximum_offset,
            identity_field: self.identity_field.clone(),
        }
    }
}

impl<T> fmt::Debug for ConfiguredQuery<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfiguredQuery")
            .field("query", &self.query)
            .field("ordering_configurations", &self.ordering_configurations)
            .field("total_count_needed", &self.total_count_needed)
            .field("maximum_offset", &self.maximum_offset)
            .field("identity_field", &self.identity_field)
            .finish()
    }
}
