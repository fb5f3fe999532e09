//! # Pagination Configuration
//!
//! Engine-wide defaults: page size used by full-collection iteration, the
//! maximum offset accepted before callers must switch to cursors, and the
//! identity field appended as the ordering tie-breaker.
//!
//! Values come from [`Default`], optionally layered with a configuration file
//! and `PAGINATION_*` environment variables.

use crate::error::{PaginationError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

pub const ENV_PREFIX: &str = "PAGINATION";
pub const DEFAULT_PAGE_SIZE: u32 = 1000;
pub const DEFAULT_IDENTITY_FIELD: &str = "id";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// Limit used by `ResultIterator` when the start pager has none
    pub default_page_size: u32,

    /// Largest offset accepted by `ConfiguredQuery::from_config` queries
    pub maximum_offset: Option<u32>,

    /// Field of the root entity that uniquely identifies a record
    pub identity_field: String,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            maximum_offset: None,
            identity_field: DEFAULT_IDENTITY_FIELD.to_string(),
        }
    }
}

impl PaginationConfig {
    /// Defaults overridden by `PAGINATION_DEFAULT_PAGE_SIZE`,
    /// `PAGINATION_MAXIMUM_OFFSET` and `PAGINATION_IDENTITY_FIELD`
    pub fn from_env() -> Result<Self> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Load an optional file (format from its extension) with `PAGINATION_*`
    /// environment variables layered on top
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading pagination configuration");

        let config: Self = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_page_size == 0 {
            return Err(PaginationError::configuration(
                "default_page_size must be greater than zero",
            ));
        }
        if self.identity_field.trim().is_empty() {
            return Err(PaginationError::configuration(
                "identity_field must not be empty",
            ));
        }
        Ok(())
    }

    fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(page_size) = lookup("PAGINATION_DEFAULT_PAGE_SIZE") {
            self.default_page_size = page_size.parse().map_err(|e| {
                PaginationError::configuration(format!("Invalid default_page_size: {e}"))
            })?;
        }

        if let Some(maximum_offset) = lookup("PAGINATION_MAXIMUM_OFFSET") {
            self.maximum_offset = Some(maximum_offset.parse().map_err(|e| {
                PaginationError::configuration(format!("Invalid maximum_offset: {e}"))
            })?);
        }

        if let Some(identity_field) = lookup("PAGINATION_IDENTITY_FIELD") {
            self.identity_field = identity_field;
        }

        self.validate()?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = PaginationConfig::default();
        assert_eq!(config.default_page_size, 1000);
        assert_eq!(config.maximum_offset, None);
        assert_eq!(config.identity_field, "id");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let config = PaginationConfig::default()
            .with_overrides(lookup_from(&[
                ("PAGINATION_DEFAULT_PAGE_SIZE", "50"),
                ("PAGINATION_MAXIMUM_OFFSET", "10000"),
            ]))
            .expect("valid overrides");

        assert_eq!(config.default_page_size, 50);
        assert_eq!(config.maximum_offset, Some(10000));
        assert_eq!(config.identity_field, "id");
    }

    #[test]
    fn test_invalid_override_is_configuration_error() {
        let result = PaginationConfig::default()
            .with_overrides(lookup_from(&[("PAGINATION_DEFAULT_PAGE_SIZE", "many")]));
        assert!(matches!(result, Err(PaginationError::Configuration(_))));

        let result = PaginationConfig::default()
            .with_overrides(lookup_from(&[("PAGINATION_DEFAULT_PAGE_SIZE", "0")]));
        assert!(matches!(result, Err(PaginationError::Configuration(_))));
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        writeln!(file, "default_page_size = 25\nmaximum_offset = 500").expect("write config");

        let config = PaginationConfig::load(file.path()).expect("config loads");
        assert_eq!(config.default_page_size, 25);
        assert_eq!(config.maximum_offset, Some(500));
        assert_eq!(config.identity_field, "id");
    }
}
