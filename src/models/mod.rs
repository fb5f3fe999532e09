pub mod configured_query;
pub mod field_value;
pub mod ordering;
pub mod page_result;
pub mod pager;

// Re-export paging models for easy access
pub use configured_query::ConfiguredQuery;
pub use field_value::{FieldValue, Record, TIMESTAMP_FORMAT};
pub use ordering::{
    Accessor, AccessorFn, OrderingConfiguration, OrderingConfigurationBuilder, OrderingPair,
    SortDirection,
};
pub use page_result::PageResult;
pub use pager::{Navigation, Pager};
