pub mod cursor_builder;
pub mod query_analyser;
pub mod result_iterator;
pub mod result_provider;

pub use cursor_builder::{CursorBuilder, ParsedCursor};
pub use query_analyser::{AnalysedQuery, QueryAnalyser};
pub use result_iterator::{CycleHook, NoopCycleHook, ResultIterator};
pub use result_provider::ResultProvider;
