//! # Result Iterator
//!
//! Streams every record of a configured query by walking pages forward with
//! cursors. Pages are only fetched as the stream is polled; dropping the stream
//! stops the walk.

use super::ResultProvider;
use crate::backend::QueryBackend;
use crate::config::PaginationConfig;
use crate::error::{PaginationError, Result};
use crate::models::{ConfiguredQuery, Pager};
use async_trait::async_trait;
use futures::stream::{self, Stream};
use tracing::info;

/// Side effect run after every page has been fully consumed, e.g. flushing
/// changes made to the page's records
#[async_trait]
pub trait CycleHook: Send + Sync {
    async fn on_cycle_end(&self) -> Result<()>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCycleHook;

#[async_trait]
impl CycleHook for NoopCycleHook {
    async fn on_cycle_end(&self) -> Result<()> {
        Ok(())
    }
}

struct IterationState<T> {
    items: std::vec::IntoIter<T>,
    next_pager: Option<Pager>,
    cycle_pending: bool,
    started: bool,
}

#[derive(Debug, Clone)]
pub struct ResultIterator<H = NoopCycleHook> {
    result_provider: ResultProvider,
    default_page_size: u32,
    hook: H,
}

impl ResultIterator<NoopCycleHook> {
    pub fn new(result_provider: ResultProvider, default_page_size: u32) -> Self {
        Self::with_hook(result_provider, default_page_size, NoopCycleHook)
    }

    pub fn from_config(config: &PaginationConfig) -> Self {
        Self::new(ResultProvider::default(), config.default_page_size)
    }
}

impl<H: CycleHook> ResultIterator<H> {
    pub fn with_hook(result_provider: ResultProvider, default_page_size: u32, hook: H) -> Self {
        Self {
            result_provider,
            default_page_size,
            hook,
        }
    }

    pub fn default_page_size(&self) -> u32 {
        self.default_page_size
    }

    pub fn hook(&self) -> &H {
        &self.hook
    }

    /// Lazily yield every record, starting from `start` when given.
    ///
    /// The start pager's ordering and limit are kept for every page; its
    /// offset (if any) only applies to the first one. A missing or zero limit
    /// falls back to the default page size. The hook runs once the
    /// last item of each page has been yielded. An error ends the stream.
    pub fn iterate<'a, B: QueryBackend>(
        &'a self,
        backend: &'a B,
        configured_query: &'a ConfiguredQuery<B::Item>,
        start: Option<Pager>,
    ) -> impl Stream<Item = Result<B::Item>> + 'a {
        let start = start.unwrap_or_default();
        // a zero limit never advances the cursor
        let page_size = start
            .limit()
            .filter(|limit| *limit > 0)
            .unwrap_or(self.default_page_size.max(1));
        let start = start.with_limit(page_size);

        let initial = IterationState {
            items: Vec::new().into_iter(),
            next_pager: Some(start),
            cycle_pending: false,
            started: false,
        };

        stream::try_unfold(initial, move |mut state| async move {
            loop {
                if let Some(item) = state.items.next() {
                    return Ok::<_, PaginationError>(Some((item, state)));
                }

                if state.cycle_pending {
                    self.hook.on_cycle_end().await?;
                    state.cycle_pending = false;
                }

                let Some(pager) = state.next_pager.take() else {
                    info!("Finished iterating");
                    return Ok(None);
                };

                if state.started {
                    info!(after = ?pager.after(), "Continuing with iteration");
                }
                state.started = true;

                let page = self
                    .result_provider
                    .get_result_for_query(backend, configured_query, &pager)
                    .await?;

                state.next_pager = match (page.has_next, page.next_cursor.as_deref()) {
                    (true, Some(after)) => Some(
                        Pager::new()
                            .with_ordering_pairs(pager.ordering_pairs().to_vec())
                            .with_limit(pager.limit())
                            .with_after(after),
                    ),
                    _ => None,
                };
                state.cycle_pending = true;
                state.items = page.items.into_iter();
            }
        })
    }
}
