//! The page fetcher owns the pagination cursor for one view and turns
//! `reset` / `more` requests into data-source queries.
//!
//! Two rules keep the delivered list consistent:
//! - every reset bumps a generation counter, and a page whose fetch was issued
//!   under an older generation comes back as [`PageKind::Stale`] instead of
//!   being applied;
//! - at most one fetch is in flight; a `more()` issued while another fetch is
//!   pending is a no-op ([`PageKind::Skipped`]).
//!
//! The state lock is never held across an await.

use crate::config::BrowseConfig;
use crate::cursor::PaginationCursor;
use crate::error::{ConfigError, FetchError, Result};
use crate::source::DataSource;
use archive::Post;
use query::{FilterState, QueryBuilder, SortDirection, Statement};
use serde_json::Value;
use std::num::NonZeroU32;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// How the consumer should apply a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    /// Replace the displayed list.
    Reset,
    /// Append to the displayed list.
    Append,
    /// Another fetch was already in flight; nothing was requested.
    Skipped,
    /// The fetch belonged to a cursor that a later reset replaced.
    Stale,
}

/// One delivered page of posts.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    kind: PageKind,
    posts: Vec<Post>,
    offset: u64,
    generation: u64,
    page_size: u32,
}

impl Page {
    fn delivered(kind: PageKind, posts: Vec<Post>, offset: u64, generation: u64, page_size: u32) -> Self {
        Self {
            kind,
            posts,
            offset,
            generation,
            page_size,
        }
    }

    fn empty(kind: PageKind, generation: u64, page_size: u32) -> Self {
        Self::delivered(kind, Vec::new(), 0, generation, page_size)
    }

    pub fn kind(&self) -> PageKind {
        self.kind
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn into_posts(self) -> Vec<Post> {
        self.posts
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Whether the consumer should touch its list at all.
    pub fn is_applicable(&self) -> bool {
        matches!(self.kind, PageKind::Reset | PageKind::Append)
    }

    /// A delivered page shorter than the page size ends the result stream.
    pub fn is_last(&self) -> bool {
        self.is_applicable() && self.posts.len() < self.page_size as usize
    }
}

#[derive(Debug, Default)]
struct FetchState {
    cursor: Option<PaginationCursor>,
    generation: u64,
    in_flight: Option<u64>,
}

/// Clears the in-flight marker if the fetch future is dropped before it
/// completes, so a cancelled fetch cannot block later ones.
///
/// A cancelled reset never delivered page 1, so its cursor is cleared too;
/// otherwise the next `more()` would start at page 2.
struct InFlight<'a> {
    state: &'a Mutex<FetchState>,
    generation: u64,
    is_reset: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.in_flight != Some(self.generation) {
            return;
        }
        state.in_flight = None;

        let owns_cursor = state
            .cursor
            .as_ref()
            .is_some_and(|cursor| cursor.generation() == self.generation);
        if self.is_reset && owns_cursor {
            debug!("Reset of generation {} cancelled; clearing cursor", self.generation);
            state.cursor = None;
        }
    }
}

/// Fetches pages of posts for one consumer view.
///
/// ## Usage
/// ```ignore
/// let fetcher = PageFetcher::new(Arc::new(source), NonZeroU32::new(20).unwrap());
/// let first = fetcher.reset(filter).await?;
/// let next = fetcher.more().await?;
/// ```
pub struct PageFetcher {
    source: Arc<dyn DataSource>,
    builder: QueryBuilder,
    page_size: NonZeroU32,
    default_sort: (String, SortDirection),
    state: Mutex<FetchState>,
}

impl PageFetcher {
    /// Fetcher with the standard query builder and a `Date DESC` fallback sort.
    pub fn new(source: Arc<dyn DataSource>, page_size: NonZeroU32) -> Self {
        Self {
            source,
            builder: QueryBuilder::new(),
            page_size,
            default_sort: ("Date".to_string(), SortDirection::Descending),
            state: Mutex::new(FetchState::default()),
        }
    }

    /// Fetcher wired from configuration: page size, sort allow-list and
    /// fallback sort.
    pub fn from_config(source: Arc<dyn DataSource>, config: &BrowseConfig) -> std::result::Result<Self, ConfigError> {
        let (column, direction) = config.default_sort()?;
        Ok(Self::new(source, config.page_size()?)
            .with_builder(QueryBuilder::with_allow_list(config.allow_list()?))
            .with_default_sort(column, direction))
    }

    /// Replace the query builder (builder pattern).
    pub fn with_builder(mut self, builder: QueryBuilder) -> Self {
        self.builder = builder;
        self
    }

    /// Sort used when a reset asks for one outside the allow-list and no
    /// cursor is active.
    pub fn with_default_sort(mut self, column: impl Into<String>, direction: SortDirection) -> Self {
        self.default_sort = (column.into(), direction);
        self
    }

    pub fn page_size(&self) -> NonZeroU32 {
        self.page_size
    }

    /// Snapshot of the active cursor, if a search has been started.
    pub fn cursor(&self) -> Option<PaginationCursor> {
        self.lock_state().cursor.clone()
    }

    pub fn is_fetching(&self) -> bool {
        self.lock_state().in_flight.is_some()
    }

    /// Start a new result stream for `filter` and fetch its first page.
    ///
    /// Any fetch still in flight is abandoned: its result will come back as
    /// [`PageKind::Stale`]. If the first page cannot be fetched, or the returned
    /// future is dropped before it completes, the cursor is cleared and the
    /// caller has to reset again.
    ///
    /// A sort outside the allow-list is not an error here. The active cursor's
    /// sort is kept instead, or the default sort when there is none.
    ///
    /// # Arguments
    /// * `filter` - The filter state that defines the new result stream
    ///
    /// # Returns
    /// * `Ok(Page)` - Page 1 of kind `Reset`, or an empty `Stale` page if a
    ///   later reset superseded this one while it was in flight
    /// * `Err(FetchError::Query)` - If a date bound is malformed
    /// * `Err(FetchError::Source | FetchError::Decode)` - If the data source
    ///   failed or returned a malformed row
    pub async fn reset(&self, filter: FilterState) -> Result<Page> {
        let limit = self.page_size.get();
        let (statement, generation) = {
            let mut state = self.lock_state();
            let filter = self.resolve_sort(filter, state.cursor.as_ref());
            let statement = self.builder.build(&filter, limit, 0)?;

            state.generation += 1;
            let generation = state.generation;
            if let Some(abandoned) = state.in_flight.replace(generation) {
                debug!("Abandoning in-flight fetch of generation {}", abandoned);
            }
            state.cursor = Some(PaginationCursor::new(generation, filter, self.page_size));
            (statement, generation)
        };
        let _in_flight = InFlight {
            state: &self.state,
            generation,
            is_reset: true,
        };

        info!("Reset search (generation {})", generation);
        let result = self.fetch(&statement).await;

        let mut state = self.lock_state();
        if state.generation != generation {
            warn!("Discarding first page of superseded generation {}", generation);
            return Ok(Page::empty(PageKind::Stale, generation, limit));
        }
        state.in_flight = None;

        match result {
            Ok(posts) => Ok(Page::delivered(PageKind::Reset, posts, 0, generation, limit)),
            Err(err) => {
                state.cursor = None;
                Err(err)
            }
        }
    }

    /// Fetch the page after the last delivered one.
    ///
    /// Returns [`PageKind::Skipped`] without querying if a fetch is already in
    /// flight. On failure the cursor does not move, so calling `more()` again
    /// retries the same page.
    ///
    /// # Returns
    /// * `Ok(Page)` - The next page of kind `Append`; empty once the stream is
    ///   exhausted. `Skipped` or `Stale` pages carry no posts.
    /// * `Err(FetchError::NoActiveCursor)` - If no reset has delivered page 1
    /// * `Err(FetchError::Source | FetchError::Decode)` - If the fetch failed
    pub async fn more(&self) -> Result<Page> {
        let limit = self.page_size.get();
        let (statement, generation, offset) = {
            let mut state = self.lock_state();
            let Some(cursor) = state.cursor.as_ref() else {
                return Err(FetchError::NoActiveCursor);
            };
            let generation = cursor.generation();
            if state.in_flight.is_some() {
                debug!("Fetch already in flight, skipping more()");
                return Ok(Page::empty(PageKind::Skipped, generation, limit));
            }

            let offset = cursor.next_offset();
            let statement = self.builder.build(cursor.filter(), limit, offset)?;
            state.in_flight = Some(generation);
            (statement, generation, offset)
        };
        let _in_flight = InFlight {
            state: &self.state,
            generation,
            is_reset: false,
        };

        let result = self.fetch(&statement).await;

        let mut state = self.lock_state();
        if state.generation != generation {
            warn!("Discarding page at offset {} of superseded generation {}", offset, generation);
            return Ok(Page::empty(PageKind::Stale, generation, limit));
        }
        state.in_flight = None;

        let posts = result?;
        if let Some(cursor) = state.cursor.as_mut() {
            cursor.advance_to(offset);
        }
        Ok(Page::delivered(PageKind::Append, posts, offset, generation, limit))
    }

    /// Distinct category names known to the data source.
    pub async fn categories(&self) -> Result<Vec<String>> {
        let statement = self.builder.build_categories();
        let rows = self.source.query(statement.sql(), statement.params()).await?;
        Ok(rows
            .into_iter()
            .filter_map(|mut row| match row.remove("CategoryName") {
                Some(Value::String(name)) => Some(name),
                _ => None,
            })
            .collect())
    }

    async fn fetch(&self, statement: &Statement) -> Result<Vec<Post>> {
        debug!("Fetching: {} ({} params)", statement.sql(), statement.params().len());
        let rows = self.source.query(statement.sql(), statement.params()).await?;
        let posts = rows
            .into_iter()
            .map(Post::from_row)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(posts)
    }

    /// Replace a sort outside the allow-list with the active cursor's sort,
    /// or the default sort when there is no cursor.
    fn resolve_sort(&self, mut filter: FilterState, active: Option<&PaginationCursor>) -> FilterState {
        if let Err(err) = self.builder.validate_sort(&filter) {
            let (column, direction) = match active {
                Some(cursor) => (
                    cursor.filter().sort_column.clone(),
                    cursor.filter().sort_direction,
                ),
                None => self.default_sort.clone(),
            };
            warn!("{}; falling back to {} {}", err, column, direction);
            filter.sort_column = column;
            filter.sort_direction = direction;
        }
        filter
    }

    fn lock_state(&self) -> MutexGuard<'_, FetchState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
