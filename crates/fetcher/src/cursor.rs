//! Pagination cursor: which result stream is active and how far it has been
//! delivered.

use query::FilterState;
use std::num::NonZeroU32;

/// Offset-based cursor over one filter's result stream.
///
/// A cursor is created by every reset and tagged with that reset's
/// generation. Its filter never changes; only the offset moves, and only
/// forward, after a page at the new offset was delivered.
#[derive(Debug, Clone, PartialEq)]
pub struct PaginationCursor {
    generation: u64,
    filter: FilterState,
    page_size: NonZeroU32,
    offset: u64,
}

impl PaginationCursor {
    pub(crate) fn new(generation: u64, filter: FilterState, page_size: NonZeroU32) -> Self {
        Self {
            generation,
            filter,
            page_size,
            offset: 0,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn page_size(&self) -> NonZeroU32 {
        self.page_size
    }

    /// Offset of the last page delivered.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Offset the next `more()` will request.
    pub fn next_offset(&self) -> u64 {
        self.offset + u64::from(self.page_size.get())
    }

    pub(crate) fn advance_to(&mut self, offset: u64) {
        debug_assert!(offset >= self.offset);
        self.offset = offset;
    }
}
