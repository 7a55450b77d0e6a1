//! Page-bump linear arena.
//!
//! Allocation is a pointer bump within the current page; individual
//! frees are not supported (the whole point of the strategy is to skip
//! per-allocation bookkeeping). The arena grows by appending a new
//! zero-initialized page on demand, up to [`MAX_PAGES`]; [`reset`]
//! rewinds every page to its start in one O(page count) pass rather
//! than freeing and reallocating.
//!
//! [`reset`]: LinearArena::reset

use crate::handle::BumpHandle;
use crate::tag::{Tag, TAG_COUNT};

/// Hard ceiling on the number of pages a single arena may grow to.
pub const MAX_PAGES: usize = 255;

struct Page {
    bytes: Vec<u8>,
    cursor: u32,
}

/// A linear (bump/arena) allocator over one fixed page size.
///
/// Frees are no-ops (a [`LinearArena::free`] call logs a warning and
/// returns); the whole arena is reclaimed at once via [`LinearArena::reset`]
/// or by dropping it.
pub struct LinearArena {
    page_size: u32,
    pages: Vec<Page>,
    tagged_count: [u64; TAG_COUNT],
    tagged_size: [u64; TAG_COUNT],
}

impl LinearArena {
    /// Creates an arena whose pages are each `page_size` bytes.
    /// `page_size` of zero is fatal — a linear allocator with no page
    /// budget cannot satisfy any request.
    pub fn new(page_size: u32) -> Self {
        let _frame = teleios_trace::frame!("page_size={page_size}", page_size);
        if page_size == 0 {
            teleios_log::fatal!("LinearArena::new requires page_size > 0");
        }
        LinearArena {
            page_size,
            pages: Vec::new(),
            tagged_count: [0; TAG_COUNT],
            tagged_size: [0; TAG_COUNT],
        }
    }

    /// The configured page size.
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of pages currently allocated.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Allocates `bytes` tagged `tag`. Fatal if `bytes` is zero, if
    /// `bytes` exceeds the page size (the request can never be
    /// satisfied by any page), or if satisfying the request would grow
    /// the arena past [`MAX_PAGES`].
    pub fn alloc(&mut self, tag: Tag, bytes: u32) -> BumpHandle {
        let _frame = teleios_trace::frame!("tag={tag:?} bytes={bytes}", tag, bytes);
        if bytes == 0 {
            teleios_log::fatal!("LinearArena::alloc requires bytes > 0");
        }
        if bytes > self.page_size {
            teleios_log::fatal!(
                "allocation of {bytes} bytes exceeds page_size {}",
                self.page_size
            );
        }

        let needs_new_page = match self.pages.last() {
            Some(page) => page.cursor + bytes > self.page_size,
            None => true,
        };
        if needs_new_page {
            if self.pages.len() >= MAX_PAGES {
                teleios_log::fatal!("LinearArena exceeded the {MAX_PAGES}-page limit");
            }
            self.pages.push(Page {
                bytes: vec![0u8; self.page_size as usize],
                cursor: 0,
            });
            teleios_log::debug!("LinearArena grew to {} pages", self.pages.len());
        }

        let page_index = self.pages.len() - 1;
        let page = &mut self.pages[page_index];
        let offset = page.cursor;
        page.cursor += bytes;

        self.tagged_count[tag.index()] += 1;
        self.tagged_size[tag.index()] += u64::from(bytes);

        BumpHandle {
            page: page_index as u16,
            offset,
            len: bytes,
            tag,
        }
    }

    /// Individual frees are not supported by the linear strategy; this
    /// logs a warning and otherwise does nothing. Memory is reclaimed
    /// in bulk via [`LinearArena::reset`].
    pub fn free(&mut self, handle: BumpHandle) {
        teleios_log::warn!(
            "LinearArena::free is a no-op (tag={:?} bytes={})",
            handle.tag,
            handle.len
        );
    }

    /// Rewinds every page's cursor to zero and clears per-tag
    /// accounting, without releasing the pages themselves — the next
    /// round of allocations reuses the already-grown page set.
    pub fn reset(&mut self) {
        let _frame = teleios_trace::frame!();
        for page in &mut self.pages {
            page.cursor = 0;
        }
        self.tagged_count = [0; TAG_COUNT];
        self.tagged_size = [0; TAG_COUNT];
    }

    /// Borrows the bytes a handle refers to.
    ///
    /// Fatal if `handle` does not belong to this arena (an invalid page
    /// index). Content past the arena's last [`LinearArena::reset`] is
    /// still readable: reset only rewinds cursors, it does not zero
    /// pages.
    pub fn resolve(&self, handle: BumpHandle) -> &[u8] {
        let page = self.pages.get(handle.page as usize).unwrap_or_else(|| {
            teleios_log::fatal!("BumpHandle page {} is out of range", handle.page);
        });
        let start = handle.offset as usize;
        let end = start + handle.len as usize;
        &page.bytes[start..end]
    }

    /// Mutably borrows the bytes a handle refers to.
    pub fn resolve_mut(&mut self, handle: BumpHandle) -> &mut [u8] {
        let len = self.pages.len();
        if handle.page as usize >= len {
            teleios_log::fatal!("BumpHandle page {} is out of range", handle.page);
        }
        let page = &mut self.pages[handle.page as usize];
        let start = handle.offset as usize;
        let end = start + handle.len as usize;
        &mut page.bytes[start..end]
    }

    /// Count of live allocations tagged `tag` since the last reset.
    pub fn tagged_count(&self, tag: Tag) -> u64 {
        self.tagged_count[tag.index()]
    }

    /// Bytes allocated under `tag` since the last reset.
    pub fn tagged_size(&self, tag: Tag) -> u64 {
        self.tagged_size[tag.index()]
    }

    /// Total bytes allocated across all tags since the last reset.
    pub fn live_bytes(&self) -> u64 {
        self.tagged_size.iter().sum()
    }
}

impl Drop for LinearArena {
    fn drop(&mut self) {
        teleios_log::debug!(
            "LinearArena destroyed ({} pages, {} bytes live)",
            self.pages.len(),
            self.live_bytes()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_bumps_within_a_page() {
        let mut arena = LinearArena::new(64);
        let a = arena.alloc(Tag::Block, 16);
        let b = arena.alloc(Tag::Block, 16);
        assert_eq!(arena.page_count(), 1);
        assert_ne!(a.offset, b.offset);
    }

    #[test]
    fn alloc_grows_a_new_page_when_current_is_full() {
        let mut arena = LinearArena::new(16);
        arena.alloc(Tag::Block, 16);
        arena.alloc(Tag::Block, 16);
        assert_eq!(arena.page_count(), 2);
    }

    #[test]
    fn reset_rewinds_without_releasing_pages() {
        let mut arena = LinearArena::new(16);
        arena.alloc(Tag::Block, 16);
        arena.alloc(Tag::Block, 16);
        assert_eq!(arena.page_count(), 2);
        arena.reset();
        assert_eq!(arena.page_count(), 2);
        assert_eq!(arena.live_bytes(), 0);
        let a = arena.alloc(Tag::Block, 16);
        assert_eq!(a.page, 0);
        assert_eq!(a.offset, 0);
    }

    #[test]
    fn resolve_returns_the_written_bytes() {
        let mut arena = LinearArena::new(64);
        let handle = arena.alloc(Tag::String, 4);
        arena.resolve_mut(handle).copy_from_slice(b"ok!\0");
        assert_eq!(arena.resolve(handle), b"ok!\0");
    }

    #[test]
    fn tagged_accounting_tracks_count_and_size() {
        let mut arena = LinearArena::new(64);
        arena.alloc(Tag::ContainerList, 8);
        arena.alloc(Tag::ContainerList, 8);
        assert_eq!(arena.tagged_count(Tag::ContainerList), 2);
        assert_eq!(arena.tagged_size(Tag::ContainerList), 16);
        assert_eq!(arena.tagged_count(Tag::Block), 0);
    }

    #[test]
    fn free_is_a_warning_only_no_op() {
        let mut arena = LinearArena::new(64);
        let handle = arena.alloc(Tag::Block, 8);
        assert_eq!(arena.live_bytes(), 8);
        arena.free(handle);
        assert_eq!(arena.live_bytes(), 8);
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn total_size_equals_sum_of_requests(sizes in proptest::collection::vec(1u32..=32, 1..20)) {
                let mut arena = LinearArena::new(32);
                for &size in &sizes {
                    arena.alloc(Tag::Block, size);
                }
                let expected: u64 = sizes.iter().map(|&s| u64::from(s)).sum();
                prop_assert_eq!(arena.live_bytes(), expected);
            }

            #[test]
            fn reset_always_returns_live_bytes_to_zero(sizes in proptest::collection::vec(1u32..=32, 0..20)) {
                let mut arena = LinearArena::new(32);
                for &size in &sizes {
                    arena.alloc(Tag::Block, size);
                }
                arena.reset();
                prop_assert_eq!(arena.live_bytes(), 0);
            }
        }
    }
}
