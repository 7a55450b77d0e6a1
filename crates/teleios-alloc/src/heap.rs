//! Tracked heap allocator.
//!
//! Every live allocation has an entry in an [`IndexMap`] keyed by a
//! monotonically increasing id, standing in for the original engine's
//! intrusive free list — deterministic iteration order without raw
//! pointers into the allocation itself. Individual frees are supported
//! and required (unlike the linear strategy); a double free or an
//! unknown handle is fatal — callers never branch on a NULL result.

use indexmap::IndexMap;

use crate::handle::HeapHandle;
use crate::tag::{Tag, ALL_TAGS, TAG_COUNT};

struct Record {
    tag: Tag,
    bytes: Vec<u8>,
}

/// An individually-freeable heap allocator with per-allocation leak
/// tracking.
pub struct TrackedHeap {
    records: IndexMap<u64, Record>,
    next_id: u64,
    tagged_count: [u64; TAG_COUNT],
    tagged_size: [u64; TAG_COUNT],
}

impl TrackedHeap {
    /// Creates an empty tracked heap.
    pub fn new() -> Self {
        TrackedHeap {
            records: IndexMap::new(),
            next_id: 0,
            tagged_count: [0; TAG_COUNT],
            tagged_size: [0; TAG_COUNT],
        }
    }

    /// Allocates `bytes` tagged `tag`. Fatal if `bytes` is zero.
    pub fn alloc(&mut self, tag: Tag, bytes: u32) -> HeapHandle {
        let _frame = teleios_trace::frame!("tag={tag:?} bytes={bytes}", tag, bytes);
        if bytes == 0 {
            teleios_log::fatal!("TrackedHeap::alloc requires bytes > 0");
        }

        let id = self.next_id;
        self.next_id += 1;
        self.records.insert(
            id,
            Record {
                tag,
                bytes: vec![0u8; bytes as usize],
            },
        );

        self.tagged_count[tag.index()] += 1;
        self.tagged_size[tag.index()] += u64::from(bytes);

        HeapHandle { id, len: bytes, tag }
    }

    /// Frees `handle`. Fatal if the handle was already freed, or was
    /// never produced by this heap — a double free is a programming
    /// error, not a recoverable condition.
    pub fn free(&mut self, handle: HeapHandle) {
        let _frame = teleios_trace::frame!();
        match self.records.shift_remove(&handle.id) {
            Some(record) => {
                self.tagged_count[record.tag.index()] -= 1;
                self.tagged_size[record.tag.index()] -= u64::from(handle.len);
            }
            None => {
                teleios_log::fatal!("double free or invalid heap handle (id={})", handle.id);
            }
        }
    }

    /// The tracked-heap strategy does not support bulk reset — there is
    /// no shared cursor to rewind, only individually owned
    /// allocations. Calling this is always fatal.
    pub fn reset(&mut self) {
        teleios_log::fatal!("TrackedHeap does not support reset; free allocations individually");
    }

    /// Borrows the bytes a handle refers to. Fatal if the handle is
    /// unknown to this heap.
    pub fn resolve(&self, handle: HeapHandle) -> &[u8] {
        match self.records.get(&handle.id) {
            Some(record) => &record.bytes,
            None => teleios_log::fatal!("unknown heap handle (id={})", handle.id),
        }
    }

    /// Mutably borrows the bytes a handle refers to.
    pub fn resolve_mut(&mut self, handle: HeapHandle) -> &mut [u8] {
        match self.records.get_mut(&handle.id) {
            Some(record) => &mut record.bytes,
            None => teleios_log::fatal!("unknown heap handle (id={})", handle.id),
        }
    }

    /// Count of live allocations tagged `tag`.
    pub fn tagged_count(&self, tag: Tag) -> u64 {
        self.tagged_count[tag.index()]
    }

    /// Bytes currently live under `tag`.
    pub fn tagged_size(&self, tag: Tag) -> u64 {
        self.tagged_size[tag.index()]
    }

    /// Total bytes currently live across all tags.
    pub fn live_bytes(&self) -> u64 {
        self.tagged_size.iter().sum()
    }

    /// Number of allocations still outstanding.
    pub fn live_count(&self) -> usize {
        self.records.len()
    }
}

impl Default for TrackedHeap {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TrackedHeap {
    fn drop(&mut self) {
        for tag in ALL_TAGS {
            let count = self.tagged_count[tag.index()];
            if count > 0 {
                teleios_log::warn!(
                    "TrackedHeap destroyed with {count} leaked allocation(s) under {tag:?} ({} bytes)",
                    self.tagged_size[tag.index()]
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_and_free_round_trip_accounting() {
        let mut heap = TrackedHeap::new();
        let handle = heap.alloc(Tag::Block, 32);
        assert_eq!(heap.live_bytes(), 32);
        assert_eq!(heap.tagged_count(Tag::Block), 1);
        heap.free(handle);
        assert_eq!(heap.live_bytes(), 0);
        assert_eq!(heap.tagged_count(Tag::Block), 0);
    }

    #[test]
    fn resolve_returns_the_written_bytes() {
        let mut heap = TrackedHeap::new();
        let handle = heap.alloc(Tag::String, 5);
        heap.resolve_mut(handle).copy_from_slice(b"hello");
        assert_eq!(heap.resolve(handle), b"hello");
    }

    #[test]
    fn independent_allocations_can_be_freed_in_any_order() {
        let mut heap = TrackedHeap::new();
        let a = heap.alloc(Tag::Block, 8);
        let b = heap.alloc(Tag::Block, 8);
        let c = heap.alloc(Tag::Block, 8);
        heap.free(b);
        assert_eq!(heap.live_count(), 2);
        heap.free(a);
        heap.free(c);
        assert_eq!(heap.live_count(), 0);
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn live_bytes_matches_sum_of_unfree_allocations(sizes in proptest::collection::vec(1u32..=64, 1..20)) {
                let mut heap = TrackedHeap::new();
                let handles: Vec<_> = sizes.iter().map(|&s| heap.alloc(Tag::Block, s)).collect();
                let expected: u64 = sizes.iter().map(|&s| u64::from(s)).sum();
                prop_assert_eq!(heap.live_bytes(), expected);
                for handle in handles {
                    heap.free(handle);
                }
                prop_assert_eq!(heap.live_bytes(), 0);
            }
        }
    }
}
