//! Tagged, multi-strategy allocator for the Teleios foundation runtime.
//!
//! Every allocation is made under one of two strategies and tagged
//! with a subsystem [`Tag`] for leak attribution:
//!
//! - [`Strategy::Linear`] bump-allocates from fixed-size pages and only
//!   reclaims in bulk (`reset`); individual frees are no-ops.
//! - [`Strategy::Heap`] tracks every live allocation individually and
//!   requires an individual free; double frees and unknown handles are
//!   fatal.
//!
//! Both strategies share one entry point, [`AllocatorKind`], so calling
//! code can be written against a single type regardless of which
//! strategy backs a given instance — the split only matters at
//! construction time.
//!
//! Every unrecoverable failure mode (zero-size request, oversized
//! request, page-budget exhaustion, double free, resolving a foreign
//! handle) logs at [`teleios_log::Level::Fatal`] and terminates the
//! process; there is no `Result`-returning fallible path to opt out of
//! this, matching the rest of the foundation's "callers do not branch
//! on failure" contract.

#![deny(missing_docs)]
#![forbid(unsafe_code)]

mod handle;
mod heap;
mod linear;
mod registry;
mod tag;

pub use handle::{AllocHandle, BumpHandle, HeapHandle};
pub use heap::TrackedHeap;
pub use linear::{LinearArena, MAX_PAGES};
pub use registry::Registry;
pub use tag::{Tag, ALL_TAGS, TAG_COUNT};

/// Which allocation strategy an [`AllocatorKind`] was created with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Page-bump arena; bulk reclaim only.
    Linear,
    /// Individually tracked and freed allocations.
    Heap,
}

/// A single allocator instance, backing either a linear arena or a
/// tracked heap.
///
/// This is the type the rest of the workspace is expected to hold:
/// components ask for an [`AllocatorKind`] without caring which
/// strategy backs it.
pub enum AllocatorKind {
    /// Backed by a [`LinearArena`].
    Linear(LinearArena),
    /// Backed by a [`TrackedHeap`].
    Heap(TrackedHeap),
}

impl AllocatorKind {
    /// Creates an allocator under `strategy`.
    ///
    /// `size_hint` is the page size for [`Strategy::Linear`] (must be
    /// greater than zero) and is otherwise ignored for
    /// [`Strategy::Heap`] — a non-zero hint there is logged as an
    /// error and discarded rather than treated as fatal, since it
    /// does not prevent the heap from functioning correctly.
    pub fn create(strategy: Strategy, size_hint: u32) -> Self {
        match strategy {
            Strategy::Linear => AllocatorKind::Linear(LinearArena::new(size_hint)),
            Strategy::Heap => {
                if size_hint != 0 {
                    teleios_log::error!(
                        "Strategy::Heap does not use a size hint; ignoring {size_hint}"
                    );
                }
                AllocatorKind::Heap(TrackedHeap::new())
            }
        }
    }

    /// Allocates `bytes` tagged `tag`. See [`LinearArena::alloc`] and
    /// [`TrackedHeap::alloc`] for the fatal conditions of each
    /// strategy.
    pub fn alloc(&mut self, tag: Tag, bytes: u32) -> AllocHandle {
        match self {
            AllocatorKind::Linear(arena) => AllocHandle::Linear(arena.alloc(tag, bytes)),
            AllocatorKind::Heap(heap) => AllocHandle::Heap(heap.alloc(tag, bytes)),
        }
    }

    /// Frees `handle`. Fatal if `handle` was not produced by this
    /// allocator (a linear handle passed to a heap, or vice versa), or
    /// — for [`Strategy::Heap`] — if it was already freed.
    pub fn free(&mut self, handle: AllocHandle) {
        match (self, handle) {
            (AllocatorKind::Linear(arena), AllocHandle::Linear(h)) => arena.free(h),
            (AllocatorKind::Heap(heap), AllocHandle::Heap(h)) => heap.free(h),
            _ => teleios_log::fatal!("handle does not belong to this allocator's strategy"),
        }
    }

    /// Reclaims memory in bulk. Always succeeds for [`Strategy::Linear`];
    /// always fatal for [`Strategy::Heap`], which has no shared cursor
    /// to rewind.
    pub fn reset(&mut self) {
        match self {
            AllocatorKind::Linear(arena) => arena.reset(),
            AllocatorKind::Heap(heap) => heap.reset(),
        }
    }

    /// Borrows the bytes a handle refers to.
    pub fn resolve(&self, handle: AllocHandle) -> &[u8] {
        match (self, handle) {
            (AllocatorKind::Linear(arena), AllocHandle::Linear(h)) => arena.resolve(h),
            (AllocatorKind::Heap(heap), AllocHandle::Heap(h)) => heap.resolve(h),
            _ => teleios_log::fatal!("handle does not belong to this allocator's strategy"),
        }
    }

    /// Mutably borrows the bytes a handle refers to.
    pub fn resolve_mut(&mut self, handle: AllocHandle) -> &mut [u8] {
        match (self, handle) {
            (AllocatorKind::Linear(arena), AllocHandle::Linear(h)) => arena.resolve_mut(h),
            (AllocatorKind::Heap(heap), AllocHandle::Heap(h)) => heap.resolve_mut(h),
            _ => teleios_log::fatal!("handle does not belong to this allocator's strategy"),
        }
    }

    /// Count of live allocations tagged `tag`.
    pub fn tagged_count(&self, tag: Tag) -> u64 {
        match self {
            AllocatorKind::Linear(arena) => arena.tagged_count(tag),
            AllocatorKind::Heap(heap) => heap.tagged_count(tag),
        }
    }

    /// Bytes currently live under `tag`.
    pub fn tagged_size(&self, tag: Tag) -> u64 {
        match self {
            AllocatorKind::Linear(arena) => arena.tagged_size(tag),
            AllocatorKind::Heap(heap) => heap.tagged_size(tag),
        }
    }

    /// Total bytes currently live across all tags.
    pub fn live_bytes(&self) -> u64 {
        match self {
            AllocatorKind::Linear(arena) => arena.live_bytes(),
            AllocatorKind::Heap(heap) => heap.live_bytes(),
        }
    }

    /// The strategy this allocator was created with.
    pub fn strategy(&self) -> Strategy {
        match self {
            AllocatorKind::Linear(_) => Strategy::Linear,
            AllocatorKind::Heap(_) => Strategy::Heap,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_dispatches_on_strategy() {
        let linear = AllocatorKind::create(Strategy::Linear, 64);
        assert_eq!(linear.strategy(), Strategy::Linear);
        let heap = AllocatorKind::create(Strategy::Heap, 0);
        assert_eq!(heap.strategy(), Strategy::Heap);
    }

    #[test]
    fn alloc_and_resolve_round_trip_through_the_enum() {
        let mut allocator = AllocatorKind::create(Strategy::Heap, 0);
        let handle = allocator.alloc(Tag::String, 3);
        allocator.resolve_mut(handle).copy_from_slice(b"abc");
        assert_eq!(allocator.resolve(handle), b"abc");
        allocator.free(handle);
        assert_eq!(allocator.live_bytes(), 0);
    }

    #[test]
    fn heap_size_hint_is_ignored_not_fatal() {
        // Passing a non-zero size hint to a heap allocator is merely
        // logged as an error, not treated as a programming error.
        let allocator = AllocatorKind::create(Strategy::Heap, 4096);
        assert_eq!(allocator.strategy(), Strategy::Heap);
    }

    #[test]
    fn linear_reset_round_trips_through_the_enum() {
        let mut allocator = AllocatorKind::create(Strategy::Linear, 32);
        allocator.alloc(Tag::Block, 16);
        allocator.reset();
        assert_eq!(allocator.live_bytes(), 0);
    }
}
