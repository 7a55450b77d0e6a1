//! Opaque allocation handles.
//!
//! Callers never see raw pointers or offsets; they hold a handle and
//! resolve it through the allocator that produced it. This mirrors the
//! descriptor/handle split the foundation's container layer uses for
//! its own records, generalized here to the two allocation strategies.

use crate::tag::Tag;

/// A handle into a [`crate::LinearArena`]'s page storage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BumpHandle {
    pub(crate) page: u16,
    pub(crate) offset: u32,
    pub(crate) len: u32,
    pub(crate) tag: Tag,
}

/// A handle into a [`crate::TrackedHeap`]'s live-allocation table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeapHandle {
    pub(crate) id: u64,
    pub(crate) len: u32,
    pub(crate) tag: Tag,
}

/// A handle produced by either allocation strategy.
///
/// Resolving a handle against the allocator that did not produce it is
/// a programming error and is fatal, the same as a double free.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AllocHandle {
    /// Produced by a [`crate::LinearArena`].
    Linear(BumpHandle),
    /// Produced by a [`crate::TrackedHeap`].
    Heap(HeapHandle),
}

impl AllocHandle {
    /// The tag the allocation was made under.
    pub fn tag(self) -> Tag {
        match self {
            AllocHandle::Linear(h) => h.tag,
            AllocHandle::Heap(h) => h.tag,
        }
    }

    /// The allocation's size in bytes.
    pub fn len(self) -> u32 {
        match self {
            AllocHandle::Linear(h) => h.len,
            AllocHandle::Heap(h) => h.len,
        }
    }

    /// Whether the allocation is zero-sized. Never true in practice —
    /// both strategies reject zero-size requests as fatal — but kept
    /// for the usual `len`/`is_empty` pairing.
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }
}
