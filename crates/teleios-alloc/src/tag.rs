//! Closed enumeration of allocation tags.
//!
//! The tag set is fixed at build time (adding a tag means recompiling).
//! It reproduces the original engine's full `TLMemoryTag` enumeration,
//! including tags only an out-of-scope collaborator (graphics, scene,
//! window, ECS, ULID) would ever allocate under — the enumeration is
//! closed over the domain it claims to model, not just the subset this
//! crate uses itself.

/// A subsystem tag attached to every allocation, used for leak
/// attribution and per-tag accounting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Tag {
    /// Generic/untagged memory blocks.
    Block = 0,
    /// Graphics subsystem (textures, shaders, etc). Out-of-scope collaborator.
    Graphics,
    /// Serialization buffers (YAML/JSON parsing).
    Serializer,
    /// Dynamic array container allocations.
    ContainerArray,
    /// Queue container allocations.
    ContainerQueue,
    /// Object pool allocations.
    ContainerPool,
    /// Stack container allocations.
    ContainerStack,
    /// Linked list allocations.
    ContainerList,
    /// Container node structures.
    ContainerNode,
    /// Hash map allocations.
    ContainerMap,
    /// Hash map entry allocations.
    ContainerMapEntry,
    /// Iterator snapshot allocations.
    ContainerIterator,
    /// String allocations.
    String,
    /// ULID identifier allocations. Out-of-scope collaborator.
    Ulid,
    /// Profiler state and buffers.
    Profiler,
    /// Scene and game object data. Out-of-scope collaborator.
    Scene,
    /// ECS component allocations. Out-of-scope collaborator.
    EcsComponent,
    /// Thread-related allocations.
    Thread,
    /// Window subsystem allocations. Out-of-scope collaborator.
    Window,
}

/// Number of distinct tags in the closed enumeration.
pub const TAG_COUNT: usize = 19;

/// Every tag, in declaration order — used to build per-tag tables.
pub const ALL_TAGS: [Tag; TAG_COUNT] = [
    Tag::Block,
    Tag::Graphics,
    Tag::Serializer,
    Tag::ContainerArray,
    Tag::ContainerQueue,
    Tag::ContainerPool,
    Tag::ContainerStack,
    Tag::ContainerList,
    Tag::ContainerNode,
    Tag::ContainerMap,
    Tag::ContainerMapEntry,
    Tag::ContainerIterator,
    Tag::String,
    Tag::Ulid,
    Tag::Profiler,
    Tag::Scene,
    Tag::EcsComponent,
    Tag::Thread,
    Tag::Window,
];

impl Tag {
    /// Index of this tag into a `[T; TAG_COUNT]` table.
    pub fn index(self) -> usize {
        self as usize
    }
}
