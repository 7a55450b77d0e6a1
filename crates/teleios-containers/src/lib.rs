//! Array, queue, list, object pool, multi-value map, and snapshot
//! iterator for the Teleios foundation runtime.
//!
//! Every container here is a plain single-owner type — `&mut self`
//! methods, no interior synchronization — except [`Queue`], whose
//! blocking `push` needs a condition variable regardless of mode. Wrap
//! any other container in [`Locked`] to get thread-safe mode: same
//! operations, one mutex around them. See [`locked`] for why this is a
//! wrapper rather than a per-container branch.
//!
//! A `NULL`-container query in the original logged an error and
//! returned the empty/false/zero result; in Rust, "no container" is
//! not representable once you hold a `&Container`, so that branch has
//! no Rust equivalent — the policy survives only in the bounds-checked
//! `Option`/`bool` returns of individual queries (`get`, `pop`, ...).

#![deny(missing_docs)]
#![forbid(unsafe_code)]

mod array;
mod iter;
mod list;
mod locked;
mod map;
mod pool;
mod queue;

pub use array::Array;
pub use iter::Iter;
pub use list::{List, NodeId};
pub use locked::Locked;
pub use map::Map;
pub use pool::{Pool, PoolHandle};
pub use queue::Queue;
