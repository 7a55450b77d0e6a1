//! Process-wide allocator registry.
//!
//! Not required by the bootstrap sequence — components are handed an
//! allocator directly — but useful for tooling (a shutdown-time leak
//! report across every allocator the process created) and for tests
//! that want a name-addressable allocator without threading one
//! through every call. Grounded on the same "small registration table
//! behind a mutex" shape the logger and tracer use for their
//! process-wide state.

use std::sync::Mutex;

use indexmap::IndexMap;

use crate::{AllocatorKind, Strategy};

/// A named collection of allocators, addressable by a caller-chosen key.
pub struct Registry {
    allocators: Mutex<IndexMap<String, AllocatorKind>>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Registry {
            allocators: Mutex::new(IndexMap::new()),
        }
    }

    /// Creates an allocator under `strategy` and registers it under
    /// `name`. Fatal if `name` is already registered — registries are
    /// meant to hold one allocator per logical subsystem, and a
    /// silent overwrite would orphan the previous allocator's live
    /// allocations.
    pub fn create(&self, name: &str, strategy: Strategy, size_hint: u32) {
        let mut allocators = self.allocators.lock().unwrap_or_else(|p| p.into_inner());
        if allocators.contains_key(name) {
            teleios_log::fatal!("allocator '{name}' is already registered");
        }
        allocators.insert(name.to_string(), AllocatorKind::create(strategy, size_hint));
    }

    /// Runs `f` with exclusive access to the allocator registered under
    /// `name`. Fatal if no allocator is registered under that name.
    pub fn with<R>(&self, name: &str, f: impl FnOnce(&mut AllocatorKind) -> R) -> R {
        let mut allocators = self.allocators.lock().unwrap_or_else(|p| p.into_inner());
        match allocators.get_mut(name) {
            Some(allocator) => f(allocator),
            None => teleios_log::fatal!("no allocator registered under '{name}'"),
        }
    }

    /// Removes and drops the allocator registered under `name`,
    /// running its own destroy-time leak accounting as it drops.
    /// Fatal if no allocator is registered under that name.
    pub fn destroy(&self, name: &str) {
        let mut allocators = self.allocators.lock().unwrap_or_else(|p| p.into_inner());
        if allocators.shift_remove(name).is_none() {
            teleios_log::fatal!("no allocator registered under '{name}'");
        }
    }

    /// Names currently registered, in registration order.
    pub fn names(&self) -> Vec<String> {
        let allocators = self.allocators.lock().unwrap_or_else(|p| p.into_inner());
        allocators.keys().cloned().collect()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
