//! Thread-safe wrapper shared by every container.
//!
//! Thread-safe mode means the internal mutex is acquired when on,
//! absent when off, rather than a property of any one container.
//! Rather than duplicate every container's method bodies behind an
//! `if thread_safe` branch, each container is written
//! once as a plain single-owner type (`&mut self` methods, no interior
//! synchronization) and [`Locked`] adds the mutex around it. A bare
//! container is the single-threaded mode; a `Locked<Container>` is the
//! thread-safe mode — same operations, same `mod_count` bookkeeping,
//! one extra indirection.

use teleios_thread::Mutex;

/// A container made thread-safe by wrapping it in a mutex.
pub struct Locked<C> {
    inner: Mutex<C>,
}

impl<C> Locked<C> {
    /// Wraps `container` for thread-safe access.
    pub fn new(container: C) -> Self {
        Locked {
            inner: Mutex::create(container),
        }
    }

    /// Runs `f` with exclusive access to the wrapped container.
    pub fn with<R>(&self, f: impl FnOnce(&mut C) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Array;

    #[test]
    fn locked_serializes_access() {
        let locked = Locked::new(Array::<u32>::create());
        locked.with(|a| a.push(1));
        locked.with(|a| a.push(2));
        assert_eq!(locked.with(|a| a.len()), 2);
    }
}
