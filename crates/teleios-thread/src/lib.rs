//! Thin thread, mutex, and condition-variable wrappers.
//!
//! These exist so the container layer's thread-safe mode (and anything
//! above it) depends on one small surface rather than reaching into
//! `std::sync`/`std::thread` directly — the same role the original's
//! platform-thread shim played, minus the platform branching, since
//! `std` already abstracts that for us.
//!
//! All three wrappers are non-recursive and panic-transparent: a
//! poisoned lock (the thread that held it panicked while holding it)
//! is treated as fatal here rather than silently recovered, since a
//! poisoned foundation mutex means some other part of the process is
//! already in an inconsistent state.

#![deny(missing_docs)]
#![forbid(unsafe_code)]

use std::sync::{Condvar, Mutex as StdMutex, MutexGuard as StdMutexGuard};
use std::thread::JoinHandle as StdJoinHandle;
use std::time::Duration;
use std::sync::atomic::{AtomicU64, Ordering};

// ── Thread ───────────────────────────────────────────────────────

static NEXT_THREAD_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static THREAD_ID: u64 = NEXT_THREAD_ID.fetch_add(1, Ordering::Relaxed);
}

/// A joinable thread handle.
pub struct JoinHandle<T> {
    inner: StdJoinHandle<T>,
}

impl<T> JoinHandle<T> {
    /// Blocks until the thread finishes, returning its result. Fatal
    /// if the thread panicked — the original's `join` has no error
    /// path for a crashed worker either.
    pub fn join(self) -> T {
        self.inner
            .join()
            .unwrap_or_else(|_| teleios_log::fatal!("joined thread panicked"))
    }

    /// Detaches the handle: the thread keeps running independently and
    /// its result, if any, is discarded on completion.
    pub fn detach(self) {
        drop(self.inner);
    }
}

/// Namespace for the free thread operations (spawn/sleep/current_id).
pub struct Thread;

impl Thread {
    /// Spawns `f` on a new OS thread.
    pub fn spawn<F, T>(f: F) -> JoinHandle<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        JoinHandle {
            inner: std::thread::spawn(f),
        }
    }

    /// A process-unique id for the calling thread, stable for its
    /// lifetime, assigned lazily on first use.
    pub fn current_id() -> u64 {
        THREAD_ID.with(|id| *id)
    }

    /// Sleeps the calling thread for `ms` milliseconds.
    pub fn sleep(ms: u64) {
        std::thread::sleep(Duration::from_millis(ms));
    }
}

// ── Mutex ────────────────────────────────────────────────────────

/// A non-recursive mutex guarding a `T`.
pub struct Mutex<T> {
    inner: StdMutex<T>,
}

/// RAII guard for a locked [`Mutex`]; the lock releases when this
/// drops.
pub struct MutexGuard<'a, T> {
    inner: StdMutexGuard<'a, T>,
}

impl<T> std::ops::Deref for MutexGuard<'_, T> {
    type Target = T;
    fn deref(&self) -> &T {
        &self.inner
    }
}

impl<T> std::ops::DerefMut for MutexGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.inner
    }
}

impl<T> Mutex<T> {
    /// Creates a mutex guarding `value`.
    pub fn create(value: T) -> Self {
        Mutex {
            inner: StdMutex::new(value),
        }
    }

    /// Blocks until the lock is acquired. Fatal if the mutex is
    /// poisoned.
    pub fn lock(&self) -> MutexGuard<'_, T> {
        match self.inner.lock() {
            Ok(guard) => MutexGuard { inner: guard },
            Err(_) => teleios_log::fatal!("mutex is poisoned"),
        }
    }

    /// Attempts to acquire the lock without blocking. Returns `None`
    /// if it is already held elsewhere. Fatal if the mutex is
    /// poisoned.
    pub fn try_lock(&self) -> Option<MutexGuard<'_, T>> {
        match self.inner.try_lock() {
            Ok(guard) => Some(MutexGuard { inner: guard }),
            Err(std::sync::TryLockError::WouldBlock) => None,
            Err(std::sync::TryLockError::Poisoned(_)) => {
                teleios_log::fatal!("mutex is poisoned")
            }
        }
    }
}

// ── Condition ────────────────────────────────────────────────────

/// A condition variable meant to be paired with a [`Mutex`] guarding
/// the same predicate.
pub struct Condition {
    inner: Condvar,
}

impl Condition {
    /// Creates an unsignaled condition variable.
    pub fn create() -> Self {
        Condition {
            inner: Condvar::new(),
        }
    }

    /// Waits for a signal, releasing `guard` for the duration and
    /// reacquiring it before returning.
    pub fn wait<'a, T>(&self, guard: MutexGuard<'a, T>) -> MutexGuard<'a, T> {
        match self.inner.wait(guard.inner) {
            Ok(inner) => MutexGuard { inner },
            Err(_) => teleios_log::fatal!("mutex is poisoned"),
        }
    }

    /// Waits for a signal or `ms` milliseconds, whichever comes first.
    /// Returns the reacquired guard and whether a signal was observed
    /// (`false` means the wait timed out).
    pub fn wait_timeout<'a, T>(&self, guard: MutexGuard<'a, T>, ms: u64) -> (MutexGuard<'a, T>, bool) {
        match self.inner.wait_timeout(guard.inner, Duration::from_millis(ms)) {
            Ok((inner, result)) => (MutexGuard { inner }, !result.timed_out()),
            Err(_) => teleios_log::fatal!("mutex is poisoned"),
        }
    }

    /// Wakes one thread waiting on this condition.
    pub fn signal(&self) {
        self.inner.notify_one();
    }

    /// Wakes every thread waiting on this condition.
    pub fn broadcast(&self) {
        self.inner.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn spawn_and_join_returns_the_result() {
        let handle = Thread::spawn(|| 2 + 2);
        assert_eq!(handle.join(), 4);
    }

    #[test]
    fn current_id_is_stable_within_a_thread() {
        let a = Thread::current_id();
        let b = Thread::current_id();
        assert_eq!(a, b);
    }

    #[test]
    fn current_id_differs_across_threads() {
        let main_id = Thread::current_id();
        let other_id = Thread::spawn(Thread::current_id).join();
        assert_ne!(main_id, other_id);
    }

    #[test]
    fn mutex_excludes_concurrent_access() {
        let mutex = Arc::new(Mutex::create(0u64));
        let mut handles = Vec::new();
        for _ in 0..8 {
            let mutex = Arc::clone(&mutex);
            handles.push(Thread::spawn(move || {
                for _ in 0..1000 {
                    *mutex.lock() += 1;
                }
            }));
        }
        for handle in handles {
            handle.join();
        }
        assert_eq!(*mutex.lock(), 8000);
    }

    #[test]
    fn condition_signal_wakes_a_waiter() {
        let mutex = Arc::new(Mutex::create(false));
        let condition = Arc::new(Condition::create());

        let waiter_mutex = Arc::clone(&mutex);
        let waiter_condition = Arc::clone(&condition);
        let waiter = Thread::spawn(move || {
            let mut guard = waiter_mutex.lock();
            while !*guard {
                guard = waiter_condition.wait(guard);
            }
        });

        Thread::sleep(10);
        *mutex.lock() = true;
        condition.signal();
        waiter.join();
    }

    #[test]
    fn wait_timeout_reports_timeout_when_never_signaled() {
        let mutex = Mutex::create(false);
        let condition = Condition::create();
        let guard = mutex.lock();
        let (_guard, signaled) = condition.wait_timeout(guard, 10);
        assert!(!signaled);
    }
}
