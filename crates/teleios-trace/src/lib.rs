//! Process-wide stack-frame tracer and per-function profiler.
//!
//! Every foundation call wraps itself with [`frame!`], which pushes a
//! [`FramePush`] scope guard recording the call site and a formatted
//! argument snapshot; the guard's `Drop` pops the frame (and closes the
//! matching profiler measurement) on every exit path, including early
//! returns and unwinding — a scope guard standing in for the original's
//! manual push/pop macro pair.
//!
//! State is thread-local: the tracer and profiler assume single-threaded
//! use per thread, consistent with the rest of the foundation (each
//! thread traces its own call stack).

#![deny(missing_docs)]
#![forbid(unsafe_code)]

use std::cell::RefCell;
use std::sync::Once;

use teleios_clock::epoch_micros;

/// Maximum tracer stack depth. Exceeding this is a programming error
/// (fatal), matching the allocator's fixed page budget in spirit.
pub const MAX_FRAME_DEPTH: usize = 10;

/// Maximum number of distinct function names the profiler can track
/// concurrently (per thread).
pub const MAX_PROFILE_SLOTS: usize = 255;

/// Maximum length, in bytes, of a captured formatted-argument snapshot.
/// Longer snapshots are truncated with a trailing `…` marker.
pub const MAX_ARGS_LEN: usize = 1024;

/// One entry on the tracer's stack.
#[derive(Clone, Debug)]
pub struct Frame {
    /// Trailing basename of the source file that pushed this frame.
    pub file: &'static str,
    /// Source line of the push site.
    pub line: u32,
    /// Name of the function that pushed this frame.
    pub function: &'static str,
    /// Formatted argument snapshot captured at push time, if any.
    pub arguments: Option<String>,
    /// Microsecond timestamp captured at push time.
    pub timestamp_micros: u64,
}

struct ProfileSlot {
    name: &'static str,
    start_micros: u64,
    ticks: u64,
}

thread_local! {
    static STACK: RefCell<Vec<Frame>> = RefCell::new(Vec::with_capacity(MAX_FRAME_DEPTH));
    static PROFILE: RefCell<Vec<Option<ProfileSlot>>> = RefCell::new(
        (0..MAX_PROFILE_SLOTS).map(|_| None).collect()
    );
}

static INSTALL_FATAL_HOOK: Once = Once::new();

fn ensure_fatal_hook_installed() {
    INSTALL_FATAL_HOOK.call_once(|| {
        teleios_log::set_fatal_hook(dump_stack_on_fatal);
    });
}

/// Prints the current thread's tracer stack top-down (most recent frame
/// first), in the `at <file>:<line> <fn>(<args>)` format. Invoked by
/// `teleios-log` immediately before a FATAL record terminates the
/// process.
fn dump_stack_on_fatal() {
    STACK.with(|stack| {
        for frame in stack.borrow().iter().rev() {
            println!(
                "  at {}:{} {}({})",
                frame.file,
                frame.line,
                frame.function,
                frame.arguments.as_deref().unwrap_or("")
            );
        }
    });
}

fn truncate_args(args: String) -> String {
    if args.len() <= MAX_ARGS_LEN {
        args
    } else {
        let mut truncated = args;
        let mut cut = MAX_ARGS_LEN - '…'.len_utf8();
        while !truncated.is_char_boundary(cut) {
            cut -= 1;
        }
        truncated.truncate(cut);
        truncated.push('…');
        truncated
    }
}

/// Pushes a new tracer frame and opens (or re-opens) the profiler
/// measurement for `function`. Internal: call through [`frame!`].
#[doc(hidden)]
pub fn push_frame(function: &'static str, file: &'static str, line: u32, arguments: Option<String>) {
    ensure_fatal_hook_installed();

    STACK.with(|stack| {
        let mut stack = stack.borrow_mut();
        if stack.len() >= MAX_FRAME_DEPTH {
            drop(stack);
            teleios_log::fatal!("tracer stack depth exceeded max of {MAX_FRAME_DEPTH}");
        }
        stack.push(Frame {
            file,
            line,
            function,
            arguments: arguments.map(truncate_args),
            timestamp_micros: epoch_micros(),
        });
    });

    profiler_begin(function);
}

/// Pops the most recently pushed tracer frame and closes the matching
/// profiler measurement. Internal: called by [`FramePush`]'s `Drop`.
#[doc(hidden)]
pub fn pop_frame() {
    let popped = STACK.with(|stack| stack.borrow_mut().pop());
    match popped {
        Some(frame) => profiler_end(frame.function),
        None => teleios_log::error!("tracer pop with an empty stack"),
    }
}

/// RAII guard returned by [`frame!`]. Pushes on construction, pops on
/// drop — early returns, `?`, and panics all still pop correctly.
///
/// Bind it to a named local (`let _frame = frame!();`) so its `tick`,
/// `ticks`, and `elapsed` methods can reach the profiler measurement
/// this guard opened, without callers having to re-derive the
/// function's identity via a second [`function_name!`] call (which,
/// being a distinct macro expansion site, is not guaranteed to collapse
/// to the same interned string as the one the guard captured).
#[must_use = "a FramePush must be held for the duration of the traced scope"]
pub struct FramePush {
    function: &'static str,
}

impl FramePush {
    /// Pushes a frame for `function` at `file:line` with an optional
    /// pre-formatted argument snapshot.
    pub fn new(function: &'static str, file: &'static str, line: u32, arguments: Option<String>) -> Self {
        push_frame(function, file, line, arguments);
        FramePush { function }
    }

    /// Increments this frame's profiler tick counter.
    pub fn tick(&self) {
        tick(self.function);
    }

    /// Reads this frame's profiler tick counter.
    pub fn ticks(&self) -> u64 {
        ticks(self.function)
    }

    /// Microseconds elapsed since this frame's measurement began,
    /// without closing it.
    pub fn elapsed(&self) -> u64 {
        elapsed(self.function)
    }
}

impl Drop for FramePush {
    fn drop(&mut self) {
        pop_frame();
    }
}

/// Returns the name of the function it is invoked in, for use as the
/// profiler/tracer identity. Relies on the standard
/// `std::any::type_name` monomorphization trick rather than an
/// unstable `#[track_caller]`-adjacent intrinsic.
#[macro_export]
macro_rules! function_name {
    () => {{
        fn __teleios_marker() {}
        fn __teleios_type_name_of<T>(_: T) -> &'static str {
            std::any::type_name::<T>()
        }
        let name = __teleios_type_name_of(__teleios_marker);
        &name[..name.len() - "::__teleios_marker".len()]
    }};
}

/// Builds a [`FramePush`] guard for the current call site. Bind the
/// result (`let _frame = frame!();`) so the guard pops at the end of
/// the enclosing scope. Use `frame!()` for no arguments, or
/// `frame!("fmt", a, b)` to capture a formatted argument snapshot
/// (bounded to [`MAX_ARGS_LEN`] bytes).
#[macro_export]
macro_rules! frame {
    () => {
        $crate::FramePush::new($crate::function_name!(), file!(), line!(), None)
    };
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::FramePush::new(
            $crate::function_name!(),
            file!(),
            line!(),
            Some(format!($fmt $(, $arg)*)),
        )
    };
}

fn profiler_begin(name: &'static str) {
    PROFILE.with(|profile| {
        let mut profile = profile.borrow_mut();
        if let Some(slot) = profile.iter_mut().flatten().find(|s| s.name == name) {
            // Re-entrant push under the same name: restart the clock.
            slot.start_micros = epoch_micros();
            return;
        }
        match profile.iter_mut().find(|s| s.is_none()) {
            Some(free) => {
                *free = Some(ProfileSlot {
                    name,
                    start_micros: epoch_micros(),
                    ticks: 0,
                });
            }
            None => {
                drop(profile);
                teleios_log::fatal!("profiler table exhausted ({MAX_PROFILE_SLOTS} slots)");
            }
        }
    });
}

fn profiler_end(name: &'static str) {
    PROFILE.with(|profile| {
        let mut profile = profile.borrow_mut();
        match profile.iter_mut().find(|s| matches!(s, Some(slot) if slot.name == name)) {
            Some(slot) => *slot = None,
            None => {
                drop(profile);
                teleios_log::fatal!("profile [{name}] not found");
            }
        }
    });
}

/// Elapsed microseconds since the open measurement for `name` began,
/// without closing it. Fatal if `name` has no open measurement.
pub fn elapsed(name: &'static str) -> u64 {
    PROFILE.with(|profile| {
        let profile = profile.borrow();
        match profile.iter().flatten().find(|s| s.name == name) {
            Some(slot) => epoch_micros() - slot.start_micros,
            None => {
                drop(profile);
                teleios_log::fatal!("profile [{name}] not found");
            }
        }
    })
}

/// Increments the tick counter for `name`'s open measurement.
pub fn tick(name: &'static str) {
    PROFILE.with(|profile| {
        let mut profile = profile.borrow_mut();
        match profile.iter_mut().flatten().find(|s| s.name == name) {
            Some(slot) => slot.ticks += 1,
            None => {
                drop(profile);
                teleios_log::fatal!("profile [{name}] not found");
            }
        }
    });
}

/// Reads the tick counter for `name`'s open measurement.
pub fn ticks(name: &'static str) -> u64 {
    PROFILE.with(|profile| {
        let profile = profile.borrow();
        match profile.iter().flatten().find(|s| s.name == name) {
            Some(slot) => slot.ticks,
            None => {
                drop(profile);
                teleios_log::fatal!("profile [{name}] not found");
            }
        }
    })
}

/// Current depth of the calling thread's tracer stack.
pub fn depth() -> usize {
    STACK.with(|stack| stack.borrow().len())
}

/// Snapshot of the calling thread's tracer stack, most recent last
/// (insertion order), for testing and diagnostics.
pub fn snapshot() -> Vec<Frame> {
    STACK.with(|stack| stack.borrow().clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn traced_leaf() -> u32 {
        let _frame = frame!("leaf()");
        assert_eq!(depth(), 1);
        42
    }

    #[test]
    fn frame_pushes_and_pops_across_return() {
        assert_eq!(depth(), 0);
        let v = traced_leaf();
        assert_eq!(v, 42);
        assert_eq!(depth(), 0);
    }

    #[test]
    fn nested_frames_stack_and_unwind_in_order() {
        fn inner() {
            let _frame = frame!();
            assert_eq!(depth(), 2);
        }
        fn outer() {
            let _frame = frame!();
            assert_eq!(depth(), 1);
            inner();
            assert_eq!(depth(), 1);
        }
        outer();
        assert_eq!(depth(), 0);
    }

    #[test]
    fn snapshot_captures_formatted_arguments() {
        fn traced(x: i32) {
            let _frame = frame!("x={x}", x);
            let snap = snapshot();
            assert_eq!(snap.last().unwrap().arguments.as_deref(), Some("x=7"));
        }
        traced(7);
    }

    #[test]
    fn profiler_tick_and_elapsed_round_trip() {
        fn traced() {
            let frame = frame!();
            frame.tick();
            frame.tick();
            assert_eq!(frame.ticks(), 2);
            let _ = frame.elapsed();
        }
        traced();
    }

    #[test]
    fn long_argument_snapshot_is_truncated() {
        fn traced() {
            let long = "x".repeat(MAX_ARGS_LEN * 2);
            let _frame = frame!("{long}", long);
            let snap = snapshot();
            let captured = snap.last().unwrap().arguments.as_ref().unwrap();
            assert_eq!(captured.len(), MAX_ARGS_LEN);
            assert!(captured.ends_with('…'));
        }
        traced();
    }

    #[test]
    fn function_name_strips_trailing_marker() {
        fn named_fn() -> &'static str {
            function_name!()
        }
        assert!(named_fn().ends_with("named_fn"));
    }
}
