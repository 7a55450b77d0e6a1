//! Bootstrap wiring for the Teleios foundation runtime.
//!
//! [`run`] is the whole of `main`'s logic, pulled out into a library
//! function so it can be exercised without spawning a process: create
//! the root allocator, attach the logger, load the YAML config named on
//! the command line, re-apply its configured logging level, then hand
//! control to whatever out-of-scope subsystems the caller registers.
//! Everything beyond this crate (rendering, windowing, scripting, the
//! game loop, ...) is an external collaborator the foundation never
//! names directly — [`Subsystem`] is the seam it hands control across.

#![deny(missing_docs)]
#![forbid(unsafe_code)]

use teleios_alloc::{AllocatorKind, Strategy};
use teleios_config::Config;
use teleios_log::Level;

/// An external collaborator the bootstrap sequence initializes and
/// terminates, in registration order, after the foundation is wired
/// up. Everything this crate's specification excludes — rendering,
/// windowing, scripting, the game loop — would be one of these.
pub trait Subsystem {
    /// Name used in bootstrap log records.
    fn name(&self) -> &'static str;
    /// Brings the subsystem up. `false` aborts the remaining bootstrap
    /// sequence and unwinds everything started so far.
    fn initialize(&mut self) -> bool;
    /// Tears the subsystem down. Called even for a subsystem whose own
    /// `initialize` just returned `false`, to release whatever partial
    /// state it acquired before failing.
    fn terminate(&mut self) -> bool;
}

/// Exit code for a clean run.
pub const EXIT_OK: i32 = 0;
/// Exit code for any bootstrap failure (bad arguments, a subsystem that
/// failed to initialize, or a FATAL log record anywhere in the
/// foundation, which terminates the process directly rather than
/// unwinding through this function).
pub const EXIT_FAILURE: i32 = 99;

/// Runs the bootstrap sequence:
///
/// 1. Create the root allocator (a tracked heap).
/// 2. Attach the logger to stdout at INFO.
/// 3. Parse `args[1]` as a YAML config path; the config walk fills the
///    property map.
/// 4. Re-apply `engine.logging.level` to the logger.
/// 5. Hand control to `subsystems`, in order.
/// 6. On any subsystem failure, terminate it, unwind the subsystems
///    started before it in reverse order, and return [`EXIT_FAILURE`].
///    On success, terminate every subsystem in reverse order and
///    return [`EXIT_OK`].
///
/// `args` is the full process argument list (`args[0]` is the program
/// name); exactly one argument beyond it — the config path — is
/// accepted.
pub fn run(args: &[String], subsystems: &mut [Box<dyn Subsystem>]) -> i32 {
    let _frame = teleios_trace::frame!();

    if args.len() != 2 {
        teleios_log::error!("expected exactly one argument (a YAML config path), got {}", args.len() - 1);
        return EXIT_FAILURE;
    }

    let _root_allocator = AllocatorKind::create(Strategy::Heap, 0);
    teleios_log::set_level(Level::Info);

    let config = Config::load(&args[1]);
    let configured_level = config.get_log_level("engine.logging.level");
    teleios_log::set_level(configured_level);

    for (index, subsystem) in subsystems.iter_mut().enumerate() {
        if !subsystem.initialize() {
            teleios_log::error!("subsystem '{}' failed to initialize", subsystem.name());
            if !subsystem.terminate() {
                teleios_log::error!("subsystem '{}' failed to terminate during unwind", subsystem.name());
            }
            unwind_in_reverse(&mut subsystems[..index]);
            return EXIT_FAILURE;
        }
    }

    unwind_in_reverse(subsystems);
    EXIT_OK
}

fn unwind_in_reverse(subsystems: &mut [Box<dyn Subsystem>]) {
    for subsystem in subsystems.iter_mut().rev() {
        if !subsystem.terminate() {
            teleios_log::error!("subsystem '{}' failed to terminate", subsystem.name());
        }
    }
}
