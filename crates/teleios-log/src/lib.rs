//! Level-filtered, colorized, line-atomic logger.
//!
//! This is the only writer of process output in the foundation. It is a
//! process-wide singleton: [`set_level`] changes the severity threshold
//! for every subsequent call, and [`log`] serializes writes so two
//! records never interleave their bytes on stdout.

#![deny(missing_docs)]
#![forbid(unsafe_code)]

use std::fmt;
use std::io::Write;
use std::process;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Mutex, OnceLock};

use teleios_clock::datetime_from_epoch_micros;

/// Severity levels, ascending. Messages below the configured threshold
/// are dropped before formatting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Level {
    /// Very detailed diagnostic information.
    Verbose = 0,
    /// Function entry/exit tracing.
    Trace = 1,
    /// General debugging messages.
    Debug = 2,
    /// Informational messages about normal operation.
    Info = 3,
    /// Potentially problematic conditions.
    Warn = 4,
    /// Error conditions that indicate failures.
    Error = 5,
    /// Unrecoverable errors; terminates the process after logging.
    Fatal = 6,
}

impl Level {
    fn from_u8(v: u8) -> Level {
        match v {
            0 => Level::Verbose,
            1 => Level::Trace,
            2 => Level::Debug,
            3 => Level::Info,
            4 => Level::Warn,
            5 => Level::Error,
            _ => Level::Fatal,
        }
    }

    /// The padded 8-byte label printed in each record.
    fn label(self) -> &'static str {
        match self {
            Level::Verbose => "VERBOSE ",
            Level::Trace => "TRACE   ",
            Level::Debug => "DEBUG   ",
            Level::Info => "INFO    ",
            Level::Warn => "WARN    ",
            Level::Error => "ERROR   ",
            Level::Fatal => "FATAL   ",
        }
    }

    /// ANSI SGR parameter sequence used to colorize the record.
    fn sgr(self) -> &'static str {
        match self {
            Level::Verbose => "1;30",
            Level::Trace => "1;22",
            Level::Debug => "1;34",
            Level::Info => "1;32",
            Level::Warn => "1;33",
            Level::Error => "1;31",
            Level::Fatal => "0;41",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label().trim_end())
    }
}

static THRESHOLD: AtomicU8 = AtomicU8::new(Level::Info as u8);
static WRITE_LOCK: Mutex<()> = Mutex::new(());
static FATAL_HOOK: OnceLock<fn()> = OnceLock::new();

/// Sets the global severity threshold. Takes effect for every call made
/// after it returns, from any thread.
pub fn set_level(level: Level) {
    THRESHOLD.store(level as u8, Ordering::Relaxed);
}

/// Reads the current global severity threshold.
pub fn level() -> Level {
    Level::from_u8(THRESHOLD.load(Ordering::Relaxed))
}

/// Registers a callback invoked once, just before a FATAL record
/// terminates the process. `teleios-trace` installs its stack-dump
/// routine here at startup so the logger can stay free of a dependency
/// on the tracer, even though the two are conceptually linked.
///
/// Only the first registration takes effect; later calls are ignored,
/// matching the "process-wide singleton" nature of both components.
pub fn set_fatal_hook(hook: fn()) {
    let _ = FATAL_HOOK.set(hook);
}

const MAX_FILE_WIDTH: usize = 20;
const MAX_TID_WIDTH: usize = 12;

fn basename(file: &str) -> &str {
    file.rsplit(['/', '\\']).next().unwrap_or(file)
}

fn fit(s: &str, width: usize) -> String {
    if s.len() > width {
        s[s.len() - width..].to_string()
    } else {
        format!("{s:<width$}")
    }
}

/// Formats and, if not filtered by the threshold, writes one log record.
///
/// `file`/`line` are expected to come from `file!()`/`line!()` at the
/// call site (see the `teleios_trace` crate's logging macros, which are
/// the intended entry point for the rest of the workspace).
#[doc(hidden)]
pub fn log(level: Level, file: &str, line: u32, args: fmt::Arguments<'_>) {
    if level < self::level() {
        return;
    }

    let micros = teleios_clock::epoch_micros();
    let dt = datetime_from_epoch_micros(micros);
    let micros_of_second = micros % 1_000_000;
    let tid = format!("{:?}", std::thread::current().id());
    let tid = tid.trim_start_matches("ThreadId(").trim_end_matches(')');

    let line_text = format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02},{:06} {} {}:{:04} {} {}",
        dt.year,
        dt.month,
        dt.day,
        dt.hour,
        dt.minute,
        dt.second,
        micros_of_second,
        fit(tid, MAX_TID_WIDTH),
        fit(basename(file), MAX_FILE_WIDTH),
        line,
        level.label(),
        args,
    );

    {
        let _guard = WRITE_LOCK.lock().unwrap_or_else(|p| p.into_inner());
        let mut out = std::io::stdout();
        let _ = writeln!(out, "\x1b[{}m{}\x1b[0m", level.sgr(), line_text);
        let _ = out.flush();
    }

    if level == Level::Fatal {
        if let Some(hook) = FATAL_HOOK.get() {
            hook();
        }
        process::exit(99);
    }
}

/// Logs at [`Level::Verbose`].
#[macro_export]
macro_rules! verbose {
    ($($arg:tt)*) => {
        $crate::log($crate::Level::Verbose, file!(), line!(), format_args!($($arg)*))
    };
}

/// Logs at [`Level::Trace`].
#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => {
        $crate::log($crate::Level::Trace, file!(), line!(), format_args!($($arg)*))
    };
}

/// Logs at [`Level::Debug`].
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::log($crate::Level::Debug, file!(), line!(), format_args!($($arg)*))
    };
}

/// Logs at [`Level::Info`].
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::log($crate::Level::Info, file!(), line!(), format_args!($($arg)*))
    };
}

/// Logs at [`Level::Warn`].
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::log($crate::Level::Warn, file!(), line!(), format_args!($($arg)*))
    };
}

/// Logs at [`Level::Error`].
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::log($crate::Level::Error, file!(), line!(), format_args!($($arg)*))
    };
}

/// Logs at [`Level::Fatal`] and terminates the process with status 99.
/// Never returns.
#[macro_export]
macro_rules! fatal {
    ($($arg:tt)*) => {{
        $crate::log($crate::Level::Fatal, file!(), line!(), format_args!($($arg)*));
        unreachable!("teleios_log::log terminates the process on Level::Fatal");
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_ordering_matches_severity() {
        assert!(Level::Verbose < Level::Trace);
        assert!(Level::Trace < Level::Debug);
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warn);
        assert!(Level::Warn < Level::Error);
        assert!(Level::Error < Level::Fatal);
    }

    #[test]
    fn basename_strips_unix_and_windows_separators() {
        assert_eq!(basename("src/lib.rs"), "lib.rs");
        assert_eq!(basename(r"src\lib.rs"), "lib.rs");
        assert_eq!(basename("lib.rs"), "lib.rs");
    }

    #[test]
    fn fit_pads_short_strings() {
        assert_eq!(fit("abc", 8), "abc     ");
    }

    #[test]
    fn fit_truncates_long_strings_from_the_front() {
        let long = "a_very_long_file_name.rs";
        let fitted = fit(long, 20);
        assert_eq!(fitted.len(), 20);
        assert_eq!(fitted, &long[long.len() - 20..]);
    }

    #[test]
    fn set_level_round_trips() {
        set_level(Level::Warn);
        assert_eq!(level(), Level::Warn);
        set_level(Level::Info);
        assert_eq!(level(), Level::Info);
    }

    #[test]
    fn filtered_message_is_a_no_op() {
        // Below-threshold calls must not panic or touch the fatal hook.
        set_level(Level::Error);
        info!("this should be dropped before formatting");
        set_level(Level::Info);
    }
}
