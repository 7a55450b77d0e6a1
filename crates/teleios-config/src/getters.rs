//! Typed accessors over the flat dotted-path property map.
//!
//! An absent numeric key resolves to zero (matching the original's
//! "delegate to the string parser on an empty value" fallback); a
//! present-but-malformed numeric value is fatal, same as every other
//! parse boundary in the foundation — except [`Config::get_simulation_step`],
//! whose underlying `strtol`-style parse never fails (see its own doc
//! comment).

use teleios_containers::Map;
use teleios_log::Level;

/// Supported display resolutions. `Qhd` is part of the original's
/// defined enum (`defines.h`) but is not one of the names the original
/// `tl_config_get_display_resolution` match table recognizes — that
/// omission is reproduced here rather than "fixed", since fixing it
/// would make this getter accept a config value the original silently
/// falls back to `Sd` for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayResolution {
    Sd,
    Hd,
    Fhd,
    Qhd,
    Uhd,
}

fn ends_with_suffix_match<'a, T: Copy>(table: &'a [(&'static str, T)], needle: &str, default: T) -> T {
    table
        .iter()
        .find(|(name, _)| name.ends_with(needle))
        .map(|(_, value)| *value)
        .unwrap_or(default)
}

/// Holds the flattened configuration produced by [`crate::walker::walk`]
/// and the typed getters over it.
pub struct Config {
    pub(crate) properties: Map<String>,
}

impl Config {
    fn first(&self, path: &str) -> Option<&str> {
        self.properties.get(path).and_then(|list| list.front().map(String::as_str))
    }

    /// The first value stored for `path`, or `None` if absent.
    pub fn get(&self, path: &str) -> Option<&str> {
        let _frame = teleios_trace::frame!("path={path}", path);
        self.first(path)
    }

    /// Every value stored for `path` (repeated keys), empty if absent.
    pub fn list(&self, path: &str) -> Vec<String> {
        let _frame = teleios_trace::frame!("path={path}", path);
        self.properties.get(path).map(|list| list.snapshot()).unwrap_or_default()
    }

    /// `true` iff the value at `path`, upper-cased, equals `"TRUE"`.
    pub fn get_bool(&self, path: &str) -> bool {
        self.first(path).map(|v| v.to_uppercase() == "TRUE").unwrap_or(false)
    }

    /// Parses `path`'s value as `f32`. Absent key returns 0. Fatal if
    /// present but unparseable.
    pub fn get_f32(&self, path: &str) -> f32 {
        self.first(path).map(teleios_string::to_f32).unwrap_or(0.0)
    }

    /// Parses `path`'s value as `f64`. Absent key returns 0. Fatal if
    /// present but unparseable.
    pub fn get_f64(&self, path: &str) -> f64 {
        self.first(path).map(teleios_string::to_f64).unwrap_or(0.0)
    }

    /// Reads `path` as the simulation's integer step rate in Hz and
    /// returns the per-tick duration `1 / N` seconds. Tolerant of
    /// trailing characters (`"30fps"` reads as `30`), matching the
    /// original's unchecked `strtol` parse; an absent key, a value with
    /// no leading digits, or a parsed rate of `0` all fall back to the
    /// default of 24 Hz with a WARN record. The parsed rate is narrowed
    /// to `u8` by truncation before the zero check, mirroring the
    /// original's `u8 step = strtol(...)` assignment.
    pub fn get_simulation_step(&self, path: &str) -> f64 {
        let raw = self.first(path).map(teleios_string::leading_i64).unwrap_or(0);
        let step = raw as u8;
        let step = if step == 0 {
            teleios_log::warn!("failed to read '{path}', assuming 24");
            24
        } else {
            step
        };
        1.0 / f64::from(step)
    }

    /// Matches `path`'s value (upper-cased) against the suffix of a
    /// fully-qualified log-level constant name. Unknown or absent values
    /// default to [`Level::Info`].
    pub fn get_log_level(&self, path: &str) -> Level {
        const TABLE: &[(&str, Level)] = &[
            ("TL_LOG_LEVEL_VERBOSE", Level::Verbose),
            ("TL_LOG_LEVEL_TRACE", Level::Trace),
            ("TL_LOG_LEVEL_DEBUG", Level::Debug),
            ("TL_LOG_LEVEL_INFO", Level::Info),
            ("TL_LOG_LEVEL_WARN", Level::Warn),
            ("TL_LOG_LEVEL_ERROR", Level::Error),
            ("TL_LOG_LEVEL_FATAL", Level::Fatal),
        ];
        let upper = self.first(path).unwrap_or("").to_uppercase();
        ends_with_suffix_match(TABLE, &upper, Level::Info)
    }

    /// Matches `path`'s value (upper-cased) against the suffix of a
    /// fully-qualified display-resolution constant name. Unknown or
    /// absent values default to [`DisplayResolution::Sd`].
    pub fn get_display_resolution(&self, path: &str) -> DisplayResolution {
        const TABLE: &[(&str, DisplayResolution)] = &[
            ("TL_DISPLAY_RESOLUTION_SD", DisplayResolution::Sd),
            ("TL_DISPLAY_RESOLUTION_HD", DisplayResolution::Hd),
            ("TL_DISPLAY_RESOLUTION_FHD", DisplayResolution::Fhd),
            ("TL_DISPLAY_RESOLUTION_UHD", DisplayResolution::Uhd),
        ];
        let upper = self.first(path).unwrap_or("").to_uppercase();
        ends_with_suffix_match(TABLE, &upper, DisplayResolution::Sd)
    }
}

macro_rules! signed_getter {
    ($name:ident, $ty:ty, $parse:path) => {
        impl Config {
            #[doc = concat!("Parses `path` as `", stringify!($ty), "`; absent key returns 0.")]
            pub fn $name(&self, path: &str) -> $ty {
                self.first(path).map($parse).unwrap_or(0)
            }
        }
    };
}

signed_getter!(get_i8, i8, teleios_string::to_i8);
signed_getter!(get_i16, i16, teleios_string::to_i16);
signed_getter!(get_i32, i32, teleios_string::to_i32);
signed_getter!(get_i64, i64, teleios_string::to_i64);
signed_getter!(get_u8, u8, teleios_string::to_u8);
signed_getter!(get_u16, u16, teleios_string::to_u16);
signed_getter!(get_u32, u32, teleios_string::to_u32);
signed_getter!(get_u64, u64, teleios_string::to_u64);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::walker::walk;

    fn config_for(text: &str) -> Config {
        Config { properties: walk(text) }
    }

    #[test]
    fn bool_matches_case_insensitively() {
        let config = config_for("flag: true\nother: yes\n");
        assert!(config.get_bool("flag"));
        assert!(!config.get_bool("other"));
        assert!(!config.get_bool("missing"));
    }

    #[test]
    fn integer_getters_default_to_zero_when_absent() {
        let config = config_for("count: 7\n");
        assert_eq!(config.get_i32("count"), 7);
        assert_eq!(config.get_u64("missing"), 0);
    }

    #[test]
    fn log_level_matches_by_suffix_of_the_qualified_name() {
        let config = config_for("level: info\nbad: nonsense\n");
        assert_eq!(config.get_log_level("level"), Level::Info);
        assert_eq!(config.get_log_level("bad"), Level::Info);
        assert_eq!(config.get_log_level("missing"), Level::Info);
    }

    #[test]
    fn display_resolution_matches_by_suffix_and_omits_qhd() {
        let config = config_for("res: fhd\nqhd_value: qhd\n");
        assert_eq!(config.get_display_resolution("res"), DisplayResolution::Fhd);
        assert_eq!(config.get_display_resolution("qhd_value"), DisplayResolution::Sd);
    }

    #[test]
    fn list_returns_every_value_for_repeated_sequence_indices() {
        let config = config_for("tags:\n  - a\n  - b\n");
        assert_eq!(config.list("tags.0"), vec!["a".to_string()]);
        assert_eq!(config.list("tags.1"), vec!["b".to_string()]);
    }

    #[test]
    fn simulation_step_tolerates_trailing_characters() {
        let config = config_for("engine:\n  simulation:\n    step: 30fps\n");
        assert_eq!(config.get_simulation_step("engine.simulation.step"), 1.0 / 30.0);
    }

    #[test]
    fn simulation_step_defaults_to_24_hz_when_absent_or_zero() {
        let absent = config_for("other: 1\n");
        assert_eq!(absent.get_simulation_step("engine.simulation.step"), 1.0 / 24.0);

        let zero = config_for("engine:\n  simulation:\n    step: 0\n");
        assert_eq!(zero.get_simulation_step("engine.simulation.step"), 1.0 / 24.0);

        let junk = config_for("engine:\n  simulation:\n    step: fps\n");
        assert_eq!(junk.get_simulation_step("engine.simulation.step"), 1.0 / 24.0);
    }
}
