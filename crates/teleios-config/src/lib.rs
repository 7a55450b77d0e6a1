//! Hierarchical YAML configuration loader for the Teleios foundation
//! runtime.
//!
//! [`Config::load`] reads a YAML file into a flat `dotted.path → string`
//! property map (see [`walker`]) and exposes it through the typed
//! getters in [`getters`]. A configuration file must exist at the given
//! path; failure to open it is fatal, matching the rest of the
//! foundation's "cannot continue" policy for its own preconditions.

#![deny(missing_docs)]
#![forbid(unsafe_code)]

mod getters;
mod walker;

pub use getters::{Config, DisplayResolution};

impl Config {
    /// Reads and flattens the YAML document at `path`. Fatal if the
    /// file cannot be opened or the document is malformed.
    pub fn load(path: &str) -> Config {
        let _frame = teleios_trace::frame!("path={path}", path);
        let text = std::fs::read_to_string(path)
            .unwrap_or_else(|e| teleios_log::fatal!("failed to open config file '{path}': {e}"));
        Config { properties: walker::walk(&text) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn load_reads_and_flattens_a_real_file() {
        let mut file = tempfile_with("engine:\n  window:\n    title: Teleios\n");
        let config = Config::load(file.path_str());
        assert_eq!(config.get("engine.window.title"), Some("Teleios"));
        file.cleanup();
    }

    struct TempYaml {
        path: std::path::PathBuf,
    }

    impl TempYaml {
        fn path_str(&self) -> &str {
            self.path.to_str().expect("utf-8 temp path")
        }

        fn cleanup(&mut self) {
            let _ = std::fs::remove_file(&self.path);
        }
    }

    fn tempfile_with(contents: &str) -> TempYaml {
        let mut path = std::env::temp_dir();
        path.push(format!("teleios-config-test-{:?}.yml", std::thread::current().id()));
        let mut file = std::fs::File::create(&path).expect("create temp config file");
        file.write_all(contents.as_bytes()).expect("write temp config file");
        TempYaml { path }
    }
}

#[cfg(test)]
mod fatal_path_tests {
    use std::process::Command;

    #[test]
    #[ignore]
    fn missing_file_is_fatal_inner() {
        super::Config::load("/nonexistent/teleios-config-test-path.yml");
    }

    #[test]
    fn missing_file_is_fatal() {
        let exe = std::env::current_exe().expect("current test executable");
        let status = Command::new(exe)
            .arg("--exact")
            .arg("fatal_path_tests::missing_file_is_fatal_inner")
            .arg("--ignored")
            .status()
            .expect("failed to re-exec test binary");
        assert_eq!(status.code(), Some(99));
    }
}
