//! Token-level YAML walk that flattens a document into a dotted-path
//! property map.
//!
//! Nesting is tracked as a stack of scopes (`Map`/`Seq`), each recording
//! how many path segments its own entry pushed so `MappingEnd`/
//! `SequenceEnd` can truncate `path` back to exactly where it was before
//! that entry was opened. A sequence item synthesizes its numeric index
//! as a path segment only when the item is itself a nested map/sequence
//! (so that segment has a scope to be popped by); a plain scalar
//! sequence entry never touches `path` at all — its index is folded
//! directly into the emitted key. This sidesteps a quirk in the
//! original scanner-driven walk, where a run of scalar-only sequence
//! entries has no `BLOCK_END` between them to pop the index segment a
//! `BLOCK_ENTRY` token pushes.

use teleios_containers::Map;
use yaml_rust2::parser::{Event, EventReceiver, Parser};

enum FrameKind {
    Map { expect_key: bool },
    Seq { next_index: u64 },
}

struct Frame {
    kind: FrameKind,
    popped_to: usize,
    consumed_key: bool,
}

struct Walker {
    path: Vec<String>,
    scopes: Vec<Frame>,
    pending_key: Option<String>,
    properties: Map<String>,
}

impl Walker {
    fn new() -> Self {
        Walker {
            path: Vec::new(),
            scopes: Vec::new(),
            pending_key: None,
            properties: Map::create(32),
        }
    }

    fn emit(&mut self, key: &str, value: String) {
        let mut dotted = self.path.join(".");
        if !key.is_empty() {
            if !dotted.is_empty() {
                dotted.push('.');
            }
            dotted.push_str(key);
        }
        self.properties.put(&dotted, value);
    }

    fn on_container_start(&mut self, open_map: bool) {
        let entry_len = self.path.len();
        let consumed_key = if let Some(key) = self.pending_key.take() {
            self.path.push(key);
            true
        } else {
            let mut pushed = false;
            if let Some(Frame {
                kind: FrameKind::Seq { next_index },
                ..
            }) = self.scopes.last_mut()
            {
                let index = *next_index;
                *next_index += 1;
                self.path.push(index.to_string());
                pushed = true;
            }
            pushed
        };
        let kind = if open_map {
            FrameKind::Map { expect_key: true }
        } else {
            FrameKind::Seq { next_index: 0 }
        };
        self.scopes.push(Frame {
            kind,
            popped_to: entry_len,
            consumed_key,
        });
    }

    fn on_container_end(&mut self) {
        let frame = self
            .scopes
            .pop()
            .unwrap_or_else(|| teleios_log::fatal!("unbalanced mapping/sequence end in config YAML"));
        self.path.truncate(frame.popped_to);
        if frame.consumed_key {
            if let Some(Frame {
                kind: FrameKind::Map { expect_key },
                ..
            }) = self.scopes.last_mut()
            {
                *expect_key = true;
            }
        }
    }

    fn on_scalar(&mut self, value: String) {
        match self.scopes.last_mut() {
            Some(Frame {
                kind: FrameKind::Map { expect_key },
                ..
            }) if *expect_key => {
                *expect_key = false;
                self.pending_key = Some(value);
            }
            Some(Frame {
                kind: FrameKind::Map { expect_key },
                ..
            }) => {
                *expect_key = true;
                let key = self
                    .pending_key
                    .take()
                    .unwrap_or_else(|| teleios_log::fatal!("scalar value with no preceding key in config YAML"));
                self.emit(&key, value);
            }
            Some(Frame {
                kind: FrameKind::Seq { next_index },
                ..
            }) => {
                let index = *next_index;
                *next_index += 1;
                self.emit(&index.to_string(), value);
            }
            None => self.emit("", value),
        }
    }
}

impl EventReceiver for Walker {
    fn on_event(&mut self, ev: Event) {
        match ev {
            Event::Nothing | Event::StreamStart | Event::StreamEnd | Event::DocumentStart | Event::DocumentEnd => {}
            Event::Alias(_) => teleios_log::fatal!("config YAML anchors/aliases are not supported"),
            Event::Scalar(value, _, _, _) => self.on_scalar(value),
            Event::SequenceStart(_, _) => self.on_container_start(false),
            Event::SequenceEnd => self.on_container_end(),
            Event::MappingStart(_, _) => self.on_container_start(true),
            Event::MappingEnd => self.on_container_end(),
        }
    }
}

/// Parses `text` as a YAML document and returns its flattened,
/// dotted-path property map. Fatal on malformed YAML, matching the
/// original scanner's `NO_TOKEN` handling.
pub fn walk(text: &str) -> Map<String> {
    let _frame = teleios_trace::frame!();
    let mut walker = Walker::new();
    let mut parser = Parser::new(text.chars());
    parser
        .load(&mut walker, false)
        .unwrap_or_else(|e| teleios_log::fatal!("malformed config YAML: {e}"));
    walker.properties
}


#[cfg(test)]
mod fatal_path_tests {
    use std::process::Command;

    #[test]
    #[ignore]
    fn malformed_yaml_is_fatal_inner() {
        super::walk("engine: [unterminated\n");
    }

    #[test]
    fn malformed_yaml_is_fatal() {
        let exe = std::env::current_exe().expect("current test executable");
        let status = Command::new(exe)
            .arg("--exact")
            .arg("walker::fatal_path_tests::malformed_yaml_is_fatal_inner")
            .arg("--ignored")
            .status()
            .expect("failed to re-exec test binary");
        assert_eq!(status.code(), Some(99));
    }
}
