//! Growing byte-buffer builder that consumes itself into an owned
//! [`TString`].

use crate::TString;

/// A growing string builder. `build` transfers ownership of the
/// accumulated bytes into a [`TString`], the Rust equivalent of the
/// original's atomic ownership transfer on build.
pub struct StringBuilder {
    buffer: Vec<u8>,
}

impl StringBuilder {
    /// Creates a builder with room for at least `initial_cap` bytes
    /// before its first reallocation.
    pub fn create(initial_cap: usize) -> Self {
        StringBuilder {
            buffer: Vec::with_capacity(initial_cap),
        }
    }

    /// Appends another string's bytes.
    pub fn append(&mut self, s: &TString<'_>) -> &mut Self {
        self.buffer.extend_from_slice(s.as_bytes());
        self
    }

    /// Appends a plain Rust string slice's bytes.
    pub fn append_cstr(&mut self, s: &str) -> &mut Self {
        self.buffer.extend_from_slice(s.as_bytes());
        self
    }

    /// Appends a single byte.
    pub fn append_char(&mut self, c: u8) -> &mut Self {
        self.buffer.push(c);
        self
    }

    /// Discards accumulated bytes without releasing capacity.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Current length of the accumulated buffer.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether the accumulated buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Consumes the builder, yielding an owned [`TString`] over the
    /// accumulated bytes.
    pub fn build(self) -> TString<'static> {
        TString::create(&self.buffer)
    }
}
