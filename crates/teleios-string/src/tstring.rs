//! Immutable string and string view.

use std::fmt;

/// Backing storage for a [`TString`]: either an owned byte buffer or a
/// borrowed view into someone else's buffer.
enum Storage<'a> {
    Owned(Vec<u8>),
    View(&'a [u8]),
}

/// An immutable byte string.
///
/// Every transformation returns a new owned [`TString<'static>`]; the
/// only way to get a borrowing [`TString<'a>`] is [`TString::wrap`] or
/// [`TString::view`], and the borrow checker enforces the specified
/// invariant that a view cannot outlive the buffer it shares.
pub struct TString<'a> {
    storage: Storage<'a>,
}

impl<'a> TString<'a> {
    /// Copies `bytes` into a new owned string.
    pub fn create(bytes: &[u8]) -> TString<'static> {
        let _frame = teleios_trace::frame!();
        TString {
            storage: Storage::Owned(bytes.to_vec()),
        }
    }

    /// Wraps `bytes` as a view, without copying. The returned string
    /// cannot outlive `bytes`.
    pub fn wrap(bytes: &'a [u8]) -> TString<'a> {
        TString {
            storage: Storage::View(bytes),
        }
    }

    /// The string's bytes.
    pub fn as_bytes(&self) -> &[u8] {
        match &self.storage {
            Storage::Owned(v) => v.as_slice(),
            Storage::View(s) => s,
        }
    }

    /// The string's bytes interpreted as UTF-8. Fatal if the content is
    /// not valid UTF-8 — the foundation only ever puts ASCII/UTF-8-clean
    /// bytes into a `TString`, so invalid content indicates a caller
    /// bug upstream.
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(self.as_bytes())
            .unwrap_or_else(|e| teleios_log::fatal!("TString content is not valid UTF-8: {e}"))
    }

    /// Byte length.
    pub fn length(&self) -> usize {
        self.as_bytes().len()
    }

    /// Whether the string has zero length.
    pub fn is_empty(&self) -> bool {
        self.length() == 0
    }

    /// Whether this string is a view (shares another string's buffer)
    /// rather than owning its own.
    pub fn is_view(&self) -> bool {
        matches!(self.storage, Storage::View(_))
    }

    /// The byte at `index`, or `None` if out of range.
    pub fn char_at(&self, index: usize) -> Option<u8> {
        self.as_bytes().get(index).copied()
    }

    /// Byte-for-byte equality.
    pub fn equals(&self, other: &TString<'_>) -> bool {
        self.as_bytes() == other.as_bytes()
    }

    /// ASCII case-insensitive equality.
    pub fn equals_ignore_case(&self, other: &TString<'_>) -> bool {
        let a = self.as_bytes();
        let b = other.as_bytes();
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.eq_ignore_ascii_case(y))
    }

    /// Whether the string starts with `prefix`.
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.as_bytes().starts_with(prefix.as_bytes())
    }

    /// Whether the string ends with `suffix`.
    pub fn ends_with(&self, suffix: &str) -> bool {
        self.as_bytes().ends_with(suffix.as_bytes())
    }

    /// Whether the string contains `needle` as a substring.
    pub fn contains(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        self.as_bytes()
            .windows(needle.len())
            .any(|w| w == needle.as_bytes())
    }

    /// Index of the first occurrence of `token`, if any.
    pub fn index_of_char(&self, token: u8) -> Option<usize> {
        self.as_bytes().iter().position(|&b| b == token)
    }

    /// Index of the last occurrence of `token`, if any.
    pub fn last_index_of_char(&self, token: u8) -> Option<usize> {
        self.as_bytes().iter().rposition(|&b| b == token)
    }

    /// A fresh owned copy of this string.
    pub fn copy(&self) -> TString<'static> {
        TString::create(self.as_bytes())
    }

    /// A new owned string containing bytes `[begin, end_exclusive)`.
    /// Fatal if the range is out of bounds or inverted.
    pub fn substring(&self, begin: usize, end_exclusive: usize) -> TString<'static> {
        let bytes = self.as_bytes();
        if begin > end_exclusive || end_exclusive > bytes.len() {
            teleios_log::fatal!(
                "substring({begin}, {end_exclusive}) out of bounds for length {}",
                bytes.len()
            );
        }
        TString::create(&bytes[begin..end_exclusive])
    }

    /// A new owned string with every ASCII lowercase byte uppercased.
    pub fn to_upper(&self) -> TString<'static> {
        TString {
            storage: Storage::Owned(self.as_bytes().to_ascii_uppercase()),
        }
    }

    /// A new owned string with every ASCII uppercase byte lowercased.
    pub fn to_lower(&self) -> TString<'static> {
        TString {
            storage: Storage::Owned(self.as_bytes().to_ascii_lowercase()),
        }
    }

    /// A new owned string with leading and trailing ASCII whitespace
    /// removed.
    pub fn trim(&self) -> TString<'static> {
        let bytes = self.as_bytes();
        let start = bytes.iter().position(|b| !b.is_ascii_whitespace()).unwrap_or(bytes.len());
        let end = bytes.iter().rposition(|b| !b.is_ascii_whitespace()).map_or(start, |i| i + 1);
        TString::create(&bytes[start..end])
    }

    /// A new owned string with `self` followed by `other`'s bytes.
    pub fn concat(&self, other: &TString<'_>) -> TString<'static> {
        let mut bytes = self.as_bytes().to_vec();
        bytes.extend_from_slice(other.as_bytes());
        TString {
            storage: Storage::Owned(bytes),
        }
    }

    /// A new owned string with `self` followed by `suffix`.
    pub fn concat_cstr(&self, suffix: &str) -> TString<'static> {
        let mut bytes = self.as_bytes().to_vec();
        bytes.extend_from_slice(suffix.as_bytes());
        TString {
            storage: Storage::Owned(bytes),
        }
    }

    /// A new owned string with every occurrence of `old` replaced by `new`.
    pub fn replace_char(&self, old: u8, new: u8) -> TString<'static> {
        let mut bytes = self.as_bytes().to_vec();
        for b in &mut bytes {
            if *b == old {
                *b = new;
            }
        }
        TString {
            storage: Storage::Owned(bytes),
        }
    }

    /// A new owned string of `length` bytes starting at `offset`.
    /// Fatal if the range is out of bounds.
    pub fn slice(&self, offset: usize, length: usize) -> TString<'static> {
        let bytes = self.as_bytes();
        let end = offset.checked_add(length).unwrap_or(usize::MAX);
        if end > bytes.len() {
            teleios_log::fatal!(
                "slice(offset={offset}, length={length}) out of bounds for length {}",
                bytes.len()
            );
        }
        TString::create(&bytes[offset..end])
    }

    /// Another owned copy, semantically identical to [`TString::copy`].
    pub fn duplicate(&self) -> TString<'static> {
        self.copy()
    }

    /// A view sharing this string's buffer. Borrows `self`, so it
    /// cannot outlive it.
    pub fn view(&'a self) -> TString<'a> {
        TString {
            storage: Storage::View(self.as_bytes()),
        }
    }

    /// Splits on every occurrence of `sep`, returning owned pieces.
    /// Empty pieces (from adjacent or leading/trailing separators) are
    /// included, matching a plain byte-split semantics.
    pub fn split(&self, sep: u8) -> Vec<TString<'static>> {
        self.as_bytes()
            .split(|&b| b == sep)
            .map(TString::create)
            .collect()
    }
}

impl fmt::Debug for TString<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TString")
            .field("is_view", &self.is_view())
            .field("text", &String::from_utf8_lossy(self.as_bytes()))
            .finish()
    }
}

impl fmt::Display for TString<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(self.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_copies_and_wrap_borrows() {
        let owned = TString::create(b"hello");
        assert!(!owned.is_view());
        let source = b"hello".to_vec();
        let view = TString::wrap(&source);
        assert!(view.is_view());
        assert!(owned.equals(&view));
    }

    #[test]
    fn case_insensitive_equality() {
        let a = TString::create(b"Teleios");
        let b = TString::create(b"TELEIOS");
        assert!(a.equals_ignore_case(&b));
        assert!(!a.equals(&b));
    }

    #[test]
    fn trim_strips_ascii_whitespace_both_ends() {
        let s = TString::create(b"  hi there  ");
        assert_eq!(s.trim().as_str(), "hi there");
    }

    #[test]
    fn trim_of_all_whitespace_is_empty() {
        let s = TString::create(b"   ");
        assert!(s.trim().is_empty());
    }

    #[test]
    fn substring_and_slice_extract_ranges() {
        let s = TString::create(b"teleios");
        assert_eq!(s.substring(0, 3).as_str(), "tel");
        assert_eq!(s.slice(3, 4).as_str(), "eios");
    }

    #[test]
    fn split_includes_empty_pieces() {
        let s = TString::create(b"a,,b");
        let parts = s.split(b',');
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[1].as_str(), "");
    }

    #[test]
    fn replace_char_and_case_conversions() {
        let s = TString::create(b"Hello-World");
        assert_eq!(s.replace_char(b'-', b' ').as_str(), "Hello World");
        assert_eq!(s.to_upper().as_str(), "HELLO-WORLD");
        assert_eq!(s.to_lower().as_str(), "hello-world");
    }

    #[test]
    fn index_of_char_finds_first_and_last() {
        let s = TString::create(b"banana");
        assert_eq!(s.index_of_char(b'a'), Some(1));
        assert_eq!(s.last_index_of_char(b'a'), Some(5));
        assert_eq!(s.index_of_char(b'z'), None);
    }

    #[test]
    fn view_cannot_outlive_its_owner_is_enforced_by_the_borrow_checker() {
        let owned = TString::create(b"owner");
        let view = owned.view();
        assert_eq!(view.as_str(), "owner");
    }
}
