//! Radix (base 2..36) integer formatting, and the inverse base-10 /
//! arbitrary-base / floating-point parsers.
//!
//! Formatting never fails (every integer has a representation in every
//! base); parsing treats a malformed string as a programming error and
//! is fatal, consistent with the rest of the foundation's "cannot
//! continue" failure model for its own primitives — except
//! [`leading_i64`], which mirrors the original's unchecked `strtol`
//! parse and returns `0` rather than failing.

const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

fn format_u128_radix(mut value: u128, base: u32) -> String {
    assert!((2..=36).contains(&base), "base must be in 2..=36");
    if value == 0 {
        return "0".to_string();
    }
    let base = u128::from(base);
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(DIGITS[(value % base) as usize]);
        value /= base;
    }
    digits.reverse();
    String::from_utf8(digits).expect("radix digits are ASCII")
}

fn format_i128_radix(value: i128, base: u32) -> String {
    if value < 0 {
        format!("-{}", format_u128_radix(value.unsigned_abs(), base))
    } else {
        format_u128_radix(value as u128, base)
    }
}

macro_rules! signed_from {
    ($name:ident, $ty:ty) => {
        /// Formats a
        #[doc = concat!("`", stringify!($ty), "`")]
        /// in `base` (2..=36), lowercase digits.
        pub fn $name(value: $ty, base: u32) -> String {
            format_i128_radix(value as i128, base)
        }
    };
}

macro_rules! unsigned_from {
    ($name:ident, $ty:ty) => {
        /// Formats a
        #[doc = concat!("`", stringify!($ty), "`")]
        /// in `base` (2..=36), lowercase digits.
        pub fn $name(value: $ty, base: u32) -> String {
            format_u128_radix(value as u128, base)
        }
    };
}

signed_from!(from_i8, i8);
signed_from!(from_i16, i16);
signed_from!(from_i32, i32);
signed_from!(from_i64, i64);
unsigned_from!(from_u8, u8);
unsigned_from!(from_u16, u16);
unsigned_from!(from_u32, u32);
unsigned_from!(from_u64, u64);

macro_rules! parse_int {
    ($name:ident, $ty:ty) => {
        /// Parses a base-10
        #[doc = concat!("`", stringify!($ty), "`")]
        /// . Fatal if `text` does not parse.
        pub fn $name(text: &str) -> $ty {
            text.trim()
                .parse::<$ty>()
                .unwrap_or_else(|e| teleios_log::fatal!("failed to parse '{text}' as {}: {e}", stringify!($ty)))
        }
    };
}

parse_int!(to_i8, i8);
parse_int!(to_i16, i16);
parse_int!(to_i32, i32);
parse_int!(to_i64, i64);
parse_int!(to_u8, u8);
parse_int!(to_u16, u16);
parse_int!(to_u32, u32);
parse_int!(to_u64, u64);

macro_rules! signed_from_radix {
    ($name:ident, $ty:ty) => {
        /// Parses a signed
        #[doc = concat!("`", stringify!($ty), "`")]
        /// in `base` (2..=36). Fatal if `text` does not parse or
        /// overflows the target type.
        pub fn $name(text: &str, base: u32) -> $ty {
            assert!((2..=36).contains(&base), "base must be in 2..=36");
            let trimmed = text.trim();
            let (negative, digits) = match trimmed.strip_prefix('-') {
                Some(rest) => (true, rest),
                None => (false, trimmed),
            };
            i128::from_str_radix(digits, base)
                .ok()
                .map(|v| if negative { -v } else { v })
                .and_then(|v| <$ty>::try_from(v).ok())
                .unwrap_or_else(|| {
                    teleios_log::fatal!("failed to parse '{text}' as {} in base {base}", stringify!($ty))
                })
        }
    };
}

macro_rules! unsigned_from_radix {
    ($name:ident, $ty:ty) => {
        /// Parses an unsigned
        #[doc = concat!("`", stringify!($ty), "`")]
        /// in `base` (2..=36). Fatal if `text` does not parse or
        /// overflows the target type.
        pub fn $name(text: &str, base: u32) -> $ty {
            assert!((2..=36).contains(&base), "base must be in 2..=36");
            u128::from_str_radix(text.trim(), base)
                .ok()
                .and_then(|v| <$ty>::try_from(v).ok())
                .unwrap_or_else(|| {
                    teleios_log::fatal!("failed to parse '{text}' as {} in base {base}", stringify!($ty))
                })
        }
    };
}

signed_from_radix!(to_i8_radix, i8);
signed_from_radix!(to_i16_radix, i16);
signed_from_radix!(to_i32_radix, i32);
signed_from_radix!(to_i64_radix, i64);
unsigned_from_radix!(to_u8_radix, u8);
unsigned_from_radix!(to_u16_radix, u16);
unsigned_from_radix!(to_u32_radix, u32);
unsigned_from_radix!(to_u64_radix, u64);

/// Parses the longest leading decimal-integer run in `text` (an
/// optional sign followed by digits), ignoring everything after it.
/// Returns `0` if no leading digit is present at all — the original
/// `strtol`-based parse never validates trailing characters and
/// returns `0` on a failed conversion, so `"30fps"` parses as `30` and
/// `"fps"` parses as `0`. Never fatal: a `0` result is the caller's
/// signal to fall back to a default, not a parse error.
pub fn leading_i64(text: &str) -> i64 {
    let trimmed = text.trim_start();
    let mut end = 0;
    let mut chars = trimmed.char_indices();
    if let Some((_, '+' | '-')) = chars.clone().next() {
        let (i, c) = chars.next().unwrap();
        end = i + c.len_utf8();
    }
    let mut saw_digit = false;
    for (i, c) in chars {
        if !c.is_ascii_digit() {
            break;
        }
        saw_digit = true;
        end = i + c.len_utf8();
    }
    if !saw_digit {
        return 0;
    }
    trimmed[..end].parse::<i64>().unwrap_or(0)
}

/// Parses a `f32` with the platform's usual float grammar. Fatal if
/// `text` does not parse.
pub fn to_f32(text: &str) -> f32 {
    text.trim()
        .parse::<f32>()
        .unwrap_or_else(|e| teleios_log::fatal!("failed to parse '{text}' as f32: {e}"))
}

/// Parses a `f64` with the platform's usual float grammar. Fatal if
/// `text` does not parse.
pub fn to_f64(text: &str) -> f64 {
    text.trim()
        .parse::<f64>()
        .unwrap_or_else(|e| teleios_log::fatal!("failed to parse '{text}' as f64: {e}"))
}
