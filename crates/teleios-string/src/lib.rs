//! Immutable strings, string views, a builder, and radix conversion
//! for the Teleios foundation runtime.
//!
//! A [`TString`] never mutates in place — every transformation
//! (`to_upper`, `trim`, `concat`, ...) returns a new owned string.
//! [`TString::wrap`]/[`TString::view`] produce a *view* that borrows
//! another string's bytes instead of copying them; Rust's borrow
//! checker enforces the specified invariant that a view cannot outlive
//! the buffer it shares, which the original engine enforced by
//! discipline alone.
//!
//! Strings here own their bytes as a plain `Vec<u8>` rather than being
//! threaded through `teleios-alloc`: the allocator crate's tagging and
//! leak accounting is a concern of its own two strategies, and nothing
//! about string content needs a second, parallel bookkeeping scheme on
//! top of what `Vec<u8>` already provides.

#![deny(missing_docs)]
#![forbid(unsafe_code)]

mod builder;
mod radix;
mod tstring;

pub use builder::StringBuilder;
pub use tstring::TString;

pub use radix::{
    from_i16, from_i32, from_i64, from_i8, from_u16, from_u32, from_u64, from_u8, leading_i64, to_f32,
    to_f64, to_i16, to_i16_radix, to_i32, to_i32_radix, to_i64, to_i64_radix, to_i8, to_i8_radix, to_u16,
    to_u16_radix, to_u32, to_u32_radix, to_u64, to_u64_radix, to_u8, to_u8_radix,
};
