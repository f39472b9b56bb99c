//! Utility modules

pub mod text;

pub use text::{byte_offset, char_len, char_prefix, char_slice, splice};
