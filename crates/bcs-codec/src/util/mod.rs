//! Utility modules.

pub mod encoding;

pub use encoding::{decode_from_str, encode_to_string, Encoding};
