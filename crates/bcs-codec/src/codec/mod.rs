//! Binary encoding/decoding building blocks for BCS.
//!
//! `primitives` handles fixed-width integers, booleans and ULEB128;
//! `containers` layers length-prefixed and composite shapes on top.

pub mod containers;
pub mod primitives;

pub use primitives::{uleb128_len, Reader, UintWidth, Writer};
