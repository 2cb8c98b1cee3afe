//! Container encoding/decoding: bytes, strings, sequences, options, maps.
//!
//! Element encoding is delegated to a caller-supplied closure, which is how
//! the engine recurses into nested type tags.

use crate::codec::primitives::{Reader, Writer};
use crate::error::{DecodeError, EncodeError};

// =============================================================================
// ENCODING
// =============================================================================

fn check_len(field: &'static str, len: usize, max: usize) -> Result<(), EncodeError> {
    if len > max {
        return Err(EncodeError::LengthExceedsLimit { field, len, max });
    }
    Ok(())
}

/// Writes a ULEB128 length followed by the raw bytes.
pub fn encode_bytes(writer: &mut Writer, bytes: &[u8], max_len: usize) -> Result<(), EncodeError> {
    check_len("bytes", bytes.len(), max_len)?;
    writer.write_uleb128(bytes.len() as u64);
    writer.write_bytes(bytes);
    Ok(())
}

/// Writes a ULEB128 length followed by the UTF-8 bytes.
pub fn encode_string(writer: &mut Writer, s: &str, max_len: usize) -> Result<(), EncodeError> {
    check_len("string", s.len(), max_len)?;
    writer.write_uleb128(s.len() as u64);
    writer.write_bytes(s.as_bytes());
    Ok(())
}

/// Writes a ULEB128 element count, then each element in order.
pub fn encode_vector<T, F>(
    writer: &mut Writer,
    items: &[T],
    max_len: usize,
    mut encode_item: F,
) -> Result<(), EncodeError>
where
    F: FnMut(&mut Writer, &T) -> Result<(), EncodeError>,
{
    check_len("vector", items.len(), max_len)?;
    writer.write_uleb128(items.len() as u64);
    for item in items {
        encode_item(writer, item)?;
    }
    Ok(())
}

/// Writes each element in order with no length prefix.
///
/// Fails with [`EncodeError::LengthMismatch`] unless exactly `len` items are given.
pub fn encode_fixed_array<T, F>(
    writer: &mut Writer,
    items: &[T],
    len: usize,
    mut encode_item: F,
) -> Result<(), EncodeError>
where
    F: FnMut(&mut Writer, &T) -> Result<(), EncodeError>,
{
    if items.len() != len {
        return Err(EncodeError::LengthMismatch {
            expected: len,
            actual: items.len(),
        });
    }
    for item in items {
        encode_item(writer, item)?;
    }
    Ok(())
}

/// Writes `bytes` as a `[u8; len]` with no length prefix.
pub fn encode_fixed_bytes(writer: &mut Writer, bytes: &[u8], len: usize) -> Result<(), EncodeError> {
    if bytes.len() != len {
        return Err(EncodeError::LengthMismatch {
            expected: len,
            actual: bytes.len(),
        });
    }
    writer.write_bytes(bytes);
    Ok(())
}

/// Writes a presence byte, then the value if present.
pub fn encode_option<T, F>(
    writer: &mut Writer,
    item: Option<&T>,
    encode_item: F,
) -> Result<(), EncodeError>
where
    T: ?Sized,
    F: FnOnce(&mut Writer, &T) -> Result<(), EncodeError>,
{
    match item {
        None => {
            writer.write_byte(0x00);
            Ok(())
        }
        Some(item) => {
            writer.write_byte(0x01);
            encode_item(writer, item)
        }
    }
}

/// Writes a ULEB128 entry count, then each key followed by its value.
///
/// Entries are written in the order given. Callers that need a canonical
/// ordering must sort before encoding.
pub fn encode_map<K, V, FK, FV>(
    writer: &mut Writer,
    entries: &[(K, V)],
    max_len: usize,
    mut encode_key: FK,
    mut encode_value: FV,
) -> Result<(), EncodeError>
where
    FK: FnMut(&mut Writer, &K) -> Result<(), EncodeError>,
    FV: FnMut(&mut Writer, &V) -> Result<(), EncodeError>,
{
    check_len("map", entries.len(), max_len)?;
    writer.write_uleb128(entries.len() as u64);
    for (key, value) in entries {
        encode_key(writer, key)?;
        encode_value(writer, value)?;
    }
    Ok(())
}

// =============================================================================
// DECODING
// =============================================================================

/// Reads a length-prefixed byte string.
///
/// The declared length is checked against the remaining input before the
/// slice is taken, so a crafted length cannot cause an over-read.
pub fn decode_bytes<'a>(reader: &mut Reader<'a>, max_len: usize) -> Result<&'a [u8], DecodeError> {
    let len = reader.read_len(max_len, "bytes.len")?;
    reader.read_bytes(len, "bytes")
}

/// Reads a length-prefixed UTF-8 string.
pub fn decode_string<'a>(reader: &mut Reader<'a>, max_len: usize) -> Result<&'a str, DecodeError> {
    let len = reader.read_len(max_len, "string.len")?;
    let bytes = reader.read_bytes(len, "string")?;
    std::str::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8 { context: "string" })
}

/// Reads a count-prefixed sequence.
pub fn decode_vector<'a, T, F>(
    reader: &mut Reader<'a>,
    max_len: usize,
    mut decode_item: F,
) -> Result<Vec<T>, DecodeError>
where
    F: FnMut(&mut Reader<'a>) -> Result<T, DecodeError>,
{
    let count = reader.read_len(max_len, "vector.len")?;
    // Preallocation is bounded by the input actually present.
    let mut items = Vec::with_capacity(count.min(reader.remaining_len()));
    for _ in 0..count {
        items.push(decode_item(reader)?);
    }
    Ok(items)
}

/// Reads exactly `len` elements with no prefix.
pub fn decode_fixed_array<'a, T, F>(
    reader: &mut Reader<'a>,
    len: usize,
    mut decode_item: F,
) -> Result<Vec<T>, DecodeError>
where
    F: FnMut(&mut Reader<'a>) -> Result<T, DecodeError>,
{
    let mut items = Vec::with_capacity(len.min(reader.remaining_len()));
    for _ in 0..len {
        items.push(decode_item(reader)?);
    }
    Ok(items)
}

/// Reads a presence byte and, if set, the value.
pub fn decode_option<'a, T, F>(
    reader: &mut Reader<'a>,
    decode_item: F,
) -> Result<Option<T>, DecodeError>
where
    F: FnOnce(&mut Reader<'a>) -> Result<T, DecodeError>,
{
    match reader.read_byte("option.tag")? {
        0x00 => Ok(None),
        0x01 => decode_item(reader).map(Some),
        value => Err(DecodeError::InvalidOptionTag { value }),
    }
}

/// Reads a count-prefixed sequence of key/value pairs, preserving wire order.
pub fn decode_map<'a, K, V, FK, FV>(
    reader: &mut Reader<'a>,
    max_len: usize,
    mut decode_key: FK,
    mut decode_value: FV,
) -> Result<Vec<(K, V)>, DecodeError>
where
    FK: FnMut(&mut Reader<'a>) -> Result<K, DecodeError>,
    FV: FnMut(&mut Reader<'a>) -> Result<V, DecodeError>,
{
    let count = reader.read_len(max_len, "map.len")?;
    let mut entries = Vec::with_capacity(count.min(reader.remaining_len()));
    for _ in 0..count {
        let key = decode_key(reader)?;
        let value = decode_value(reader)?;
        entries.push((key, value));
    }
    Ok(entries)
}
