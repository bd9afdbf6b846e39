//! Unsigned LEB128 varints
//!
//! Seven payload bits per byte, least significant group first, with the high
//! bit set on every byte except the last. Used for lengths and counts.

use std::io::Write;

use crate::error::{CodecError, Result};

/// Longest possible encoding of a u64
pub const MAX_UVARINT_LEN: usize = 10;

/// Encode `value` into a fresh byte vector
pub fn uvarint_bytes(value: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(MAX_UVARINT_LEN);
    let mut value = value;
    while value >= 0x80 {
        out.push((value as u8) | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
    out
}

/// Write `value` to `writer`, returning the number of bytes written
pub fn encode_uvarint<W: Write + ?Sized>(writer: &mut W, value: u64) -> Result<usize> {
    let bytes = uvarint_bytes(value);
    writer.write_all(&bytes)?;
    Ok(bytes.len())
}

/// Decode a varint from the front of `data`
///
/// Returns the value and the number of bytes consumed.
pub fn decode_uvarint(data: &[u8]) -> Result<(u64, usize)> {
    let mut value: u64 = 0;
    let mut shift = 0u32;

    for (i, &byte) in data.iter().enumerate() {
        if i == MAX_UVARINT_LEN - 1 && byte > 1 {
            return Err(CodecError::Decode("uvarint overflows u64".to_string()));
        }
        value |= u64::from(byte & 0x7f) << shift;
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
        shift += 7;
    }

    Err(CodecError::Decode("truncated uvarint".to_string()))
}
