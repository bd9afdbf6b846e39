//! Binary wire encoding
//!
//! This module provides:
//! - Unsigned LEB128 varints
//! - The `Encode` capability and the byte sink it writes into
//! - `RollingEncoder`, which chains encodes and surfaces the first failure

pub mod encoder;
pub mod varint;

pub use encoder::{to_bytes, Encode, Encoder, RollingEncoder};
pub use varint::{decode_uvarint, encode_uvarint, uvarint_bytes, MAX_UVARINT_LEN};
