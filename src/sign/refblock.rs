//! Reference-block fields
//!
//! A transaction names a recent block through the low bits of its height and
//! four bytes of its id, so it cannot be replayed on a fork that lacks that
//! block.

use crate::error::{CodecError, Result};

/// Offset of the prefix bytes inside a block id
const PREFIX_OFFSET: usize = 4;

/// Shortest block id that still contains the prefix bytes
pub const MIN_BLOCK_ID_LEN: usize = PREFIX_OFFSET + 4;

/// Reference block number for a block height
///
/// Returned unchanged. Reducing it to the 16-bit transaction field is up to
/// the caller.
pub fn ref_block_num(height: u64) -> u64 {
    height
}

/// Reference block prefix from a hex-encoded block id
///
/// Reads bytes 4..8 of the id as a little-endian u32.
pub fn ref_block_prefix(block_id: &str) -> Result<u64> {
    let raw = hex::decode(block_id).map_err(|e| {
        CodecError::Decode(format!("failed to decode block ID {:?}: {}", block_id, e))
    })?;

    if raw.len() < MIN_BLOCK_ID_LEN {
        return Err(CodecError::InvalidBlockId(format!(
            "{:?} is {} bytes, need at least {}",
            block_id,
            raw.len(),
            MIN_BLOCK_ID_LEN
        )));
    }

    let mut prefix = [0u8; 4];
    prefix.copy_from_slice(&raw[PREFIX_OFFSET..MIN_BLOCK_ID_LEN]);
    Ok(u64::from(u32::from_le_bytes(prefix)))
}
