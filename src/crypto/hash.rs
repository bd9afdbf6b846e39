//! Hashing helpers
//!
//! SHA-256 backs signing digests and transaction ids, RIPEMD-160 backs the
//! public key checksum.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// Length of the checksum appended to encoded keys
pub const CHECKSUM_LEN: usize = 4;

/// Computes SHA-256 hash of the input data
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(&hasher.finalize());
    out
}

/// Computes double SHA-256 hash (SHA-256 of SHA-256)
/// Used for WIF private key checksums
pub fn double_sha256(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// Computes RIPEMD-160 hash of the input data
pub fn ripemd160(data: &[u8]) -> [u8; 20] {
    let mut hasher = Ripemd160::new();
    hasher.update(data);
    let mut out = [0u8; 20];
    out.copy_from_slice(&hasher.finalize());
    out
}

/// First four bytes of RIPEMD-160, as appended to public key strings
pub fn ripemd160_checksum(data: &[u8]) -> [u8; CHECKSUM_LEN] {
    let hash = ripemd160(data);
    let mut checksum = [0u8; CHECKSUM_LEN];
    checksum.copy_from_slice(&hash[..CHECKSUM_LEN]);
    checksum
}
