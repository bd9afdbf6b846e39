//! Cryptographic utilities for the codec layer
//!
//! This module provides:
//! - SHA-256 and RIPEMD-160 hashing, and the 4-byte key checksum
//! - The prefixed base58 public key codec (secp256k1)
//! - Key pairs, WIF private keys and compact recoverable signatures

pub mod hash;
pub mod keys;

pub use hash::{double_sha256, ripemd160, ripemd160_checksum, sha256, CHECKSUM_LEN};
pub use keys::{
    is_canonical, recover_public_key, KeyPair, PublicKey, COMPACT_SIGNATURE_LEN, COMPRESSED_KEY_LEN,
    CURVE_BIT_SIZE,
};
