//! Transaction binding and signing
//!
//! This module provides:
//! - Reference-block derivation (anti-replay binding to a recent block)
//! - Signing digests, transaction ids and signature attachment

pub mod refblock;
pub mod signer;

pub use refblock::{ref_block_num, ref_block_prefix, MIN_BLOCK_ID_LEN};
pub use signer::{transaction_id, Signer, TransactionSigner, TRANSACTION_ID_LEN};
