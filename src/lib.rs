//! Graphene-Codec: canonical wire encoding for Graphene-based chains
//!
//! This crate provides the byte-exact layer between in-memory chain objects
//! and what validators hash and sign:
//! - LEB128 varints and a rolling encoder that surfaces the first failure
//! - Hex byte buffers, object ids, asset amounts and prices
//! - Prefixed, RIPEMD-160 checksummed public keys (secp256k1)
//! - The canonical transaction serializer
//! - Reference-block derivation, signing digests and signature attachment
//!
//! # Example
//!
//! ```rust
//! use graphene_codec::sign::{ref_block_num, ref_block_prefix, TransactionSigner};
//! use graphene_codec::types::{AssetAmount, ObjectId, Time, Transaction, TransferOperation};
//! use graphene_codec::KeyPair;
//!
//! let block_id = "0000002a0102030405060708090a0b0c0d0e0f1011121314";
//! let mut tx = Transaction::new(
//!     ref_block_num(42) as u16,
//!     ref_block_prefix(block_id).unwrap() as u32,
//!     Time::from_now(30).unwrap(),
//! );
//!
//! let core = ObjectId::new(1, 3, 0);
//! tx.push_operation(TransferOperation::new(
//!     AssetAmount::new("100", core),
//!     ObjectId::new(1, 2, 17),
//!     ObjectId::new(1, 2, 18),
//!     AssetAmount::new("50000", core),
//! ));
//!
//! let key = KeyPair::generate();
//! TransactionSigner::default().sign(&mut tx, &[&key]).unwrap();
//! println!("{}", serde_json::to_string(&tx).unwrap());
//! ```

pub mod config;
pub mod crypto;
pub mod encoding;
pub mod error;
pub mod sign;
pub mod types;

// Re-export commonly used types
pub use config::{ChainConfig, BITSHARES_CHAIN_ID, DEFAULT_ADDRESS_PREFIX};
pub use crypto::{KeyPair, PublicKey};
pub use encoding::{Encode, Encoder, RollingEncoder};
pub use error::{CodecError, Result};
pub use sign::{Signer, TransactionSigner};
pub use types::{
    AssetAmount, Buffer, ObjectId, Operation, OperationRegistry, Price, Time, Transaction,
    TransferOperation,
};
