//! Canonical transaction serialization
//!
//! The byte form produced here is what validators hash and sign, so field
//! order and widths are fixed:
//! - ref_block_num as u16 LE
//! - ref_block_prefix as u32 LE
//! - expiration as u32 LE seconds
//! - varint operation count, then each operation's own encoding
//! - a single zero varint for the empty extensions list
//!
//! Signatures are not part of the signed bytes; they are attached afterwards.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{json, Value};

use super::operation::{Extensions, Operation, OperationRegistry};
use super::time::Time;
use crate::encoding::{self, Encode, Encoder, RollingEncoder};
use crate::error::{CodecError, Result};

/// A transaction under construction or ready to be signed
#[derive(Debug)]
pub struct Transaction {
    /// Low 16 bits of a recent block height
    pub ref_block_num: u16,
    /// Bytes 4..8 of the same block's id
    pub ref_block_prefix: u32,
    pub expiration: Time,
    operations: Vec<Box<dyn Operation>>,
    /// Hex-encoded compact signatures
    pub signatures: Vec<String>,
}

impl Transaction {
    pub fn new(ref_block_num: u16, ref_block_prefix: u32, expiration: Time) -> Self {
        Self {
            ref_block_num,
            ref_block_prefix,
            expiration,
            operations: Vec::new(),
            signatures: Vec::new(),
        }
    }

    /// Append an operation; operations are serialized in push order
    pub fn push_operation<O: Operation + 'static>(&mut self, op: O) {
        self.operations.push(Box::new(op));
    }

    pub fn push_boxed_operation(&mut self, op: Box<dyn Operation>) {
        self.operations.push(op);
    }

    pub fn operations(&self) -> &[Box<dyn Operation>] {
        &self.operations
    }

    pub fn attach_signature(&mut self, signature: String) {
        self.signatures.push(signature);
    }

    /// Canonical bytes, as hashed for signing
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let bytes = encoding::to_bytes(self)?;
        log::debug!(
            "Serialized transaction with {} operations into {} bytes",
            self.operations.len(),
            bytes.len()
        );
        log::trace!("Transaction bytes: {}", hex::encode(&bytes));
        Ok(bytes)
    }

    pub fn to_hex(&self) -> Result<String> {
        Ok(hex::encode(self.to_bytes()?))
    }

    /// Read a transaction from JSON, decoding operations through `registry`
    pub fn from_json(json: &str, registry: &OperationRegistry) -> Result<Self> {
        let raw: RawTransaction = serde_json::from_str(json)?;

        let mut tx = Self::new(raw.ref_block_num, raw.ref_block_prefix, raw.expiration);
        for (op_type, body) in raw.operations {
            tx.push_boxed_operation(registry.decode(op_type, body)?);
        }
        tx.signatures = raw.signatures;
        Ok(tx)
    }
}

impl Encode for Transaction {
    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
        if self.operations.is_empty() {
            return Err(CodecError::NoOperation);
        }

        RollingEncoder::new(enc)
            .encode(&self.ref_block_num)
            .encode(&self.ref_block_prefix)
            .encode(&self.expiration)
            .encode_uvarint(self.operations.len() as u64)
            .encode_each(&self.operations)
            .encode(&Extensions)
            .finish()
    }
}

impl Serialize for Transaction {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let operations = self
            .operations
            .iter()
            .map(|op| {
                let body = op.to_json()?;
                Ok(json!([op.op_type(), body]))
            })
            .collect::<Result<Vec<Value>>>()
            .map_err(serde::ser::Error::custom)?;

        let mut state = serializer.serialize_struct("Transaction", 6)?;
        state.serialize_field("ref_block_num", &self.ref_block_num)?;
        state.serialize_field("ref_block_prefix", &self.ref_block_prefix)?;
        state.serialize_field("expiration", &self.expiration)?;
        state.serialize_field("operations", &operations)?;
        state.serialize_field("extensions", &Extensions)?;
        state.serialize_field("signatures", &self.signatures)?;
        state.end()
    }
}

#[derive(Deserialize)]
struct RawTransaction {
    ref_block_num: u16,
    ref_block_prefix: u32,
    expiration: Time,
    operations: Vec<(u64, Value)>,
    #[serde(default, rename = "extensions")]
    _extensions: Extensions,
    #[serde(default)]
    signatures: Vec<String>,
}
