//! Operations carried inside a transaction
//!
//! The transaction serializer treats operations as opaque: each one writes
//! its own type tag and payload. `OperationRegistry` maps type tags back to
//! JSON decoders so transactions can be read from node responses.

use std::collections::HashMap;
use std::fmt;

use serde::de::{SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::asset::AssetAmount;
use super::buffer::Buffer;
use super::object_id::ObjectId;
use crate::crypto::PublicKey;
use crate::encoding::{Encode, Encoder, RollingEncoder};
use crate::error::{CodecError, Result};

/// Type tag of the transfer operation
pub const TRANSFER_OP_TYPE: u64 = 0;

/// A chain operation that knows its own wire and JSON forms
pub trait Operation: Encode + fmt::Debug + Send + Sync {
    /// Type tag, as it appears in the JSON `[type, body]` pair
    fn op_type(&self) -> u64;

    /// JSON body, without the type tag
    fn to_json(&self) -> Result<Value>;
}

/// Decodes one operation body from JSON
pub type OperationDecoder = fn(Value) -> Result<Box<dyn Operation>>;

/// Lookup table from operation type tags to JSON decoders
#[derive(Clone)]
pub struct OperationRegistry {
    decoders: HashMap<u64, OperationDecoder>,
}

impl OperationRegistry {
    /// A registry that knows no operations
    pub fn empty() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }

    pub fn register(&mut self, op_type: u64, decoder: OperationDecoder) -> &mut Self {
        self.decoders.insert(op_type, decoder);
        self
    }

    pub fn is_registered(&self, op_type: u64) -> bool {
        self.decoders.contains_key(&op_type)
    }

    pub fn decode(&self, op_type: u64, body: Value) -> Result<Box<dyn Operation>> {
        let decoder = self
            .decoders
            .get(&op_type)
            .ok_or(CodecError::UnknownOperation(op_type))?;
        decoder(body)
    }
}

impl Default for OperationRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(TRANSFER_OP_TYPE, decode_transfer);
        registry
    }
}

fn decode_transfer(body: Value) -> Result<Box<dyn Operation>> {
    let op: TransferOperation = serde_json::from_value(body)?;
    Ok(Box::new(op))
}

impl fmt::Debug for OperationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<_> = self.decoders.keys().collect();
        types.sort();
        f.debug_struct("OperationRegistry")
            .field("types", &types)
            .finish()
    }
}

// =============================================================================
// Extensions
// =============================================================================

/// The always-empty extensions list
///
/// Serializes as `[]` and as a single zero varint on the wire. Non-empty
/// extension data is rejected when decoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Extensions;

impl Encode for Extensions {
    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
        enc.encode_uvarint(0)
    }
}

impl Serialize for Extensions {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_seq(Some(0))?.end()
    }
}

impl<'de> Deserialize<'de> for Extensions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct EmptySeq;

        impl<'de> Visitor<'de> for EmptySeq {
            type Value = Extensions;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an empty extensions list")
            }

            fn visit_seq<A: SeqAccess<'de>>(
                self,
                mut seq: A,
            ) -> std::result::Result<Extensions, A::Error> {
                if seq.next_element::<Value>()?.is_some() {
                    return Err(serde::de::Error::custom("extensions are not supported"));
                }
                Ok(Extensions)
            }
        }

        deserializer.deserialize_seq(EmptySeq)
    }
}

// =============================================================================
// Transfer
// =============================================================================

/// Encrypted note attached to a transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memo {
    pub from: PublicKey,
    pub to: PublicKey,
    pub nonce: u64,
    pub message: Buffer,
}

impl Encode for Memo {
    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
        RollingEncoder::new(enc)
            .encode(&self.from)
            .encode(&self.to)
            .encode(&self.nonce)
            .encode(&self.message)
            .finish()
    }
}

/// Moves an amount from one account to another
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferOperation {
    pub fee: AssetAmount,
    pub from: ObjectId,
    pub to: ObjectId,
    pub amount: AssetAmount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<Memo>,
    #[serde(default)]
    pub extensions: Extensions,
}

impl TransferOperation {
    pub fn new(fee: AssetAmount, from: ObjectId, to: ObjectId, amount: AssetAmount) -> Self {
        Self {
            fee,
            from,
            to,
            amount,
            memo: None,
            extensions: Extensions,
        }
    }

    pub fn with_memo(mut self, memo: Memo) -> Self {
        self.memo = Some(memo);
        self
    }
}

impl Encode for TransferOperation {
    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
        RollingEncoder::new(enc)
            .encode_uvarint(TRANSFER_OP_TYPE)
            .encode(&self.fee)
            .encode(&self.from)
            .encode(&self.to)
            .encode(&self.amount)
            .encode(&self.memo)
            .encode(&self.extensions)
            .finish()
    }
}

impl Operation for TransferOperation {
    fn op_type(&self) -> u64 {
        TRANSFER_OP_TYPE
    }

    fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::KeyPair;
    use crate::encoding::to_bytes;
    use serde_json::json;

    fn core(amount: &str) -> AssetAmount {
        AssetAmount::new(amount, ObjectId::new(1, 3, 0))
    }

    fn transfer() -> TransferOperation {
        TransferOperation::new(
            core("10"),
            ObjectId::new(1, 2, 17),
            ObjectId::new(1, 2, 18),
            core("500"),
        )
    }

    #[test]
    fn test_extensions_forms() {
        assert_eq!(to_bytes(&Extensions).unwrap(), vec![0]);
        assert_eq!(serde_json::to_string(&Extensions).unwrap(), "[]");
        assert!(serde_json::from_str::<Extensions>("[]").is_ok());
        assert!(serde_json::from_str::<Extensions>("[1]").is_err());
        assert!(serde_json::from_str::<Extensions>("{}").is_err());
    }

    #[test]
    fn test_transfer_encoding() {
        let bytes = to_bytes(&transfer()).unwrap();
        let expected = vec![
            0x00, // op type
            2, b'1', b'0', 1, 0, // fee
            1, 17, // from
            1, 18, // to
            3, b'5', b'0', b'0', 1, 0, // amount
            0, // no memo
            0, // extensions
        ];
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_transfer_with_memo_encoding() {
        let from = KeyPair::generate().public_key("BTS");
        let to = KeyPair::generate().public_key("BTS");
        let memo = Memo {
            from: from.clone(),
            to: to.clone(),
            nonce: 7,
            message: Buffer::new(vec![0xab, 0xcd]),
        };
        let plain = to_bytes(&transfer()).unwrap();
        let bytes = to_bytes(&transfer().with_memo(memo)).unwrap();

        let memo_start = plain.len() - 2;
        assert_eq!(bytes[memo_start], 1);
        let keys = &bytes[memo_start + 1..memo_start + 67];
        assert_eq!(&keys[..33], &from.to_bytes()[..]);
        assert_eq!(&keys[33..], &to.to_bytes()[..]);
        assert_eq!(
            &bytes[memo_start + 67..],
            &[7, 0, 0, 0, 0, 0, 0, 0, 2, 0xab, 0xcd, 0]
        );
    }

    #[test]
    fn test_transfer_json() {
        let value = transfer().to_json().unwrap();
        assert_eq!(
            value,
            json!({
                "fee": {"amount": "10", "asset_id": "1.3.0"},
                "from": "1.2.17",
                "to": "1.2.18",
                "amount": {"amount": "500", "asset_id": "1.3.0"},
                "extensions": []
            })
        );
    }

    #[test]
    fn test_registry_decodes_transfer() {
        let registry = OperationRegistry::default();
        assert!(registry.is_registered(TRANSFER_OP_TYPE));

        let body = json!({
            "fee": {"amount": 10, "asset_id": "1.3.0"},
            "from": "1.2.17",
            "to": "1.2.18",
            "amount": {"amount": "500", "asset_id": "1.3.0"}
        });
        let op = registry.decode(TRANSFER_OP_TYPE, body).unwrap();
        assert_eq!(op.op_type(), TRANSFER_OP_TYPE);
        assert_eq!(to_bytes(&op).unwrap(), to_bytes(&transfer()).unwrap());
    }

    #[test]
    fn test_registry_unknown_type() {
        let registry = OperationRegistry::empty();
        assert!(matches!(
            registry.decode(TRANSFER_OP_TYPE, json!({})),
            Err(CodecError::UnknownOperation(0))
        ));
    }
}
