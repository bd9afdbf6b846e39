//! Asset amounts and prices
//!
//! Amounts are carried as decimal strings and never interpreted here. Nodes
//! return them either as JSON strings or as bare numbers, so decoding
//! accepts both and normalizes to the string form.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::object_id::ObjectId;
use crate::encoding::{Encode, Encoder, RollingEncoder};
use crate::error::Result;

/// An amount of a specific asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetAmount {
    #[serde(deserialize_with = "string_or_number")]
    pub amount: String,
    pub asset_id: ObjectId,
}

impl AssetAmount {
    pub fn new(amount: impl Into<String>, asset_id: ObjectId) -> Self {
        Self {
            amount: amount.into(),
            asset_id,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Encode for AssetAmount {
    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
        RollingEncoder::new(enc)
            .encode(&self.amount)
            .encode(&self.asset_id)
            .finish()
    }
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(amount) => Ok(amount),
        Value::Number(amount) => Ok(amount.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "amount must be a string or a number, got {}",
            other
        ))),
    }
}

/// Exchange ratio between two assets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    pub base: AssetAmount,
    pub quote: AssetAmount,
}

impl Encode for Price {
    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
        RollingEncoder::new(enc)
            .encode(&self.base)
            .encode(&self.quote)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::to_bytes;
    use crate::error::CodecError;

    #[test]
    fn test_amount_string_or_number() {
        let from_string =
            AssetAmount::from_json(r#"{"amount":"100","asset_id":"1.3.0"}"#).unwrap();
        let from_number = AssetAmount::from_json(r#"{"amount":100,"asset_id":"1.3.0"}"#).unwrap();
        assert_eq!(from_string, from_number);
        assert_eq!(from_number.amount, "100");
    }

    #[test]
    fn test_amount_rejects_other_types() {
        for json in [
            r#"{"amount":true,"asset_id":"1.3.0"}"#,
            r#"{"amount":null,"asset_id":"1.3.0"}"#,
            r#"{"amount":[1],"asset_id":"1.3.0"}"#,
        ] {
            assert!(matches!(
                AssetAmount::from_json(json),
                Err(CodecError::Decode(_))
            ));
        }
    }

    #[test]
    fn test_malformed_asset_id() {
        assert!(matches!(
            AssetAmount::from_json(r#"{"amount":"1","asset_id":"1.3"}"#),
            Err(CodecError::Decode(_))
        ));
        assert!(matches!(
            AssetAmount::from_json(r#"{"amount":"1","asset_id":{"id":3}}"#),
            Err(CodecError::Decode(_))
        ));
    }

    #[test]
    fn test_serializes_amount_as_string() {
        let amount = AssetAmount::new("42", ObjectId::new(1, 3, 0));
        assert_eq!(
            serde_json::to_string(&amount).unwrap(),
            r#"{"amount":"42","asset_id":"1.3.0"}"#
        );
    }

    #[test]
    fn test_encode_amount() {
        let amount = AssetAmount::new("100", ObjectId::new(1, 3, 5));
        assert_eq!(
            to_bytes(&amount).unwrap(),
            vec![3, b'1', b'0', b'0', 0x01, 0x05]
        );
    }

    #[test]
    fn test_price_order_matters() {
        let a = AssetAmount::new("1", ObjectId::new(1, 3, 0));
        let b = AssetAmount::new("2", ObjectId::new(1, 3, 1));
        let price = Price {
            base: a.clone(),
            quote: b.clone(),
        };
        let inverted = Price { base: b, quote: a };

        let bytes = to_bytes(&price).unwrap();
        assert_eq!(bytes, vec![1, b'1', 1, 0, 1, b'2', 1, 1]);
        assert_ne!(bytes, to_bytes(&inverted).unwrap());
    }
}
