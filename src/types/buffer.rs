//! Hex-encoded byte buffer

use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::encoding::{Encode, Encoder};
use crate::error::{CodecError, Result};

/// Raw bytes whose text form is lowercase hex
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Buffer(Vec<u8>);

impl Buffer {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Decode hex text, accepting either case
    pub fn from_hex(text: &str) -> Result<Self> {
        Ok(Self(hex::decode(text)?))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl Deref for Buffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Buffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for Buffer {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl fmt::Display for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Buffer {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl Encode for Buffer {
    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
        enc.encode_bytes(&self.0)
    }
}

impl Serialize for Buffer {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Buffer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::from_hex(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::to_bytes;

    #[test]
    fn test_hex_round_trip() {
        let samples: [&[u8]; 4] = [&[], &[0x00], &[0xde, 0xad, 0xbe, 0xef], &[0xff; 300]];
        for bytes in samples {
            let buffer = Buffer::from(bytes);
            assert_eq!(Buffer::from_hex(&buffer.to_hex()).unwrap(), buffer);
        }
    }

    #[test]
    fn test_hex_is_lowercase_and_case_insensitive() {
        let buffer = Buffer::from_hex("DEADbeef").unwrap();
        assert_eq!(buffer.as_bytes(), &[0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(buffer.to_string(), "deadbeef");
    }

    #[test]
    fn test_invalid_hex() {
        assert!(matches!(Buffer::from_hex("abc"), Err(CodecError::Decode(_))));
        assert!(matches!(Buffer::from_hex("zz"), Err(CodecError::Decode(_))));
    }

    #[test]
    fn test_encode_length_prefixed() {
        let buffer = Buffer::new(vec![7; 130]);
        let bytes = to_bytes(&buffer).unwrap();
        assert_eq!(&bytes[..2], &[0x82, 0x01]);
        assert_eq!(&bytes[2..], buffer.as_bytes());
        assert_eq!(to_bytes(&Buffer::default()).unwrap(), vec![0]);
    }

    #[test]
    fn test_json() {
        let buffer: Buffer = serde_json::from_str("\"0102ff\"").unwrap();
        assert_eq!(buffer.len(), 3);
        assert_eq!(serde_json::to_string(&buffer).unwrap(), "\"0102ff\"");
        assert!(serde_json::from_str::<Buffer>("\"0g\"").is_err());
        assert!(serde_json::from_str::<Buffer>("12").is_err());
    }
}
