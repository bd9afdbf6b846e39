//! Chain object identifiers
//!
//! Objects are addressed as `space.type.instance`, e.g. `1.3.0` for the core
//! asset. On the wire only the space and instance are written, as varints.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::encoding::{Encode, Encoder, RollingEncoder};
use crate::error::{CodecError, Result};

/// Reference to an object stored on chain
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId {
    pub space: u64,
    pub type_id: u64,
    pub instance: u64,
}

impl ObjectId {
    pub const fn new(space: u64, type_id: u64, instance: u64) -> Self {
        Self {
            space,
            type_id,
            instance,
        }
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.space, self.type_id, self.instance)
    }
}

impl FromStr for ObjectId {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self> {
        let parts = s
            .split('.')
            .map(|part| part.parse::<u64>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| CodecError::Decode(format!("invalid object id: {:?}", s)))?;

        match parts.as_slice() {
            [space, type_id, instance] => Ok(Self::new(*space, *type_id, *instance)),
            _ => Err(CodecError::Decode(format!("invalid object id: {:?}", s))),
        }
    }
}

impl Encode for ObjectId {
    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
        RollingEncoder::new(enc)
            .encode_uvarint(self.space)
            .encode_uvarint(self.instance)
            .finish()
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
