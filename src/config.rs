//! Chain configuration
//!
//! Holds the per-chain constants the codecs need: the public key address
//! prefix and the chain id mixed into every signing digest.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Address prefix used by BitShares mainnet keys
pub const DEFAULT_ADDRESS_PREFIX: &str = "BTS";

/// BitShares mainnet chain id
pub const BITSHARES_CHAIN_ID: &str =
    "4018d7844c78f6a6c41c6a552b898022310fc5dec06da467ee7905a8dad512c8";

/// Per-chain codec configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Prefix every public key string must start with
    #[serde(default = "default_address_prefix")]
    pub address_prefix: String,
    /// Hex-encoded chain id
    #[serde(default = "default_chain_id")]
    pub chain_id: String,
}

fn default_address_prefix() -> String {
    DEFAULT_ADDRESS_PREFIX.to_string()
}

fn default_chain_id() -> String {
    BITSHARES_CHAIN_ID.to_string()
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            address_prefix: default_address_prefix(),
            chain_id: default_chain_id(),
        }
    }
}

impl ChainConfig {
    /// Use a different public key prefix
    pub fn with_address_prefix(mut self, prefix: &str) -> Self {
        self.address_prefix = prefix.to_string();
        self
    }

    /// Use a different chain id
    pub fn with_chain_id(mut self, chain_id: &str) -> Self {
        self.chain_id = chain_id.to_string();
        self
    }

    /// Raw chain id bytes, as prepended to the signing digest input
    pub fn chain_id_bytes(&self) -> Result<Vec<u8>> {
        Ok(hex::decode(&self.chain_id)?)
    }
}
