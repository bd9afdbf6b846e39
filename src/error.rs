//! Error types shared by every codec in the crate

use thiserror::Error;

/// Errors produced while encoding, decoding or signing chain data
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Decode error: {0}")]
    Decode(String),
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),
    #[error("Public key prefix mismatch: expected {expected:?}, got {actual:?}")]
    PrefixMismatch { expected: String, actual: String },
    #[error("Invalid block ID: {0}")]
    InvalidBlockId(String),
    #[error("No operation specified")]
    NoOperation,
    #[error("Sink write error: {0}")]
    SinkWrite(#[from] std::io::Error),
    #[error("Timestamp {0} does not fit the wire format")]
    InvalidTimestamp(i64),
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),
    #[error("Unknown operation type {0}")]
    UnknownOperation(u64),
    #[error("Secp256k1 error: {0}")]
    Signing(#[from] secp256k1::Error),
}

impl From<serde_json::Error> for CodecError {
    fn from(err: serde_json::Error) -> Self {
        CodecError::Decode(err.to_string())
    }
}

impl From<hex::FromHexError> for CodecError {
    fn from(err: hex::FromHexError) -> Self {
        CodecError::Decode(format!("invalid hex: {}", err))
    }
}

impl From<bs58::decode::Error> for CodecError {
    fn from(err: bs58::decode::Error) -> Self {
        CodecError::Decode(format!("invalid base58: {}", err))
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, CodecError>;
