//! Public key codec and key management
//!
//! Public keys travel as `<prefix><base58(compressed point || checksum)>`,
//! where the checksum is the first four bytes of RIPEMD-160 over the
//! compressed point. Inside a transaction only the 33 point bytes are
//! written.
//!
//! Private keys use the WIF format and signatures are 65-byte compact
//! recoverable signatures over the secp256k1 curve.

use std::fmt;
use std::str::FromStr;

use rand::rngs::OsRng;
use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{Message, Secp256k1, SecretKey};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::hash::{double_sha256, ripemd160_checksum, sha256, CHECKSUM_LEN};
use crate::config::DEFAULT_ADDRESS_PREFIX;
use crate::encoding::{Encode, Encoder};
use crate::error::{CodecError, Result};

/// Size of a compressed secp256k1 point
pub const COMPRESSED_KEY_LEN: usize = secp256k1::constants::PUBLIC_KEY_SIZE;

/// Bit size of the secp256k1 field
pub const CURVE_BIT_SIZE: usize = 256;

/// Recovery header byte followed by r and s
pub const COMPACT_SIGNATURE_LEN: usize = 65;

/// Version byte of WIF-encoded private keys
const WIF_VERSION: u8 = 0x80;

/// Size of a raw secp256k1 secret key
const SECRET_KEY_LEN: usize = secp256k1::constants::SECRET_KEY_SIZE;

/// Lowest valid compact signature header (uncompressed key, recid 0)
const COMPACT_HEADER_MIN: u8 = 27;

/// Highest valid compact signature header (compressed key, recid 3)
const COMPACT_HEADER_MAX: u8 = COMPACT_HEADER_MIN + 4 + 3;

/// Header offset for compact signatures made with a compressed key
const COMPACT_HEADER_BASE: u8 = COMPACT_HEADER_MIN + 4;

// =============================================================================
// Public Key
// =============================================================================

/// A validated secp256k1 public key together with its chain prefix
#[derive(Clone, Debug)]
pub struct PublicKey {
    key: secp256k1::PublicKey,
    prefix: String,
    checksum: [u8; CHECKSUM_LEN],
}

impl PublicKey {
    /// Parse and verify a prefixed key string
    pub fn parse(text: &str, expected_prefix: &str) -> Result<Self> {
        let actual = text.get(..expected_prefix.len());
        if actual != Some(expected_prefix) {
            log::debug!(
                "Rejected public key {}: expected prefix {}",
                text,
                expected_prefix
            );
            return Err(CodecError::PrefixMismatch {
                expected: expected_prefix.to_string(),
                actual: actual.unwrap_or(text).to_string(),
            });
        }

        let decoded = bs58::decode(&text[expected_prefix.len()..]).into_vec()?;
        if decoded.len() < CHECKSUM_LEN + 1 {
            log::debug!(
                "Rejected public key {}: {} decoded bytes is too short",
                text,
                decoded.len()
            );
            return Err(CodecError::InvalidPublicKey(format!(
                "decoded key is {} bytes, need at least {}",
                decoded.len(),
                CHECKSUM_LEN + 1
            )));
        }

        let (key_bytes, embedded) = decoded.split_at(decoded.len() - CHECKSUM_LEN);
        let computed = ripemd160_checksum(key_bytes);
        if embedded != &computed[..] {
            log::debug!("Rejected public key {}: checksum mismatch", text);
            return Err(CodecError::InvalidPublicKey(format!(
                "checksum mismatch: embedded {}, computed {}",
                hex::encode(embedded),
                hex::encode(computed)
            )));
        }

        if key_bytes.len() != COMPRESSED_KEY_LEN {
            log::debug!(
                "Rejected public key {}: {} key bytes, not a compressed point",
                text,
                key_bytes.len()
            );
            return Err(CodecError::InvalidPublicKey(format!(
                "expected {} compressed key bytes, got {}",
                COMPRESSED_KEY_LEN,
                key_bytes.len()
            )));
        }
        let key = secp256k1::PublicKey::from_slice(key_bytes).map_err(|e| {
            log::debug!("Rejected public key {}: {}", text, e);
            CodecError::InvalidPublicKey(e.to_string())
        })?;

        Ok(Self {
            key,
            prefix: expected_prefix.to_string(),
            checksum: computed,
        })
    }

    /// Wrap an already-valid curve point
    pub fn from_secp(key: secp256k1::PublicKey, prefix: &str) -> Self {
        Self {
            checksum: ripemd160_checksum(&key.serialize()),
            key,
            prefix: prefix.to_string(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn checksum(&self) -> [u8; CHECKSUM_LEN] {
        self.checksum
    }

    /// Compressed point bytes, as written into transactions
    pub fn to_bytes(&self) -> [u8; COMPRESSED_KEY_LEN] {
        self.key.serialize()
    }

    pub fn as_secp(&self) -> &secp256k1::PublicKey {
        &self.key
    }

    /// Maximum length of a shared key this key can take part in
    pub fn max_shared_key_length(&self) -> usize {
        (CURVE_BIT_SIZE + 7) / 8
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut payload = self.to_bytes().to_vec();
        payload.extend_from_slice(&self.checksum);
        write!(f, "{}{}", self.prefix, bs58::encode(payload).into_string())
    }
}

/// Parses with the default BitShares prefix
impl FromStr for PublicKey {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s, DEFAULT_ADDRESS_PREFIX)
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for PublicKey {}

impl Encode for PublicKey {
    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
        enc.write_raw(&self.to_bytes())
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Key Pair
// =============================================================================

/// A secp256k1 signing key with its public point
#[derive(Clone)]
pub struct KeyPair {
    secret: SecretKey,
    point: secp256k1::PublicKey,
}

impl KeyPair {
    /// Fresh random key from the OS generator
    pub fn generate() -> Self {
        Self::from_secret(SecretKey::new(&mut OsRng))
    }

    /// Key from 32 bytes of raw secret material
    pub fn from_secret_bytes(bytes: &[u8]) -> Result<Self> {
        SecretKey::from_slice(bytes)
            .map(Self::from_secret)
            .map_err(|e| CodecError::InvalidPrivateKey(e.to_string()))
    }

    /// Parse a WIF private key: base58 of `0x80 || secret || checksum`,
    /// checksum being the first four bytes of double SHA-256
    pub fn from_wif(wif: &str) -> Result<Self> {
        let raw = bs58::decode(wif)
            .into_vec()
            .map_err(|e| CodecError::InvalidPrivateKey(e.to_string()))?;
        if raw.len() != 1 + SECRET_KEY_LEN + CHECKSUM_LEN || raw[0] != WIF_VERSION {
            return Err(CodecError::InvalidPrivateKey(
                "not a WIF private key".to_string(),
            ));
        }

        let (payload, checksum) = raw.split_at(1 + SECRET_KEY_LEN);
        if double_sha256(payload)[..CHECKSUM_LEN] != *checksum {
            return Err(CodecError::InvalidPrivateKey(
                "WIF checksum mismatch".to_string(),
            ));
        }
        Self::from_secret_bytes(&payload[1..])
    }

    pub fn to_wif(&self) -> String {
        let mut raw = Vec::with_capacity(1 + SECRET_KEY_LEN + CHECKSUM_LEN);
        raw.push(WIF_VERSION);
        raw.extend_from_slice(&self.secret.secret_bytes());
        let checksum = double_sha256(&raw);
        raw.extend_from_slice(&checksum[..CHECKSUM_LEN]);
        bs58::encode(raw).into_string()
    }

    /// The public half, tagged with a chain prefix
    pub fn public_key(&self, prefix: &str) -> PublicKey {
        PublicKey::from_secp(self.point, prefix)
    }

    /// Sign a 32-byte digest, producing a canonical compact recoverable
    /// signature
    ///
    /// Nodes only accept signatures whose r and s pass [`is_canonical`].
    /// Each attempt feeds `sha256(digest || attempt)` as extra nonce data,
    /// so a rejected signature is replaced by a fresh deterministic one.
    pub fn sign_compact(&self, digest: &[u8; 32]) -> Result<[u8; COMPACT_SIGNATURE_LEN]> {
        let secp = Secp256k1::signing_only();
        let message = Message::from_digest_slice(digest)?;

        let mut attempt: u64 = 0;
        loop {
            let mut seed = digest.to_vec();
            seed.extend_from_slice(&attempt.to_le_bytes());
            let nonce = sha256(&seed);

            let (recovery_id, rs) = secp
                .sign_ecdsa_recoverable_with_noncedata(&message, &self.secret, &nonce)
                .serialize_compact();

            let mut signature = [0u8; COMPACT_SIGNATURE_LEN];
            signature[0] = COMPACT_HEADER_BASE + recovery_id.to_i32() as u8;
            signature[1..].copy_from_slice(&rs);

            if is_canonical(&signature) {
                if attempt > 0 {
                    log::trace!("Canonical signature after {} retries", attempt);
                }
                return Ok(signature);
            }
            attempt += 1;
        }
    }

    fn from_secret(secret: SecretKey) -> Self {
        let point = secret.public_key(&Secp256k1::signing_only());
        Self { secret, point }
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key(DEFAULT_ADDRESS_PREFIX).to_string())
            .finish_non_exhaustive()
    }
}

/// Graphene's canonical form for compact signatures
///
/// Neither r nor s may have the high bit set, and neither may start with a
/// zero byte unless the following byte needs it to stay positive.
pub fn is_canonical(signature: &[u8; COMPACT_SIGNATURE_LEN]) -> bool {
    let (r, s) = (&signature[1..33], &signature[33..]);
    let minimal = |half: &[u8]| half[0] & 0x80 == 0 && !(half[0] == 0 && half[1] & 0x80 == 0);
    minimal(r) && minimal(s)
}

/// Recover the signing key from a compact signature over `digest`
pub fn recover_public_key(digest: &[u8; 32], signature: &[u8], prefix: &str) -> Result<PublicKey> {
    if signature.len() != COMPACT_SIGNATURE_LEN {
        return Err(CodecError::Decode(format!(
            "compact signature must be {} bytes, got {}",
            COMPACT_SIGNATURE_LEN,
            signature.len()
        )));
    }

    let header = signature[0];
    if !(COMPACT_HEADER_MIN..=COMPACT_HEADER_MAX).contains(&header) {
        return Err(CodecError::Decode(format!(
            "compact signature header {} outside {}..={}",
            header, COMPACT_HEADER_MIN, COMPACT_HEADER_MAX
        )));
    }

    let recovery_id = RecoveryId::from_i32(i32::from((header - COMPACT_HEADER_MIN) & 3))?;
    let signature = RecoverableSignature::from_compact(&signature[1..], recovery_id)?;
    let message = Message::from_digest_slice(digest)?;
    let key = Secp256k1::verification_only().recover_ecdsa(&message, &signature)?;
    Ok(PublicKey::from_secp(key, prefix))
}
