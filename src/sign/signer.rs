//! Signing digests and signature attachment
//!
//! The digest signed for a transaction is SHA-256 over the chain id bytes
//! followed by the canonical transaction bytes. The transaction id is the
//! first 20 bytes of SHA-256 over the transaction bytes alone.

use crate::config::ChainConfig;
use crate::crypto::{recover_public_key, sha256, KeyPair, PublicKey};
use crate::error::Result;
use crate::types::Transaction;

/// Length in bytes of a transaction id
pub const TRANSACTION_ID_LEN: usize = 20;

/// Anything that can sign a 32-byte digest
pub trait Signer {
    fn sign_digest(&self, digest: &[u8; 32]) -> Result<Vec<u8>>;
}

impl Signer for KeyPair {
    fn sign_digest(&self, digest: &[u8; 32]) -> Result<Vec<u8>> {
        Ok(self.sign_compact(digest)?.to_vec())
    }
}

/// Hex transaction id
pub fn transaction_id(tx: &Transaction) -> Result<String> {
    let hash = sha256(&tx.to_bytes()?);
    Ok(hex::encode(&hash[..TRANSACTION_ID_LEN]))
}

/// Signs transactions for one chain
#[derive(Debug, Clone, Default)]
pub struct TransactionSigner {
    config: ChainConfig,
}

impl TransactionSigner {
    pub fn new(config: ChainConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// Digest that signers sign for `tx`
    pub fn digest(&self, tx: &Transaction) -> Result<[u8; 32]> {
        let mut data = self.config.chain_id_bytes()?;
        data.extend_from_slice(&tx.to_bytes()?);
        Ok(sha256(&data))
    }

    /// Sign `tx` with every signer and attach the hex signatures
    ///
    /// Nothing is attached unless all signers succeed.
    pub fn sign(&self, tx: &mut Transaction, signers: &[&dyn Signer]) -> Result<()> {
        let digest = self.digest(tx)?;
        let signatures = signers
            .iter()
            .map(|signer| signer.sign_digest(&digest).map(hex::encode))
            .collect::<Result<Vec<_>>>()?;

        for signature in signatures {
            tx.attach_signature(signature);
        }
        log::debug!(
            "Signed transaction, {} signatures attached",
            tx.signatures.len()
        );
        Ok(())
    }

    /// Keys that produced the attached signatures, in signature order
    pub fn recover_signers(&self, tx: &Transaction) -> Result<Vec<PublicKey>> {
        let digest = self.digest(tx)?;
        tx.signatures
            .iter()
            .map(|signature| {
                let raw = hex::decode(signature)?;
                recover_public_key(&digest, &raw, &self.config.address_prefix)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{is_canonical, COMPACT_SIGNATURE_LEN};
    use crate::error::CodecError;
    use crate::types::{AssetAmount, ObjectId, Time, TransferOperation};

    struct FailingSigner;

    impl Signer for FailingSigner {
        fn sign_digest(&self, _digest: &[u8; 32]) -> Result<Vec<u8>> {
            Err(CodecError::InvalidPrivateKey("hardware key unavailable".to_string()))
        }
    }

    fn sample_tx() -> Transaction {
        let core = ObjectId::new(1, 3, 0);
        let mut tx = Transaction::new(7, 0x0403_0201, Time::from_unix(1_600_000_000).unwrap());
        tx.push_operation(TransferOperation::new(
            AssetAmount::new("1", core),
            ObjectId::new(1, 2, 5),
            ObjectId::new(1, 2, 6),
            AssetAmount::new("100", core),
        ));
        tx
    }

    #[test]
    fn test_digest_depends_on_chain_id() {
        let tx = sample_tx();
        let mainnet = TransactionSigner::default();
        let testnet = TransactionSigner::new(ChainConfig::default().with_chain_id(&"11".repeat(32)));
        assert_ne!(mainnet.digest(&tx).unwrap(), testnet.digest(&tx).unwrap());
    }

    #[test]
    fn test_digest_requires_operations() {
        let tx = Transaction::new(1, 1, Time::from_unix(0).unwrap());
        assert!(matches!(
            TransactionSigner::default().digest(&tx),
            Err(CodecError::NoOperation)
        ));
    }

    #[test]
    fn test_sign_and_recover() {
        let alice = KeyPair::generate();
        let bob = KeyPair::generate();
        let signer = TransactionSigner::default();

        let mut tx = sample_tx();
        signer.sign(&mut tx, &[&alice, &bob]).unwrap();
        assert_eq!(tx.signatures.len(), 2);
        assert!(tx.signatures.iter().all(|s| s.len() == 130));

        let recovered = signer.recover_signers(&tx).unwrap();
        assert_eq!(recovered, vec![alice.public_key("BTS"), bob.public_key("BTS")]);
        assert_eq!(recovered[0].prefix(), "BTS");
    }

    #[test]
    fn test_attached_signatures_are_canonical() {
        let signer = TransactionSigner::default();
        let keys: Vec<KeyPair> = (0..20).map(|_| KeyPair::generate()).collect();
        let signers: Vec<&dyn Signer> = keys.iter().map(|k| k as &dyn Signer).collect();

        let mut tx = sample_tx();
        signer.sign(&mut tx, &signers).unwrap();
        for signature in &tx.signatures {
            let bytes: [u8; COMPACT_SIGNATURE_LEN] =
                hex::decode(signature).unwrap().try_into().unwrap();
            assert!(is_canonical(&bytes));
        }
    }

    #[test]
    fn test_failed_signer_attaches_nothing() {
        let alice = KeyPair::generate();
        let mut tx = sample_tx();
        let result = TransactionSigner::default().sign(&mut tx, &[&alice, &FailingSigner]);
        assert!(result.is_err());
        assert!(tx.signatures.is_empty());
    }

    #[test]
    fn test_transaction_id() {
        let tx = sample_tx();
        let id = transaction_id(&tx).unwrap();
        assert_eq!(id.len(), TRANSACTION_ID_LEN * 2);
        assert_eq!(id, transaction_id(&sample_tx()).unwrap());
    }
}
