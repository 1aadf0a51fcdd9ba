//! Signature verification.
//!
//! The engine never touches key material directly; it asks a
//! [`SignatureVerifier`]. Callers that already checked signatures (or tests
//! that do not care) can swap the verifier or pass `NO_CHECK_SIGN`.

use newcoin_crypto::{PublicKey, Signature};
use tracing::trace;

use crate::frame::Transaction;

/// Checks transaction signatures and generator proofs.
pub trait SignatureVerifier: Send + Sync {
    /// Whether the transaction carries a valid signature by its signing key.
    fn verify_transaction(&self, tx: &Transaction) -> bool;

    /// Whether `signature` by `key` covers `message`.
    fn verify_proof(&self, key: &PublicKey, message: &[u8], signature: &Signature) -> bool;
}

/// Ed25519 verification over the transaction's signing hash.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Verifier;

impl SignatureVerifier for Ed25519Verifier {
    fn verify_transaction(&self, tx: &Transaction) -> bool {
        let Some(key) = tx.signing_pub_key else {
            return false;
        };
        if tx.signature.is_empty() {
            return false;
        }
        match tx.signing_hash() {
            Ok(hash) => self.verify_proof(&key, hash.as_bytes(), &tx.signature),
            Err(err) => {
                trace!(error = %err, "Signing hash unavailable");
                false
            }
        }
    }

    fn verify_proof(&self, key: &PublicKey, message: &[u8], signature: &Signature) -> bool {
        key.verify(message, signature).is_ok()
    }
}
