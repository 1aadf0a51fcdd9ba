//! Hashing utilities.

use newcoin_common::{AccountId, Hash256};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// Compute SHA-256 hash of data.
pub fn sha256(data: &[u8]) -> Hash256 {
    let result = Sha256::digest(data);
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&result);
    Hash256(bytes)
}

/// First half of SHA-512, the hash used for ledger indexes and transaction ids.
pub fn sha512_half(data: &[u8]) -> Hash256 {
    Hash256::sha512_half(data)
}

/// Derives the account id for a public key: `RIPEMD160(SHA256(key))`.
pub fn account_id_from_key_bytes(key: &[u8]) -> AccountId {
    let inner = Sha256::digest(key);
    let outer = Ripemd160::digest(inner);
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&outer);
    AccountId(bytes)
}
