//! Ed25519 keys and signatures.
//!
//! Keys and signatures are hex strings in JSON and raw bytes in the binary
//! encoding that transaction ids are hashed over.
//!
//! ```
//! use newcoin_crypto::SecretKey;
//!
//! let key = SecretKey::from_seed(&[7u8; 32]);
//! let signature = key.sign(b"message");
//! assert!(key.public_key().verify(b"message", &signature).is_ok());
//! ```

use std::fmt;

use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use newcoin_common::AccountId;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CryptoError;
use crate::hash::account_id_from_key_bytes;

fn fixed<const N: usize>(bytes: &[u8]) -> Result<[u8; N], CryptoError> {
    bytes.try_into().map_err(|_| CryptoError::InvalidLength {
        expected: N,
        got: bytes.len(),
    })
}

fn fixed_hex<const N: usize>(text: &str) -> Result<[u8; N], CryptoError> {
    let bytes = hex::decode(text).map_err(|_| CryptoError::InvalidHex)?;
    fixed(&bytes)
}

/// The key a master or regular key pair verifies with.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey(VerifyingKey);

impl PublicKey {
    /// Fails with [`CryptoError::InvalidPublicKey`] off the curve.
    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self, CryptoError> {
        VerifyingKey::from_bytes(bytes)
            .map(Self)
            .map_err(|_| CryptoError::InvalidPublicKey)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        Self::from_bytes(&fixed(bytes)?)
    }

    pub fn from_hex(text: &str) -> Result<Self, CryptoError> {
        Self::from_bytes(&fixed_hex(text)?)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_bytes()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.as_bytes())
    }

    /// The account this key controls as a master key.
    pub fn account_id(&self) -> AccountId {
        account_id_from_key_bytes(self.as_bytes())
    }

    pub fn verify(&self, message: &[u8], signature: &Signature) -> Result<(), CryptoError> {
        let signature = ed25519_dalek::Signature::from_bytes(&signature.0);
        self.0
            .verify(message, &signature)
            .map_err(|_| CryptoError::InvalidSignature)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PublicKey").field(&self.to_hex()).finish()
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_bytes(self.as_bytes(), serializer)
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Self::from_slice(&deserialize_bytes(deserializer)?).map_err(de::Error::custom)
    }
}

/// A signing key derived from a 32-byte seed.
///
/// Equal seeds give equal keys. `Debug` never prints the seed.
#[derive(Clone)]
pub struct SecretKey(SigningKey);

impl SecretKey {
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self(SigningKey::from_bytes(seed))
    }

    pub fn from_hex(text: &str) -> Result<Self, CryptoError> {
        Ok(Self::from_seed(&fixed_hex(text)?))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_bytes()
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.0.verifying_key())
    }

    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature(self.0.sign(message).to_bytes())
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(..)")
    }
}

/// Raw Ed25519 signature bytes.
///
/// Nothing is checked on construction. All zeroes ([`Signature::EMPTY`], the
/// default) marks an unsigned transaction and never verifies.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature(pub [u8; 64]);

impl Signature {
    pub const EMPTY: Self = Self([0u8; 64]);

    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        fixed(bytes).map(Self)
    }

    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }
}

impl Default for Signature {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("Signature(empty)");
        }
        write!(f, "Signature({}..)", hex::encode(&self.0[..6]))
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_bytes(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Self::from_slice(&deserialize_bytes(deserializer)?).map_err(de::Error::custom)
    }
}

fn serialize_bytes<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    if serializer.is_human_readable() {
        serializer.serialize_str(&hex::encode(bytes))
    } else {
        serializer.serialize_bytes(bytes)
    }
}

fn deserialize_bytes<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
    if deserializer.is_human_readable() {
        let text = String::deserialize(deserializer)?;
        hex::decode(text).map_err(de::Error::custom)
    } else {
        Vec::<u8>::deserialize(deserializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_and_verify() {
        let key = SecretKey::from_seed(&[4u8; 32]);
        let public = key.public_key();
        let signature = key.sign(b"payment");

        assert!(public.verify(b"payment", &signature).is_ok());
        assert_eq!(
            public.verify(b"payments", &signature),
            Err(CryptoError::InvalidSignature)
        );
        assert!(public.verify(b"payment", &Signature::EMPTY).is_err());
        let other = SecretKey::from_seed(&[5u8; 32]).public_key();
        assert!(other.verify(b"payment", &signature).is_err());
    }

    #[test]
    fn test_seed_determines_everything() {
        let a = SecretKey::from_seed(&[9u8; 32]);
        let b = a.clone();
        assert_eq!(a.public_key().account_id(), b.public_key().account_id());
        assert_eq!(a.sign(b"m"), b.sign(b"m"));
        assert_eq!(a.as_bytes(), &[9u8; 32]);
    }

    #[test]
    fn test_hex_forms() {
        let public = SecretKey::from_seed(&[3u8; 32]).public_key();
        assert_eq!(PublicKey::from_hex(&public.to_hex()).unwrap(), public);
        assert_eq!(
            PublicKey::from_slice(&[0u8; 5]).unwrap_err(),
            CryptoError::InvalidLength { expected: 32, got: 5 }
        );
        assert_eq!(SecretKey::from_hex("zz").unwrap_err(), CryptoError::InvalidHex);
        let seed = SecretKey::from_hex(&hex::encode([3u8; 32])).unwrap();
        assert_eq!(seed.public_key(), public);
    }

    #[test]
    fn test_json_uses_hex() {
        let key = SecretKey::from_seed(&[6u8; 32]);
        let signature = key.sign(b"x");
        let json = serde_json::to_string(&(key.public_key(), signature)).unwrap();
        assert!(json.contains(&key.public_key().to_hex()));
        let back: (PublicKey, Signature) = serde_json::from_str(&json).unwrap();
        assert_eq!(back, (key.public_key(), signature));
    }

    #[test]
    fn test_debug_hides_seed() {
        let key = SecretKey::from_seed(&[5u8; 32]);
        assert_eq!(format!("{:?}", key), "SecretKey(..)");
        assert_eq!(format!("{:?}", Signature::EMPTY), "Signature(empty)");
    }
}
