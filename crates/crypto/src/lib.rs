//! Cryptographic primitives for newcoin.
//!
//! - **Ed25519 signatures**: [`SecretKey`], [`PublicKey`] and [`Signature`]
//! - **Hashing**: [`sha256`] and [`sha512_half`]
//! - **Account ids**: `RIPEMD160(SHA256(public key))` via
//!   [`account_id_from_key_bytes`] or [`PublicKey::account_id`]
//!
//! # Example
//!
//! ```
//! use newcoin_crypto::{sha512_half, SecretKey};
//!
//! let secret = SecretKey::from_seed(&[42u8; 32]);
//! let public = secret.public_key();
//!
//! let message = sha512_half(b"hello newcoin");
//! let signature = secret.sign(message.as_bytes());
//! assert!(public.verify(message.as_bytes(), &signature).is_ok());
//! ```

mod error;
mod hash;
mod keys;

pub use error::CryptoError;
pub use hash::*;
pub use keys::*;

pub use newcoin_common::{AccountId, Hash256};
