//! Fundamental identifier types.
//!
//! - [`Hash256`]: 256-bit ledger index / transaction id.
//! - [`AccountId`]: 160-bit account identifier.
//! - [`Currency`]: 160-bit currency code, all-zero for the native currency.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha512};
use std::fmt;

/// Fixed-width byte identifiers: hex in text, raw bytes on the wire.
macro_rules! byte_id {
    ($name:ident, $len:literal) => {
        impl $name {
            pub const ZERO: Self = Self([0u8; $len]);

            pub fn from_bytes(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }

            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            pub fn is_zero(&self) -> bool {
                *self == Self::ZERO
            }

            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }

            /// Parses hex of exactly the identifier's width.
            pub fn from_hex(text: &str) -> std::result::Result<Self, hex::FromHexError> {
                let mut bytes = [0u8; $len];
                hex::decode_to_slice(text, &mut bytes)?;
                Ok(Self(bytes))
            }
        }

        impl From<[u8; $len]> for $name {
            fn from(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($name)).field(&self.to_hex()).finish()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.to_hex())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serialize_fixed(&self.0, serializer)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                deserialize_fixed(deserializer).map(Self)
            }
        }
    };
}

/// A 256-bit hash.
///
/// Every ledger entry is keyed by one of these, and transaction ids are
/// computed into one. Ordering is lexicographic over the bytes, which is what
/// makes `BTreeMap<Hash256, _>` iteration deterministic across nodes.
///
/// ```rust
/// use newcoin_common::Hash256;
///
/// let id = Hash256::sha512_half(b"a transaction");
/// assert_eq!(Hash256::from_hex(&id.to_hex()), Ok(id));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Hash256(pub [u8; 32]);

byte_id!(Hash256, 32);

impl Hash256 {
    /// First half of the SHA-512 digest of `data`.
    pub fn sha512_half(data: &[u8]) -> Self {
        Self::sha512_half_multi(&[data])
    }

    /// First half of the SHA-512 digest of the concatenated chunks.
    pub fn sha512_half_multi(chunks: &[&[u8]]) -> Self {
        let mut hasher = Sha512::new();
        for chunk in chunks {
            hasher.update(chunk);
        }
        let digest = hasher.finalize();
        let mut half = [0u8; 32];
        half.copy_from_slice(&digest[..32]);
        Self(half)
    }
}

/// A 160-bit account identifier.
///
/// Derived from a public key by the crypto crate. The all-zero id never names
/// a real account and is used as the issuer of native amounts.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct AccountId(pub [u8; 20]);

byte_id!(AccountId, 20);
/// A 160-bit currency code.
///
/// Three-letter codes are stored in bytes 12..15, the remaining bytes zero.
/// The all-zero code is the native currency, XNS. Human-readable formats
/// carry the code string, others the raw bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Currency(pub [u8; 20]);

impl Currency {
    /// The native currency.
    pub const XNS: Self = Self([0u8; 20]);

    /// Builds a currency from an ASCII code such as `"USD"`.
    ///
    /// Returns `None` for anything but three printable ASCII characters, and
    /// for `"XNS"`, which is only ever represented by the zero code.
    pub fn from_code(code: &str) -> Option<Self> {
        let bytes = code.as_bytes();
        if bytes.len() != 3 || !bytes.iter().all(|b| b.is_ascii_graphic()) || code == "XNS" {
            return None;
        }
        let mut arr = [0u8; 20];
        arr[12..15].copy_from_slice(bytes);
        Some(Self(arr))
    }

    /// Returns `true` for the native currency.
    pub fn is_native(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// Human-readable code.
    pub fn code(&self) -> String {
        if self.is_native() {
            return "XNS".to_string();
        }
        let standard = self.0[..12].iter().all(|b| *b == 0) && self.0[15..].iter().all(|b| *b == 0);
        if standard {
            String::from_utf8_lossy(&self.0[12..15]).into_owned()
        } else {
            hex::encode(self.0)
        }
    }

    /// Parses the output of [`Currency::code`].
    pub fn from_display(s: &str) -> Option<Self> {
        if s == "XNS" {
            return Some(Self::XNS);
        }
        if s.len() == 40 {
            let bytes = hex::decode(s).ok()?;
            let mut arr = [0u8; 20];
            arr.copy_from_slice(&bytes);
            return Some(Self(arr));
        }
        Self::from_code(s)
    }
}

impl fmt::Debug for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Currency({})", self.code())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

fn serialize_fixed<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    if serializer.is_human_readable() {
        serializer.serialize_str(&hex::encode(bytes))
    } else {
        serializer.serialize_bytes(bytes)
    }
}

fn deserialize_fixed<'de, D: Deserializer<'de>, const N: usize>(
    deserializer: D,
) -> Result<[u8; N], D::Error> {
    let bytes = if deserializer.is_human_readable() {
        let s = String::deserialize(deserializer)?;
        hex::decode(s).map_err(de::Error::custom)?
    } else {
        Vec::<u8>::deserialize(deserializer)?
    };
    bytes
        .as_slice()
        .try_into()
        .map_err(|_| de::Error::invalid_length(bytes.len(), &"a fixed-size byte string"))
}

impl Serialize for Currency {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.code())
        } else {
            serializer.serialize_bytes(&self.0)
        }
    }
}

impl<'de> Deserialize<'de> for Currency {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            Self::from_display(&s)
                .ok_or_else(|| de::Error::custom(format!("invalid currency code {:?}", s)))
        } else {
            deserialize_fixed(deserializer).map(Self)
        }
    }
}
