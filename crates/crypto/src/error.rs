use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Bytes that are not a point on the curve.
    #[error("not an ed25519 public key")]
    InvalidPublicKey,

    #[error("signature does not verify")]
    InvalidSignature,

    #[error("malformed hex")]
    InvalidHex,

    #[error("expected {expected} bytes, found {got}")]
    InvalidLength { expected: usize, got: usize },
}
