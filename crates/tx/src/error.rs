//! Error types for the transaction engine.
//!
//! These are operational errors, raised outside the agreement-critical
//! apply path. Apply outcomes are [`crate::TransactionEngineResult`] values.

use thiserror::Error;

/// Errors that can occur around transaction processing.
#[derive(Debug, Error)]
pub enum TxError {
    /// Transaction could not be encoded for hashing.
    #[error("transaction encoding failed: {0}")]
    Encoding(#[from] bincode::Error),

    /// Crypto error.
    #[error("crypto error: {0}")]
    Crypto(#[from] newcoin_crypto::CryptoError),

    /// Ledger error.
    #[error("ledger error: {0}")]
    Ledger(#[from] newcoin_ledger::LedgerError),

    /// A staged change contradicts an earlier one for the same entry.
    #[error("invalid change for entry {index}: {from} then {to}")]
    InvalidTransition {
        index: newcoin_common::Hash256,
        from: &'static str,
        to: &'static str,
    },

    /// Unknown transaction type name.
    #[error("unknown transaction type: {0}")]
    UnknownType(String),
}

/// Result type for transaction operations.
pub type Result<T> = std::result::Result<T, TxError>;
