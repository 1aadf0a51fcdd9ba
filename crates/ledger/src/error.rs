use newcoin_common::Hash256;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    /// The index holds an entry of another kind.
    #[error("entry {index} is a {actual}, expected {expected}")]
    WrongEntryType {
        index: Hash256,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("ledger {current} has no successor")]
    InvalidSequence { current: u32 },

    #[error("native coin total out of range")]
    TotalOverflow,

    #[error("entry encoding: {0}")]
    Serialization(#[from] bincode::Error),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
