//! Common error types for newcoin.

use thiserror::Error;

/// Common result type for newcoin operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for newcoin.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Logging could not be initialised.
    #[error("Logging error: {0}")]
    Logging(String),

    /// Invalid data.
    #[error("Invalid data: {0}")]
    InvalidData(String),
}
