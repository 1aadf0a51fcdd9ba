//! Transaction engine for newcoin.
//!
//! This crate decides, deterministically, whether a transaction applies to a
//! ledger and what it changes:
//!
//! - [`TransactionEngine`]: resolves the target ledger, runs the common
//!   checks (signature, sequence, fee, authorisation), dispatches to the
//!   type handler and commits or discards the staged changes as a unit
//! - [`TransactionEngineResult`]: the classified outcome, banded into
//!   malformed, ledger-rejected, engine-fault, success and retriable
//! - [`ChangeSet`] and [`LedgerStateManager`]: the staging area handlers
//!   read through and write to
//! - [`directory`]: paged ownership and order-book directories
//! - [`operations`]: one handler per transaction type
//!
//! # Example
//!
//! ```
//! use newcoin_common::{AccountId, Config};
//! use newcoin_crypto::SecretKey;
//! use newcoin_ledger::{Amount, Ledger};
//! use newcoin_tx::{
//!     PaymentFlags, PaymentTx, Ter, Transaction, TransactionEngine, TransactionEngineParams,
//!     TransactionKind,
//! };
//!
//! let key = SecretKey::from_seed(&[1u8; 32]);
//! let master = key.public_key().account_id();
//! let mut ledger = Ledger::genesis(master, 100_000_000);
//! let engine = TransactionEngine::new(Config::default()).unwrap();
//!
//! let payment = PaymentTx {
//!     destination: AccountId([2u8; 20]),
//!     amount: Amount::native(50_000),
//!     send_max: None,
//!     paths: None,
//!     flags: PaymentFlags::CREATE_ACCOUNT,
//! };
//! let tx = Transaction::new(master, 1, 1_000, TransactionKind::Payment(payment))
//!     .signed(&key)
//!     .unwrap();
//!
//! let result = engine.apply_transaction(&tx, TransactionEngineParams::NONE, &mut ledger);
//! assert_eq!(result, Ter::Success);
//! assert_eq!(result.token(), "terSUCCESS");
//! ```

mod change_set;
pub mod directory;
mod engine;
mod error;
mod frame;
pub mod operations;
mod params;
mod pathfind;
mod result;
mod signature_checker;
mod state;
pub mod validation;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use change_set::{AffectedEntry, ChangeSet, EntryAction};
pub use engine::TransactionEngine;
pub use error::{Result, TxError};
pub use frame::{
    AccountSetFlags, AccountSetTx, ClaimTx, CreditSetTx, DeleteTx, GeneratorProof, InvoiceTx,
    NicknameFlags, NicknameSetTx, OfferFlags, OfferTx, PasswordFundTx, PasswordSetTx, Path,
    PaymentFlags, PaymentTx, StoreTx, TakeTx, Transaction, TransactionKind, TransactionType,
    TransitSetTx, WalletAddTx, PREFIX_TX_ID, PREFIX_TX_SIGN,
};
pub use params::TransactionEngineParams;
pub use pathfind::{NoPathFinder, PathFinder, TrustGraphPathFinder};
pub use result::{
    classify, Fault, Malformed, Rejected, ResultBand, Retry, Ter, TerResult,
    TransactionEngineResult,
};
pub use signature_checker::{Ed25519Verifier, SignatureVerifier};
pub use state::LedgerStateManager;
pub use validation::LedgerContext;
