//! Ledger state for newcoin.
//!
//! - [`Ledger`]: an in-memory snapshot of entries keyed by 256-bit index,
//!   with the sequence number, coin total and the ids of applied
//!   transactions
//! - [`entries`]: the entry payloads (account roots, trust lines, offers,
//!   directory pages and the rest)
//! - [`index`]: derivation of entry indexes from identifying fields
//! - [`Amount`] and [`Issue`]: native and issued currency values
//!
//! # Example
//!
//! ```
//! use newcoin_common::AccountId;
//! use newcoin_ledger::{index, Ledger};
//!
//! let master = AccountId([1u8; 20]);
//! let ledger = Ledger::genesis(master, 100_000_000);
//! assert!(ledger.contains(&index::account_root(&master)));
//! assert_eq!(ledger.native_total().unwrap(), 100_000_000);
//! ```

mod amount;
pub mod entries;
mod error;
pub mod index;
mod ledger;

pub use amount::{Amount, Issue};
pub use entries::{
    AccountFlags, AccountRoot, DirectoryNode, EntryKind, GeneratorMap, Invoice, LedgerEntry,
    LedgerEntryData, Nickname, Offer, RippleState, StoreEntry,
};
pub use error::{LedgerError, Result};
pub use ledger::{Ledger, SharedLedger};
