//! Ledger entry types.
//!
//! Every object in the ledger is a [`LedgerEntry`] keyed by a 256-bit index
//! (see [`crate::index`]). The payload is one of the [`LedgerEntryData`]
//! variants.

use bitflags::bitflags;
use newcoin_common::{AccountId, Currency, Hash256};
use serde::{Deserialize, Serialize};

use crate::amount::Amount;

bitflags! {
    /// Flags stored on an account root.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct AccountFlags: u32 {
        /// The free password reset has been used.
        const PASSWORD_SPENT = 0x0001;
        /// The account does not want to receive native payments.
        const DISALLOW_XNS = 0x0002;
    }
}

impl Default for AccountFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// The root entry of an account.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AccountRoot {
    pub account: AccountId,
    /// Native balance in drops.
    pub balance: i64,
    /// Next sequence number the account must use.
    pub sequence: u32,
    /// Number of entries in the account's owner directory.
    #[serde(default)]
    pub owner_count: u32,
    #[serde(default)]
    pub flags: AccountFlags,
    /// Regular key allowed to sign for the account. `Some` once claimed.
    #[serde(default)]
    pub authorized_key: Option<AccountId>,
    #[serde(default)]
    pub email_hash: Option<Hash256>,
    #[serde(default)]
    pub wallet_locator: Option<Hash256>,
    #[serde(default)]
    pub message_key: Option<Vec<u8>>,
    #[serde(default)]
    pub domain: Option<String>,
    /// Transfer rate charged when value ripples through this account,
    /// scaled by 1e9.
    #[serde(default)]
    pub transit_rate: Option<u32>,
    #[serde(default)]
    pub transit_start: Option<u32>,
    #[serde(default)]
    pub transit_expire: Option<u32>,
}

impl AccountRoot {
    /// A fresh account as created by a payment or wallet add.
    pub fn new(account: AccountId, balance: i64) -> Self {
        Self {
            account,
            balance,
            sequence: 1,
            ..Default::default()
        }
    }

    /// Whether the account has been claimed (has an authorised key).
    pub fn is_claimed(&self) -> bool {
        self.authorized_key.is_some()
    }

    /// The transfer rate in force at `ledger_seq`, if any.
    pub fn active_transit_rate(&self, ledger_seq: u32) -> Option<u32> {
        let rate = self.transit_rate?;
        if self.transit_start.is_some_and(|start| ledger_seq < start) {
            return None;
        }
        if self.transit_expire.is_some_and(|expire| ledger_seq >= expire) {
            return None;
        }
        Some(rate)
    }
}

/// A trust line between two accounts in one currency.
///
/// The two parties are ordered (`low < high`). `balance` is from the low
/// account's perspective: positive when the high account owes the low one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RippleState {
    pub low: AccountId,
    pub high: AccountId,
    pub currency: Currency,
    pub balance: i64,
    /// How much the low account is willing to be owed by the high one.
    pub low_limit: i64,
    /// How much the high account is willing to be owed by the low one.
    pub high_limit: i64,
    /// Page of the low account's owner directory that lists this line.
    pub low_node: u64,
    /// Page of the high account's owner directory that lists this line.
    pub high_node: u64,
}

impl RippleState {
    /// Whether `account` is one of the two parties.
    pub fn involves(&self, account: &AccountId) -> bool {
        self.low == *account || self.high == *account
    }

    /// The party that is not `account`.
    pub fn counterparty(&self, account: &AccountId) -> AccountId {
        if self.low == *account {
            self.high
        } else {
            self.low
        }
    }

    /// Balance seen from `account`: what the counterparty owes it.
    pub fn balance_for(&self, account: &AccountId) -> i64 {
        if self.low == *account {
            self.balance
        } else {
            -self.balance
        }
    }

    /// Sets the balance seen from `account`.
    pub fn set_balance_for(&mut self, account: &AccountId, balance: i64) {
        self.balance = if self.low == *account {
            balance
        } else {
            -balance
        };
    }

    /// The limit `account` extends to its counterparty.
    pub fn limit_for(&self, account: &AccountId) -> i64 {
        if self.low == *account {
            self.low_limit
        } else {
            self.high_limit
        }
    }

    pub fn set_limit_for(&mut self, account: &AccountId, limit: i64) {
        if self.low == *account {
            self.low_limit = limit;
        } else {
            self.high_limit = limit;
        }
    }

    /// Owner directory page for `account`'s side.
    pub fn node_for(&self, account: &AccountId) -> u64 {
        if self.low == *account {
            self.low_node
        } else {
            self.high_node
        }
    }

    /// A line with no limits and no balance carries no information.
    pub fn is_empty(&self) -> bool {
        self.balance == 0 && self.low_limit == 0 && self.high_limit == 0
    }
}

/// A standing offer in the order book.
///
/// `taker_pays` is what the owner receives, `taker_gets` what it gives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub account: AccountId,
    pub sequence: u32,
    pub taker_pays: Amount,
    pub taker_gets: Amount,
    pub owner_node: u64,
    pub book_directory: Hash256,
    pub book_node: u64,
}

/// One page of a directory.
///
/// The root page (node 0) doubles as the list head: `previous` on the root
/// names the last page. Pages are linked by node number, 0 ends the list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DirectoryNode {
    pub root: Hash256,
    pub owner: Option<AccountId>,
    pub indexes: Vec<Hash256>,
    pub next: u64,
    pub previous: u64,
}

/// Maps a generator id to its encrypted generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorMap {
    pub generator: AccountId,
    pub cipher: Vec<u8>,
}

/// A human-readable name bound to an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nickname {
    pub nickname: Hash256,
    pub account: AccountId,
    pub minimum_offer: Option<Amount>,
    pub owner_node: u64,
}

/// A payment request from `account` to `destination`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub account: AccountId,
    pub destination: AccountId,
    pub amount: Amount,
    pub sequence: u32,
    pub invoice_id: Option<Hash256>,
    pub owner_node: u64,
}

/// An opaque blob stored under an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreEntry {
    pub account: AccountId,
    pub key: Hash256,
    pub data: Vec<u8>,
    pub owner_node: u64,
}

/// Entry payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEntryData {
    AccountRoot(AccountRoot),
    RippleState(RippleState),
    Offer(Offer),
    DirectoryNode(DirectoryNode),
    GeneratorMap(GeneratorMap),
    Nickname(Nickname),
    Invoice(Invoice),
    StoreEntry(StoreEntry),
}

impl LedgerEntryData {
    /// Type name used in logs and errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            LedgerEntryData::AccountRoot(_) => "AccountRoot",
            LedgerEntryData::RippleState(_) => "RippleState",
            LedgerEntryData::Offer(_) => "Offer",
            LedgerEntryData::DirectoryNode(_) => "DirectoryNode",
            LedgerEntryData::GeneratorMap(_) => "GeneratorMap",
            LedgerEntryData::Nickname(_) => "Nickname",
            LedgerEntryData::Invoice(_) => "Invoice",
            LedgerEntryData::StoreEntry(_) => "StoreEntry",
        }
    }
}

/// A ledger entry: its index, the ledger that last touched it and its data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub index: Hash256,
    #[serde(default)]
    pub last_modified_ledger_seq: u32,
    pub data: LedgerEntryData,
}

impl LedgerEntry {
    pub fn new(index: Hash256, data: LedgerEntryData) -> Self {
        Self {
            index,
            last_modified_ledger_seq: 0,
            data,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.data.type_name()
    }
}

/// Typed views of a [`LedgerEntryData`] variant.
///
/// Implemented for each payload struct so generic loaders can check that the
/// entry under an index is the expected kind.
pub trait EntryKind: Sized + Clone {
    const NAME: &'static str;

    fn from_data(data: &LedgerEntryData) -> Option<&Self>;

    fn into_data(self) -> LedgerEntryData;
}

macro_rules! entry_kind {
    ($ty:ident) => {
        impl EntryKind for $ty {
            const NAME: &'static str = stringify!($ty);

            fn from_data(data: &LedgerEntryData) -> Option<&Self> {
                match data {
                    LedgerEntryData::$ty(inner) => Some(inner),
                    _ => None,
                }
            }

            fn into_data(self) -> LedgerEntryData {
                LedgerEntryData::$ty(self)
            }
        }
    };
}

entry_kind!(AccountRoot);
entry_kind!(RippleState);
entry_kind!(Offer);
entry_kind!(DirectoryNode);
entry_kind!(GeneratorMap);
entry_kind!(Nickname);
entry_kind!(Invoice);
entry_kind!(StoreEntry);
