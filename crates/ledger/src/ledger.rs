//! In-memory ledger snapshot.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::RangeInclusive;
use std::sync::Arc;

use newcoin_common::{AccountId, Hash256};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entries::{AccountRoot, EntryKind, LedgerEntry, LedgerEntryData};
use crate::error::{LedgerError, Result};
use crate::index;

/// A ledger shared between an engine and its callers.
///
/// Writers take the lock for one apply call at a time.
pub type SharedLedger = Arc<RwLock<Ledger>>;

/// A snapshot of all ledger entries at one sequence number.
///
/// Entries live in a `BTreeMap` so every traversal, and therefore every hash
/// computed over the state, is in index order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    sequence: u32,
    #[serde(default)]
    parent_hash: Hash256,
    total_coins: i64,
    #[serde(default)]
    entries: BTreeMap<Hash256, LedgerEntry>,
    #[serde(default)]
    transactions: BTreeSet<Hash256>,
}

impl Ledger {
    /// An empty ledger.
    pub fn new(sequence: u32, parent_hash: Hash256, total_coins: i64) -> Self {
        Self {
            sequence,
            parent_hash,
            total_coins,
            entries: BTreeMap::new(),
            transactions: BTreeSet::new(),
        }
    }

    /// The first ledger: every coin is held by `master`.
    pub fn genesis(master: AccountId, total_coins: i64) -> Self {
        let mut ledger = Self::new(1, Hash256::ZERO, total_coins);
        let root = AccountRoot::new(master, total_coins);
        ledger.put(LedgerEntry {
            index: index::account_root(&master),
            last_modified_ledger_seq: 1,
            data: LedgerEntryData::AccountRoot(root),
        });
        ledger
    }

    /// Wraps the ledger for sharing with an engine.
    pub fn into_shared(self) -> SharedLedger {
        Arc::new(RwLock::new(self))
    }

    pub fn current_sequence(&self) -> u32 {
        self.sequence
    }

    pub fn parent_hash(&self) -> Hash256 {
        self.parent_hash
    }

    /// Coins in existence, in drops.
    pub fn total_coins(&self) -> i64 {
        self.total_coins
    }

    pub fn set_total_coins(&mut self, total: i64) {
        self.total_coins = total;
    }

    pub fn get(&self, index: &Hash256) -> Option<&LedgerEntry> {
        self.entries.get(index)
    }

    /// Inserts or replaces the entry under its own index.
    pub fn put(&mut self, entry: LedgerEntry) {
        self.entries.insert(entry.index, entry);
    }

    pub fn remove(&mut self, index: &Hash256) -> Option<LedgerEntry> {
        self.entries.remove(index)
    }

    pub fn contains(&self, index: &Hash256) -> bool {
        self.entries.contains_key(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in index order.
    pub fn entries(&self) -> impl Iterator<Item = &LedgerEntry> {
        self.entries.values()
    }

    /// Indexes inside `range`, in order.
    pub fn indexes_in(&self, range: RangeInclusive<Hash256>) -> impl Iterator<Item = &Hash256> {
        self.entries.range(range).map(|(index, _)| index)
    }

    /// Typed lookup.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::WrongEntryType`] if the index holds another kind
    /// of entry.
    pub fn get_as<T: EntryKind>(&self, index: &Hash256) -> Result<Option<&T>> {
        match self.entries.get(index) {
            None => Ok(None),
            Some(entry) => T::from_data(&entry.data).map(Some).ok_or_else(|| {
                LedgerError::WrongEntryType {
                    index: *index,
                    expected: T::NAME,
                    actual: entry.type_name(),
                }
            }),
        }
    }

    /// The root entry of `account`.
    pub fn account(&self, account: &AccountId) -> Result<Option<&AccountRoot>> {
        self.get_as(&index::account_root(account))
    }

    pub fn has_transaction(&self, id: &Hash256) -> bool {
        self.transactions.contains(id)
    }

    pub fn record_transaction(&mut self, id: Hash256) {
        self.transactions.insert(id);
    }

    /// Sum of all native balances.
    pub fn native_total(&self) -> Result<i64> {
        self.entries.values().try_fold(0i64, |total, entry| match &entry.data {
            LedgerEntryData::AccountRoot(root) => total
                .checked_add(root.balance)
                .ok_or(LedgerError::TotalOverflow),
            _ => Ok(total),
        })
    }

    /// Hash over the ordered entries.
    pub fn state_hash(&self) -> Result<Hash256> {
        let mut buf = Vec::new();
        for entry in self.entries.values() {
            bincode::serialize_into(&mut buf, entry)?;
        }
        Ok(Hash256::sha512_half(&buf))
    }

    /// Hash identifying this ledger as a parent.
    pub fn hash(&self) -> Result<Hash256> {
        let state = self.state_hash()?;
        let mut buf = Vec::with_capacity(76);
        buf.extend_from_slice(&self.sequence.to_be_bytes());
        buf.extend_from_slice(self.parent_hash.as_bytes());
        buf.extend_from_slice(&self.total_coins.to_be_bytes());
        buf.extend_from_slice(state.as_bytes());
        Ok(Hash256::sha512_half(&buf))
    }

    /// The next ledger: same state, sequence + 1, no applied transactions.
    pub fn successor(&self) -> Result<Ledger> {
        let sequence = self
            .sequence
            .checked_add(1)
            .ok_or(LedgerError::InvalidSequence {
                current: self.sequence,
            })?;
        let parent_hash = self.hash()?;
        debug!(sequence, parent = %parent_hash, "Opening successor ledger");
        Ok(Ledger {
            sequence,
            parent_hash,
            total_coins: self.total_coins,
            entries: self.entries.clone(),
            transactions: BTreeSet::new(),
        })
    }
}
