//! Ledger state management for transaction execution.
//!
//! [`LedgerStateManager`] is the only view of the ledger a handler gets. Reads
//! see staged changes first and the committed ledger second; writes only
//! ever land in the [`ChangeSet`].

use std::collections::BTreeSet;
use std::fmt;
use std::ops::RangeInclusive;

use newcoin_common::{AccountId, Hash256};
use newcoin_ledger::{index, AccountRoot, EntryKind, Ledger, LedgerEntry, LedgerEntryData};
use tracing::error;

use crate::change_set::{ChangeSet, EntryAction};
use crate::result::{Fault, Ter, TerResult};

/// Staged view of one ledger for the duration of one apply call.
pub struct LedgerStateManager<'a> {
    ledger: &'a Ledger,
    changes: ChangeSet,
}

impl<'a> LedgerStateManager<'a> {
    pub fn new(ledger: &'a Ledger) -> Self {
        Self {
            ledger,
            changes: ChangeSet::new(),
        }
    }

    /// The committed ledger underneath the staged changes.
    pub fn ledger(&self) -> &'a Ledger {
        self.ledger
    }

    pub fn ledger_seq(&self) -> u32 {
        self.ledger.current_sequence()
    }

    pub fn changes(&self) -> &ChangeSet {
        &self.changes
    }

    pub fn into_changes(self) -> ChangeSet {
        self.changes
    }

    /// Current contents under `index`, staged or committed.
    ///
    /// A committed read is recorded as an access.
    pub fn entry(&mut self, index: &Hash256) -> Option<LedgerEntry> {
        if let Some(staged) = self.changes.get(index) {
            return match staged.action {
                EntryAction::Delete => None,
                _ => Some(staged.entry.clone()),
            };
        }
        let entry = self.ledger.get(index)?.clone();
        self.changes.access(entry.clone());
        Some(entry)
    }

    pub fn exists(&mut self, index: &Hash256) -> bool {
        self.entry(index).is_some()
    }

    /// Typed read. An entry of another kind under `index` is an internal
    /// inconsistency and fails with `tenFAILED`.
    pub fn load<T: EntryKind>(&mut self, index: &Hash256) -> TerResult<Option<T>> {
        let Some(entry) = self.entry(index) else {
            return Ok(None);
        };
        match T::from_data(&entry.data) {
            Some(value) => Ok(Some(value.clone())),
            None => Err(inconsistent(format!(
                "entry {} is {}, expected {}",
                index,
                entry.type_name(),
                T::NAME
            ))),
        }
    }

    /// Typed read of an entry that must exist.
    pub fn load_existing<T: EntryKind>(&mut self, index: &Hash256) -> TerResult<T> {
        self.load(index)?
            .ok_or_else(|| inconsistent(format!("missing {} {}", T::NAME, index)))
    }

    pub fn load_account(&mut self, account: &AccountId) -> TerResult<Option<AccountRoot>> {
        self.load(&index::account_root(account))
    }

    pub fn create<T: EntryKind>(&mut self, index: Hash256, value: T) -> TerResult {
        self.changes
            .create(LedgerEntry::new(index, value.into_data()))
            .map_err(inconsistent)
    }

    pub fn update<T: EntryKind>(&mut self, index: Hash256, value: T) -> TerResult {
        self.changes
            .modify(LedgerEntry::new(index, value.into_data()))
            .map_err(inconsistent)
    }

    /// Stages removal of the entry under `index`, which must exist.
    pub fn delete(&mut self, index: &Hash256) -> TerResult {
        let entry = self
            .entry(index)
            .ok_or_else(|| inconsistent(format!("deleting missing entry {}", index)))?;
        self.changes.delete(entry).map_err(inconsistent)
    }

    pub fn create_account(&mut self, root: AccountRoot) -> TerResult {
        self.create(index::account_root(&root.account), root)
    }

    pub fn update_account(&mut self, root: AccountRoot) -> TerResult {
        self.update(index::account_root(&root.account), root)
    }

    /// Indexes inside `range` in the staged view, in order.
    pub fn indexes_in(&self, range: RangeInclusive<Hash256>) -> Vec<Hash256> {
        let mut indexes: BTreeSet<Hash256> = self.ledger.indexes_in(range.clone()).copied().collect();
        for staged in self.changes.iter() {
            if !range.contains(&staged.entry.index) {
                continue;
            }
            match staged.action {
                EntryAction::Delete => {
                    indexes.remove(&staged.entry.index);
                }
                _ => {
                    indexes.insert(staged.entry.index);
                }
            }
        }
        indexes.into_iter().collect()
    }

    /// Sum of native balances as they would be after commit.
    pub fn native_total(&self) -> Option<i64> {
        let committed = self
            .ledger
            .entries()
            .filter(|entry| self.changes.get(&entry.index).is_none());
        let staged = self
            .changes
            .iter()
            .filter(|staged| staged.action != EntryAction::Delete)
            .map(|staged| &staged.entry);
        committed
            .chain(staged)
            .try_fold(0i64, |total, entry| match &entry.data {
                LedgerEntryData::AccountRoot(root) => total.checked_add(root.balance),
                _ => Some(total),
            })
    }
}

/// Logs an internal inconsistency and maps it to `tenFAILED`.
pub(crate) fn inconsistent(detail: impl fmt::Display) -> Ter {
    error!(detail = %detail, "Ledger state inconsistency");
    Fault::Failed.into()
}
