//! Staged ledger changes.
//!
//! Handlers never write to the ledger. They stage intents in a [`ChangeSet`]
//! and the engine commits the whole set after the handler succeeds, or drops
//! it otherwise.

use std::collections::BTreeMap;

use newcoin_common::Hash256;
use newcoin_ledger::{Ledger, LedgerEntry};

use crate::error::{Result, TxError};

/// What a handler intends to do with an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryAction {
    /// Read only.
    Access,
    /// New entry.
    Create,
    /// Existing entry with new contents.
    Modify,
    /// Existing entry to remove.
    Delete,
}

impl EntryAction {
    pub fn name(&self) -> &'static str {
        match self {
            EntryAction::Access => "access",
            EntryAction::Create => "create",
            EntryAction::Modify => "modify",
            EntryAction::Delete => "delete",
        }
    }
}

/// One staged entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffectedEntry {
    pub action: EntryAction,
    pub entry: LedgerEntry,
}

/// An ordered list of staged entries, at most one per index.
///
/// Repeated intents for the same index fold into the first position:
/// a modify after a create stays a create, a delete after a modify is a
/// delete, and a delete after a create drops the entry altogether.
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    entries: Vec<AffectedEntry>,
    positions: BTreeMap<Hash256, usize>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Staged entries in the order they were first touched.
    pub fn iter(&self) -> impl Iterator<Item = &AffectedEntry> {
        self.entries.iter()
    }

    pub fn get(&self, index: &Hash256) -> Option<&AffectedEntry> {
        self.positions.get(index).map(|&pos| &self.entries[pos])
    }

    /// Records a read of an entry already in the ledger.
    ///
    /// No-op when the index is already staged.
    pub fn access(&mut self, entry: LedgerEntry) {
        if !self.positions.contains_key(&entry.index) {
            self.push(EntryAction::Access, entry);
        }
    }

    /// Stages a new entry.
    pub fn create(&mut self, entry: LedgerEntry) -> Result<()> {
        match self.positions.get(&entry.index).copied() {
            None => {
                self.push(EntryAction::Create, entry);
                Ok(())
            }
            Some(pos) => match self.entries[pos].action {
                // Recreated within the same transaction.
                EntryAction::Delete => {
                    self.entries[pos] = AffectedEntry {
                        action: EntryAction::Modify,
                        entry,
                    };
                    Ok(())
                }
                action => Err(invalid(&entry.index, action, EntryAction::Create)),
            },
        }
    }

    /// Stages new contents for an existing entry.
    pub fn modify(&mut self, entry: LedgerEntry) -> Result<()> {
        match self.positions.get(&entry.index).copied() {
            None => {
                self.push(EntryAction::Modify, entry);
                Ok(())
            }
            Some(pos) => {
                let action = match self.entries[pos].action {
                    EntryAction::Access | EntryAction::Modify => EntryAction::Modify,
                    EntryAction::Create => EntryAction::Create,
                    EntryAction::Delete => {
                        return Err(invalid(&entry.index, EntryAction::Delete, EntryAction::Modify))
                    }
                };
                self.entries[pos] = AffectedEntry { action, entry };
                Ok(())
            }
        }
    }

    /// Stages removal of an entry.
    pub fn delete(&mut self, entry: LedgerEntry) -> Result<()> {
        match self.positions.get(&entry.index).copied() {
            None => {
                self.push(EntryAction::Delete, entry);
                Ok(())
            }
            Some(pos) => match self.entries[pos].action {
                EntryAction::Create => {
                    self.entries.remove(pos);
                    self.reindex();
                    Ok(())
                }
                EntryAction::Access | EntryAction::Modify => {
                    self.entries[pos] = AffectedEntry {
                        action: EntryAction::Delete,
                        entry,
                    };
                    Ok(())
                }
                EntryAction::Delete => {
                    Err(invalid(&entry.index, EntryAction::Delete, EntryAction::Delete))
                }
            },
        }
    }

    /// Writes every staged mutation into `ledger`, in order.
    pub fn apply_to(self, ledger: &mut Ledger, ledger_seq: u32) {
        for AffectedEntry { action, mut entry } in self.entries {
            match action {
                EntryAction::Access => {}
                EntryAction::Create | EntryAction::Modify => {
                    entry.last_modified_ledger_seq = ledger_seq;
                    ledger.put(entry);
                }
                EntryAction::Delete => {
                    ledger.remove(&entry.index);
                }
            }
        }
    }

    fn push(&mut self, action: EntryAction, entry: LedgerEntry) {
        self.positions.insert(entry.index, self.entries.len());
        self.entries.push(AffectedEntry { action, entry });
    }

    fn reindex(&mut self) {
        self.positions = self
            .entries
            .iter()
            .enumerate()
            .map(|(pos, affected)| (affected.entry.index, pos))
            .collect();
    }
}

fn invalid(index: &Hash256, from: EntryAction, to: EntryAction) -> TxError {
    TxError::InvalidTransition {
        index: *index,
        from: from.name(),
        to: to.name(),
    }
}
