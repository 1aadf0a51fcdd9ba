//! Store execution.

use newcoin_common::AccountId;
use newcoin_ledger::{index, StoreEntry};

use crate::directory::{owner_dir_add, owner_dir_delete};
use crate::frame::StoreTx;
use crate::result::{Retry, TerResult};
use crate::state::LedgerStateManager;
use crate::validation::LedgerContext;

/// Execute a Store transaction. Empty data removes the blob.
pub fn execute_store(
    op: &StoreTx,
    source: &AccountId,
    state: &mut LedgerStateManager<'_>,
    context: &LedgerContext<'_>,
) -> TerResult {
    let store_index = index::store(source, &op.key);
    let existing = state.load::<StoreEntry>(&store_index)?;

    if op.data.is_empty() {
        let entry = existing.ok_or(Retry::NoEntry)?;
        owner_dir_delete(state, source, entry.owner_node, &store_index)?;
        return state.delete(&store_index);
    }

    match existing {
        Some(mut entry) => {
            entry.data = op.data.clone();
            state.update(store_index, entry)
        }
        None => {
            let owner_node = owner_dir_add(state, &context.config.directory, source, store_index)?;
            state.create(
                store_index,
                StoreEntry {
                    account: *source,
                    key: op.key,
                    data: op.data.clone(),
                    owner_node,
                },
            )
        }
    }
}
