//! Paged directories of ledger entry indexes.
//!
//! A directory is a linked list of [`DirectoryNode`] pages. The root page
//! (node 0) lives at the directory's base index and its `previous` field
//! names the last page, so appends never walk the list. Every other page
//! lives at [`index::dir_node`]. Callers remember the page an entry went into
//! and hand it back on removal.
//!
//! Owner directories list everything an account owns; book directories list
//! the offers of one order book at one quality.

use newcoin_common::config::DirectoryConfig;
use newcoin_common::{AccountId, Hash256};
use newcoin_ledger::{index, AccountRoot, DirectoryNode, Ledger};
use tracing::trace;

use crate::result::{Retry, TerResult};
use crate::state::{inconsistent, LedgerStateManager};

/// Appends `entry` to the directory rooted at `root`.
///
/// Creates the root page if the directory does not exist yet. Returns the
/// page number the entry was stored in.
pub fn dir_add(
    state: &mut LedgerStateManager<'_>,
    config: &DirectoryConfig,
    root: &Hash256,
    owner: Option<AccountId>,
    entry: Hash256,
) -> TerResult<u64> {
    let Some(mut root_page) = state.load::<DirectoryNode>(root)? else {
        trace!(root = %root, "Creating directory");
        state.create(
            *root,
            DirectoryNode {
                root: *root,
                owner,
                indexes: vec![entry],
                next: 0,
                previous: 0,
            },
        )?;
        return Ok(0);
    };

    if dir_entries(state, root)?.contains(&entry) {
        return Err(inconsistent(format!("{} already in directory {}", entry, root)));
    }
    let last_id = root_page.previous;
    let mut last = if last_id == 0 {
        root_page.clone()
    } else {
        load_page(state, root, last_id)?
    };

    if last.indexes.len() < config.page_capacity {
        last.indexes.push(entry);
        state.update(index::dir_node(root, last_id), last)?;
        return Ok(last_id);
    }

    let new_id = match last_id.checked_add(1) {
        Some(id) if id < config.max_pages => id,
        _ => return Err(Retry::DirFull.into()),
    };
    trace!(root = %root, page = new_id, "Adding directory page");
    state.create(
        index::dir_node(root, new_id),
        DirectoryNode {
            root: *root,
            owner,
            indexes: vec![entry],
            next: 0,
            previous: last_id,
        },
    )?;

    if last_id == 0 {
        root_page.next = new_id;
    } else {
        last.next = new_id;
        state.update(index::dir_node(root, last_id), last)?;
    }
    root_page.previous = new_id;
    state.update(*root, root_page)?;
    Ok(new_id)
}

/// Removes `entry` from page `node` of the directory rooted at `root`.
///
/// An emptied page other than the root is unlinked and deleted. The root is
/// deleted once it is empty and no other page remains.
pub fn dir_delete(
    state: &mut LedgerStateManager<'_>,
    node: u64,
    root: &Hash256,
    entry: &Hash256,
) -> TerResult {
    if state.load::<DirectoryNode>(root)?.is_none() {
        return Err(Retry::NodeNoRoot.into());
    }
    let page_index = index::dir_node(root, node);
    let Some(mut page) = state.load::<DirectoryNode>(&page_index)? else {
        return Err(Retry::NodeNotFound.into());
    };
    let Some(position) = page.indexes.iter().position(|i| i == entry) else {
        return Err(Retry::NodeNotMentioned.into());
    };
    page.indexes.remove(position);

    if node != 0 {
        if !page.indexes.is_empty() {
            return state.update(page_index, page);
        }
        trace!(root = %root, page = node, "Removing directory page");
        let (previous, next) = (page.previous, page.next);
        state.delete(&page_index)?;

        let mut before = load_page(state, root, previous)?;
        before.next = next;
        state.update(index::dir_node(root, previous), before)?;

        // The root's `previous` tracks the last page.
        let mut after = load_page(state, root, next)?;
        after.previous = previous;
        state.update(index::dir_node(root, next), after)?;
    } else {
        state.update(*root, page)?;
    }

    let root_page = load_page(state, root, 0)?;
    if root_page.indexes.is_empty() && root_page.next == 0 {
        trace!(root = %root, "Removing directory");
        state.delete(root)?;
    }
    Ok(())
}

/// Every entry of the directory, page by page.
pub fn dir_entries(state: &mut LedgerStateManager<'_>, root: &Hash256) -> TerResult<Vec<Hash256>> {
    let mut entries = Vec::new();
    let Some(mut page) = state.load::<DirectoryNode>(root)? else {
        return Ok(entries);
    };
    loop {
        entries.extend_from_slice(&page.indexes);
        if page.next == 0 {
            return Ok(entries);
        }
        page = load_page(state, root, page.next)?;
    }
}

/// Entries of a directory in the committed ledger only.
///
/// Used by searches that run outside an apply call. A broken link ends the
/// walk early.
pub fn committed_dir_entries(ledger: &Ledger, root: &Hash256) -> Vec<Hash256> {
    let mut entries = Vec::new();
    let mut node = 0;
    loop {
        let page = match ledger.get_as::<DirectoryNode>(&index::dir_node(root, node)) {
            Ok(Some(page)) => page,
            _ => return entries,
        };
        entries.extend_from_slice(&page.indexes);
        if page.next == 0 {
            return entries;
        }
        node = page.next;
    }
}

/// Adds `entry` to `owner`'s directory and counts it on the owner's root.
pub fn owner_dir_add(
    state: &mut LedgerStateManager<'_>,
    config: &DirectoryConfig,
    owner: &AccountId,
    entry: Hash256,
) -> TerResult<u64> {
    let node = dir_add(state, config, &index::owner_dir(owner), Some(*owner), entry)?;
    let mut root = state.load_existing(&index::account_root(owner))?;
    adjust_owner_count(&mut root, 1);
    state.update_account(root)?;
    Ok(node)
}

/// Removes `entry` from `owner`'s directory and uncounts it.
pub fn owner_dir_delete(
    state: &mut LedgerStateManager<'_>,
    owner: &AccountId,
    node: u64,
    entry: &Hash256,
) -> TerResult {
    dir_delete(state, node, &index::owner_dir(owner), entry)?;
    let mut root = state.load_existing(&index::account_root(owner))?;
    adjust_owner_count(&mut root, -1);
    state.update_account(root)
}

fn adjust_owner_count(root: &mut AccountRoot, delta: i32) {
    root.owner_count = root.owner_count.saturating_add_signed(delta);
}

fn load_page(
    state: &mut LedgerStateManager<'_>,
    root: &Hash256,
    node: u64,
) -> TerResult<DirectoryNode> {
    state.load_existing(&index::dir_node(root, node))
}
