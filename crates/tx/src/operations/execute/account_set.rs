//! AccountSet execution.

use newcoin_common::AccountId;
use newcoin_ledger::{index, AccountFlags, AccountRoot};

use crate::frame::{AccountSetFlags, AccountSetTx};
use crate::result::{Fault, Rejected, TerResult};
use crate::state::LedgerStateManager;
use crate::validation::LedgerContext;

/// Execute an AccountSet transaction.
///
/// A zero hash or an empty domain clears the field. The message key can be
/// set once only.
pub fn execute_account_set(
    op: &AccountSetTx,
    source: &AccountId,
    state: &mut LedgerStateManager<'_>,
    _context: &LedgerContext<'_>,
) -> TerResult {
    let set_flag = op.flags.contains(AccountSetFlags::SET_DISALLOW_XNS);
    let clear_flag = op.flags.contains(AccountSetFlags::CLEAR_DISALLOW_XNS);
    if set_flag && clear_flag {
        return Err(Fault::Invalid.into());
    }
    let nothing_to_do = op.email_hash.is_none()
        && op.wallet_locator.is_none()
        && op.message_key.is_none()
        && op.domain.is_none()
        && op.flags.is_empty();
    if nothing_to_do {
        return Err(Fault::Invalid.into());
    }

    let mut root: AccountRoot = state.load_existing(&index::account_root(source))?;
    if let Some(hash) = op.email_hash {
        root.email_hash = Some(hash).filter(|h| !h.is_zero());
    }
    if let Some(hash) = op.wallet_locator {
        root.wallet_locator = Some(hash).filter(|h| !h.is_zero());
    }
    if let Some(key) = &op.message_key {
        if root.message_key.is_some() {
            return Err(Rejected::MsgSet.into());
        }
        root.message_key = Some(key.clone());
    }
    if let Some(domain) = &op.domain {
        root.domain = Some(domain.clone()).filter(|d| !d.is_empty());
    }
    if set_flag {
        root.flags.insert(AccountFlags::DISALLOW_XNS);
    }
    if clear_flag {
        root.flags.remove(AccountFlags::DISALLOW_XNS);
    }
    state.update_account(root)
}
