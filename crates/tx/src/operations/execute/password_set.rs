//! PasswordSet execution.

use newcoin_common::AccountId;
use newcoin_ledger::AccountFlags;

use crate::frame::PasswordSetTx;
use crate::result::{Retry, TerResult};
use crate::state::{inconsistent, LedgerStateManager};
use crate::validation::LedgerContext;

use super::authorize::set_authorized;

/// Execute a PasswordSet transaction.
///
/// The free reset of a claimed account: marks the reset as spent and
/// installs a new authorised key.
pub fn execute_password_set(
    op: &PasswordSetTx,
    source: &AccountId,
    state: &mut LedgerStateManager<'_>,
    context: &LedgerContext<'_>,
) -> TerResult {
    let mut root = state
        .load_account(source)?
        .ok_or_else(|| inconsistent(format!("password set on missing account {}", source)))?;
    if !root.is_claimed() {
        return Err(Retry::Unclaimed.into());
    }
    if root.flags.contains(AccountFlags::PASSWORD_SPENT) {
        return Err(Retry::FundsSpent.into());
    }
    root.flags.insert(AccountFlags::PASSWORD_SPENT);
    state.update_account(root)?;
    set_authorized(&op.proof, source, op.authorized_key, false, state, context)
}
