//! PasswordFund execution.

use newcoin_common::AccountId;
use newcoin_ledger::AccountFlags;

use crate::frame::PasswordFundTx;
use crate::result::{Retry, TerResult};
use crate::state::LedgerStateManager;
use crate::validation::LedgerContext;

/// Execute a PasswordFund transaction: the destination gets another free
/// password reset.
pub fn execute_password_fund(
    op: &PasswordFundTx,
    _source: &AccountId,
    state: &mut LedgerStateManager<'_>,
    _context: &LedgerContext<'_>,
) -> TerResult {
    let mut root = state
        .load_account(&op.destination)?
        .ok_or(Retry::SetMissingDst)?;
    if root.flags.contains(AccountFlags::PASSWORD_SPENT) {
        root.flags.remove(AccountFlags::PASSWORD_SPENT);
        state.update_account(root)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{secret, TestLedger};
    use newcoin_ledger::{index, EntryKind, LedgerEntry};

    #[test]
    fn test_missing_destination() {
        let mut env = TestLedger::new();
        let master = env.master();
        let op = PasswordFundTx {
            destination: AccountId([8u8; 20]),
        };
        assert_eq!(
            env.run(|state, ctx| execute_password_fund(&op, &master, state, ctx)),
            Err(Retry::SetMissingDst.into())
        );
    }

    #[test]
    fn test_clears_password_spent() {
        let mut env = TestLedger::new();
        let master = env.master();
        let alice = env.fund(&secret(2), 1_000);
        let mut root = env.ledger_ref().account(&alice).unwrap().unwrap().clone();
        root.flags.insert(AccountFlags::PASSWORD_SPENT);
        env.ledger_mut()
            .put(LedgerEntry::new(index::account_root(&alice), root.into_data()));

        let op = PasswordFundTx { destination: alice };
        env.run(|state, ctx| execute_password_fund(&op, &master, state, ctx))
            .unwrap();
        let root = env.ledger_ref().account(&alice).unwrap().unwrap();
        assert!(!root.flags.contains(AccountFlags::PASSWORD_SPENT));
    }
}
