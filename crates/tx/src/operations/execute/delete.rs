//! Delete execution.

use newcoin_common::AccountId;
use newcoin_ledger::{index, AccountRoot};
use tracing::info;

use crate::frame::DeleteTx;
use crate::operations::check_destination;
use crate::result::{Retry, TerResult};
use crate::state::{inconsistent, LedgerStateManager};
use crate::validation::LedgerContext;

/// Execute a Delete transaction.
///
/// The account must own nothing. Its remaining native balance moves to the
/// destination and the root goes away.
pub fn execute_delete(
    op: &DeleteTx,
    source: &AccountId,
    state: &mut LedgerStateManager<'_>,
    _context: &LedgerContext<'_>,
) -> TerResult {
    let mut destination = check_destination(state, source, &op.destination)?;
    if state.exists(&index::owner_dir(source)) {
        return Err(Retry::Owners.into());
    }

    let root_index = index::account_root(source);
    let root: AccountRoot = state.load_existing(&root_index)?;
    destination.balance = destination
        .balance
        .checked_add(root.balance)
        .ok_or_else(|| inconsistent(format!("balance of {} overflows", op.destination)))?;
    state.update_account(destination)?;
    state.delete(&root_index)?;
    info!(account = %source, heir = %op.destination, balance = root.balance, "Deleting account");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::CreditSetTx;
    use crate::operations::execute::execute_credit_set;
    use crate::test_utils::{secret, usd, TestLedger};
    use newcoin_ledger::Amount;

    #[test]
    fn test_delete_requires_empty_owner_dir() {
        let mut env = TestLedger::new();
        let alice = env.fund(&secret(2), 1_000);
        let master = env.master();
        let trust = CreditSetTx {
            destination: master,
            limit: Amount::issued(10, usd(), master),
        };
        env.run(|state, ctx| execute_credit_set(&trust, &alice, state, ctx))
            .unwrap();

        let delete = DeleteTx { destination: master };
        assert_eq!(
            env.run(|state, ctx| execute_delete(&delete, &alice, state, ctx)),
            Err(Retry::Owners.into())
        );

        let untrust = CreditSetTx {
            destination: master,
            limit: Amount::issued(0, usd(), master),
        };
        env.run(|state, ctx| execute_credit_set(&untrust, &alice, state, ctx))
            .unwrap();
        let before = env.ledger_ref().account(&master).unwrap().unwrap().balance;
        env.run(|state, ctx| execute_delete(&delete, &alice, state, ctx))
            .unwrap();
        assert!(env.ledger_ref().account(&alice).unwrap().is_none());
        assert_eq!(
            env.ledger_ref().account(&master).unwrap().unwrap().balance,
            before + 1_000
        );
    }
}
