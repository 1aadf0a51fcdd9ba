//! WalletAdd execution.

use newcoin_common::{AccountId, Hash256};
use newcoin_ledger::AccountRoot;
use tracing::info;

use crate::frame::WalletAddTx;
use crate::result::{Malformed, Retry, TerResult};
use crate::state::LedgerStateManager;
use crate::validation::LedgerContext;

/// Execute a WalletAdd transaction.
///
/// Creates a claimed account from its master key and funds it from the
/// source. The master key must have signed the new authorised key.
pub fn execute_wallet_add(
    op: &WalletAddTx,
    source: &AccountId,
    state: &mut LedgerStateManager<'_>,
    context: &LedgerContext<'_>,
) -> TerResult {
    if op.amount <= 0 {
        return Err(Malformed::BadAmount.into());
    }
    let message = Hash256::sha512_half(op.authorized_key.as_bytes());
    if !context
        .verifier
        .verify_proof(&op.public_key, message.as_bytes(), &op.signature)
    {
        return Err(Malformed::BadAddAuth.into());
    }

    let account = op.public_key.account_id();
    if state.load_account(&account)?.is_some() {
        return Err(Retry::Created.into());
    }

    let mut funder = state.load_account(source)?.ok_or(Retry::NoAccount)?;
    if funder.balance < op.amount {
        return Err(Retry::Unfunded.into());
    }
    funder.balance -= op.amount;
    state.update_account(funder)?;

    let mut root = AccountRoot::new(account, op.amount);
    root.authorized_key = Some(op.authorized_key);
    info!(account = %account, funder = %source, amount = op.amount, "Adding wallet");
    state.create_account(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{secret, TestLedger};

    fn wallet_add(amount: i64) -> WalletAddTx {
        let master = secret(50);
        let authorized_key = AccountId([0x51; 20]);
        WalletAddTx {
            public_key: master.public_key(),
            authorized_key,
            signature: master.sign(Hash256::sha512_half(authorized_key.as_bytes()).as_bytes()),
            amount,
        }
    }

    #[test]
    fn test_wallet_add_creates_claimed_account() {
        let mut env = TestLedger::new();
        let source = env.master();
        let op = wallet_add(500);
        env.run(|state, ctx| execute_wallet_add(&op, &source, state, ctx))
            .unwrap();
        let created = env
            .ledger_ref()
            .account(&op.public_key.account_id())
            .unwrap()
            .unwrap()
            .clone();
        assert_eq!(created.balance, 500);
        assert_eq!(created.sequence, 1);
        assert_eq!(created.authorized_key, Some(op.authorized_key));
        assert_eq!(
            env.run(|state, ctx| execute_wallet_add(&op, &source, state, ctx)),
            Err(Retry::Created.into())
        );
    }

    #[test]
    fn test_wallet_add_rejections() {
        let mut env = TestLedger::new();
        let source = env.master();
        let mut forged = wallet_add(500);
        forged.authorized_key = AccountId([0x52; 20]);
        assert_eq!(
            env.run(|state, ctx| execute_wallet_add(&forged, &source, state, ctx)),
            Err(Malformed::BadAddAuth.into())
        );
        let too_much = wallet_add(i64::MAX);
        assert_eq!(
            env.run(|state, ctx| execute_wallet_add(&too_much, &source, state, ctx)),
            Err(Retry::Unfunded.into())
        );
    }
}
