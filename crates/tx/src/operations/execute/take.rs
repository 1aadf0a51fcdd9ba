//! Take execution.

use newcoin_common::AccountId;
use newcoin_ledger::{index, Offer};
use tracing::debug;

use crate::frame::TakeTx;
use crate::result::{Malformed, Retry, TerResult};
use crate::state::LedgerStateManager;
use crate::validation::LedgerContext;

use super::offer::fill_offer;

/// Execute a Take transaction against one named resting offer.
///
/// Asking for more than the offer has takes all of it.
pub fn execute_take(
    op: &TakeTx,
    source: &AccountId,
    state: &mut LedgerStateManager<'_>,
    _context: &LedgerContext<'_>,
) -> TerResult {
    if op.owner == *source {
        return Err(Malformed::DstIsSrc.into());
    }
    let offer_index = index::offer(&op.owner, op.offer_sequence);
    let offer = state.load::<Offer>(&offer_index)?.ok_or(Retry::NoOffer)?;
    if !op.amount.is_positive() || op.amount.issue() != offer.taker_gets.issue() {
        return Err(Malformed::BadAmount.into());
    }

    let got = op.amount.value.min(offer.taker_gets.value);
    let paid = fill_offer(state, source, &offer_index, offer, got)?;
    debug!(taker = %source, owner = %op.owner, got, paid, "Took offer");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::OfferTx;
    use crate::operations::execute::execute_offer;
    use crate::test_utils::{secret, usd, TestLedger};
    use newcoin_ledger::Amount;

    fn setup() -> (TestLedger, AccountId, AccountId) {
        let mut env = TestLedger::new();
        let master = env.master();
        let alice = env.fund(&secret(2), 10_000);
        let bob = env.fund(&secret(3), 10_000);
        env.trust(&alice, &master, usd(), 1_000);
        env.pay_issued(&master, &alice, usd(), 500);
        let sell = OfferTx {
            taker_pays: Some(Amount::native(300)),
            taker_gets: Some(Amount::issued(100, usd(), master)),
            ..Default::default()
        };
        env.run(|state, ctx| execute_offer(&sell, &alice, 3, state, ctx))
            .unwrap();
        (env, alice, bob)
    }

    #[test]
    fn test_take_needs_receiving_line() {
        let (mut env, alice, bob) = setup();
        let master = env.master();
        let take = TakeTx {
            owner: alice,
            offer_sequence: 3,
            amount: Amount::issued(10, usd(), master),
        };
        assert_eq!(
            env.run(|state, ctx| execute_take(&take, &bob, state, ctx)),
            Err(Retry::OverLimit.into())
        );

        env.trust(&bob, &master, usd(), 1_000);
        env.run(|state, ctx| execute_take(&take, &bob, state, ctx))
            .unwrap();
        let offer: &Offer = env
            .ledger_ref()
            .get_as(&index::offer(&alice, 3))
            .unwrap()
            .unwrap();
        assert_eq!(offer.taker_gets.value, 90);
        assert_eq!(offer.taker_pays.value, 270);
        assert_eq!(env.issued_balance(&bob, &master, usd()), 10);
    }

    #[test]
    fn test_full_take_removes_offer() {
        let (mut env, alice, bob) = setup();
        let master = env.master();
        env.trust(&bob, &master, usd(), 1_000);
        let take = TakeTx {
            owner: alice,
            offer_sequence: 3,
            amount: Amount::issued(500, usd(), master),
        };
        env.run(|state, ctx| execute_take(&take, &bob, state, ctx))
            .unwrap();
        assert!(!env.ledger_ref().contains(&index::offer(&alice, 3)));
        assert_eq!(env.ledger_ref().account(&bob).unwrap().unwrap().balance, 10_000 - 300);
        assert_eq!(
            env.run(|state, ctx| execute_take(&take, &bob, state, ctx)),
            Err(Retry::NoOffer.into())
        );
    }

    #[test]
    fn test_take_shape_checks() {
        let (mut env, alice, bob) = setup();
        let own = TakeTx {
            owner: alice,
            offer_sequence: 3,
            amount: Amount::native(1),
        };
        assert_eq!(
            env.run(|state, ctx| execute_take(&own, &alice, state, ctx)),
            Err(Malformed::DstIsSrc.into())
        );
        assert_eq!(
            env.run(|state, ctx| execute_take(&own, &bob, state, ctx)),
            Err(Malformed::BadAmount.into())
        );
    }
}
