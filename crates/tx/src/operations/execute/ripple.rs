//! Moving value between accounts.
//!
//! Native value lives on account roots. Issued value lives on trust lines:
//! a line's balance is what one party owes the other, and each party caps
//! how much it is willing to be owed.

use newcoin_common::{AccountId, Currency};
use newcoin_ledger::{index, Amount, Issue, RippleState};

use crate::result::{Retry, TerResult};
use crate::state::{inconsistent, LedgerStateManager};

pub(crate) fn load_line(
    state: &mut LedgerStateManager<'_>,
    a: &AccountId,
    b: &AccountId,
    currency: &Currency,
) -> TerResult<Option<RippleState>> {
    state.load(&index::ripple_state(a, b, currency))
}

/// How much more `to` accepts from its counterparty on `line`.
pub(crate) fn line_capacity(line: &RippleState, to: &AccountId) -> i64 {
    line.limit_for(to).saturating_sub(line.balance_for(to))
}

/// Moves `value` of credit from `from` to `to` along their line.
///
/// Capacity must have been checked by the caller.
pub(crate) fn ripple_credit(
    state: &mut LedgerStateManager<'_>,
    from: &AccountId,
    to: &AccountId,
    currency: &Currency,
    value: i64,
) -> TerResult {
    let line_index = index::ripple_state(from, to, currency);
    let mut line: RippleState = state.load_existing(&line_index)?;
    let balance = line
        .balance_for(to)
        .checked_add(value)
        .ok_or_else(|| inconsistent(format!("line {} overflows", line_index)))?;
    line.set_balance_for(to, balance);
    state.update(line_index, line)
}

/// What `holder` can give of `issue`.
///
/// Issuers hold an unlimited supply of their own currency.
pub(crate) fn holding(
    state: &mut LedgerStateManager<'_>,
    holder: &AccountId,
    issue: &Issue,
) -> TerResult<i64> {
    if issue.is_native() {
        return Ok(state
            .load_account(holder)?
            .map_or(0, |root| root.balance.max(0)));
    }
    if *holder == issue.issuer {
        return Ok(i64::MAX);
    }
    Ok(load_line(state, holder, &issue.issuer, &issue.currency)?
        .map_or(0, |line| line.balance_for(holder).max(0)))
}

/// What `receiver` can accept of `issue`.
pub(crate) fn receivable(
    state: &mut LedgerStateManager<'_>,
    receiver: &AccountId,
    issue: &Issue,
) -> TerResult<i64> {
    if issue.is_native() || *receiver == issue.issuer {
        return Ok(i64::MAX);
    }
    Ok(load_line(state, receiver, &issue.issuer, &issue.currency)?
        .map_or(0, |line| line_capacity(&line, receiver).max(0)))
}

/// Delivers `amount` from `from` to `to`.
///
/// Issued amounts go through the issuer: the sender's holding shrinks and
/// the receiver's grows, each within its own line.
pub(crate) fn deliver(
    state: &mut LedgerStateManager<'_>,
    from: &AccountId,
    to: &AccountId,
    amount: &Amount,
) -> TerResult {
    if amount.is_native() {
        return transfer_native(state, from, to, amount.value);
    }

    let issuer = amount.issuer;
    if *from != issuer {
        if holding(state, from, &amount.issue())? < amount.value {
            return Err(Retry::Unfunded.into());
        }
        ripple_credit(state, from, &issuer, &amount.currency, amount.value)?;
    }
    if *to != issuer {
        if receivable(state, to, &amount.issue())? < amount.value {
            return Err(Retry::OverLimit.into());
        }
        ripple_credit(state, &issuer, to, &amount.currency, amount.value)?;
    }
    Ok(())
}

/// Moves native drops between two existing accounts.
pub(crate) fn transfer_native(
    state: &mut LedgerStateManager<'_>,
    from: &AccountId,
    to: &AccountId,
    value: i64,
) -> TerResult {
    let mut sender = state
        .load_account(from)?
        .ok_or(Retry::NoAccount)?;
    if sender.balance < value {
        return Err(Retry::Unfunded.into());
    }
    sender.balance -= value;
    state.update_account(sender)?;

    let mut receiver = state.load_account(to)?.ok_or(Retry::NoDst)?;
    receiver.balance = receiver
        .balance
        .checked_add(value)
        .ok_or_else(|| inconsistent(format!("balance of {} overflows", to)))?;
    state.update_account(receiver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use newcoin_ledger::{AccountRoot, Ledger, LedgerEntry, LedgerEntryData};

    fn acct(b: u8) -> AccountId {
        AccountId([b; 20])
    }

    fn usd() -> Currency {
        Currency::from_code("USD").unwrap()
    }

    /// Ledger with accounts 1..=3 and USD lines 1-2 and 2-3, both trusting
    /// each other up to 100.
    fn ledger() -> Ledger {
        let mut ledger = Ledger::genesis(acct(1), 1_000);
        for b in [2, 3] {
            ledger.put(LedgerEntry::new(
                index::account_root(&acct(b)),
                LedgerEntryData::AccountRoot(AccountRoot::new(acct(b), 0)),
            ));
        }
        for (a, b) in [(1, 2), (2, 3)] {
            ledger.put(LedgerEntry::new(
                index::ripple_state(&acct(a), &acct(b), &usd()),
                LedgerEntryData::RippleState(RippleState {
                    low: acct(a),
                    high: acct(b),
                    currency: usd(),
                    balance: 0,
                    low_limit: 100,
                    high_limit: 100,
                    low_node: 0,
                    high_node: 0,
                }),
            ));
        }
        ledger
    }

    #[test]
    fn test_deliver_through_issuer() {
        let ledger = ledger();
        let mut state = LedgerStateManager::new(&ledger);
        let amount = Amount::issued(40, usd(), acct(2));

        // Issuer pays out, then the holder pays on through the issuer.
        deliver(&mut state, &acct(2), &acct(1), &amount).unwrap();
        assert_eq!(holding(&mut state, &acct(1), &amount.issue()).unwrap(), 40);
        deliver(&mut state, &acct(1), &acct(3), &amount).unwrap();
        assert_eq!(holding(&mut state, &acct(1), &amount.issue()).unwrap(), 0);
        assert_eq!(holding(&mut state, &acct(3), &amount.issue()).unwrap(), 40);
    }

    #[test]
    fn test_deliver_failures() {
        let ledger = ledger();
        let mut state = LedgerStateManager::new(&ledger);
        let amount = Amount::issued(40, usd(), acct(2));
        assert_eq!(
            deliver(&mut state, &acct(1), &acct(3), &amount),
            Err(Retry::Unfunded.into())
        );
        let too_much = Amount::issued(101, usd(), acct(2));
        assert_eq!(
            deliver(&mut state, &acct(2), &acct(3), &too_much),
            Err(Retry::OverLimit.into())
        );
        assert_eq!(
            deliver(&mut state, &acct(3), &acct(1), &Amount::native(1)),
            Err(Retry::Unfunded.into())
        );
    }

    #[test]
    fn test_native_transfer() {
        let ledger = ledger();
        let mut state = LedgerStateManager::new(&ledger);
        transfer_native(&mut state, &acct(1), &acct(3), 250).unwrap();
        assert_eq!(state.load_account(&acct(1)).unwrap().unwrap().balance, 750);
        assert_eq!(state.load_account(&acct(3)).unwrap().unwrap().balance, 250);
        assert_eq!(
            transfer_native(&mut state, &acct(1), &acct(9), 1),
            Err(Retry::NoDst.into())
        );
    }
}
