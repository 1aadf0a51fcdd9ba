//! Per-type transaction handlers and the checks they share.

pub mod execute;

use newcoin_common::AccountId;
use newcoin_ledger::AccountRoot;

use crate::result::{Malformed, Retry, TerResult};
use crate::state::LedgerStateManager;

/// Destination checks shared by the handlers that name a counterparty:
/// present, not the source, and existing.
pub(crate) fn check_destination(
    state: &mut LedgerStateManager<'_>,
    source: &AccountId,
    destination: &AccountId,
) -> TerResult<AccountRoot> {
    if destination.is_zero() {
        return Err(Malformed::DstNeeded.into());
    }
    if destination == source {
        return Err(Malformed::DstIsSrc.into());
    }
    state
        .load_account(destination)?
        .ok_or_else(|| Retry::NoDst.into())
}
