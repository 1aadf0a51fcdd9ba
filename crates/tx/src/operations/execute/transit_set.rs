//! TransitSet execution.

use newcoin_common::math::RATE_ONE;
use newcoin_common::AccountId;
use newcoin_ledger::{index, AccountRoot};

use crate::frame::TransitSetTx;
use crate::result::{Malformed, TerResult};
use crate::state::LedgerStateManager;
use crate::validation::LedgerContext;

/// Highest transfer rate an account may charge: 2.0.
pub const MAX_TRANSIT_RATE: u32 = 2 * RATE_ONE;

/// Execute a TransitSet transaction.
///
/// Only the given fields change. The resulting start must precede the
/// resulting expiry.
pub fn execute_transit_set(
    op: &TransitSetTx,
    source: &AccountId,
    state: &mut LedgerStateManager<'_>,
    _context: &LedgerContext<'_>,
) -> TerResult {
    if op.rate.is_none() && op.start.is_none() && op.expire.is_none() {
        return Err(Malformed::BadTransit.into());
    }
    if op
        .rate
        .is_some_and(|rate| !(RATE_ONE..=MAX_TRANSIT_RATE).contains(&rate))
    {
        return Err(Malformed::BadTransit.into());
    }

    let mut root: AccountRoot = state.load_existing(&index::account_root(source))?;
    root.transit_rate = op.rate.or(root.transit_rate);
    root.transit_start = op.start.or(root.transit_start);
    root.transit_expire = op.expire.or(root.transit_expire);
    // The window is checked as it will be stored.
    if let (Some(start), Some(expire)) = (root.transit_start, root.transit_expire) {
        if start >= expire {
            return Err(Malformed::BadTransit.into());
        }
    }
    state.update_account(root)
}
