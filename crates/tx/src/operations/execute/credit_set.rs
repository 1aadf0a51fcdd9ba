//! CreditSet execution.
//!
//! Trust lines are shared by both parties, so a new line goes into both
//! owner directories and an emptied line leaves both.

use newcoin_common::AccountId;
use newcoin_ledger::{index, RippleState};
use tracing::debug;

use crate::directory::{owner_dir_add, owner_dir_delete};
use crate::frame::CreditSetTx;
use crate::operations::check_destination;
use crate::result::{Malformed, Retry, TerResult};
use crate::state::LedgerStateManager;
use crate::validation::LedgerContext;

/// Execute a CreditSet transaction.
pub fn execute_credit_set(
    op: &CreditSetTx,
    source: &AccountId,
    state: &mut LedgerStateManager<'_>,
    context: &LedgerContext<'_>,
) -> TerResult {
    check_destination(state, source, &op.destination)?;
    let limit = &op.limit;
    if limit.is_native() || limit.value < 0 {
        return Err(Malformed::BadAmount.into());
    }

    let line_index = index::ripple_state(source, &op.destination, &limit.currency);
    match state.load::<RippleState>(&line_index)? {
        Some(mut line) => {
            line.set_limit_for(source, limit.value);
            if !line.is_empty() {
                return state.update(line_index, line);
            }
            debug!(line = %line_index, "Removing empty trust line");
            owner_dir_delete(state, &line.low, line.low_node, &line_index)?;
            owner_dir_delete(state, &line.high, line.high_node, &line_index)?;
            state.delete(&line_index)
        }
        None if limit.value == 0 => Err(Retry::NoLineNoZero.into()),
        None => {
            let dir_config = &context.config.directory;
            let (low, high) = index::order_accounts(source, &op.destination);
            let low_node = owner_dir_add(state, dir_config, &low, line_index)?;
            let high_node = owner_dir_add(state, dir_config, &high, line_index)?;
            let mut line = RippleState {
                low,
                high,
                currency: limit.currency,
                balance: 0,
                low_limit: 0,
                high_limit: 0,
                low_node,
                high_node,
            };
            line.set_limit_for(source, limit.value);
            debug!(line = %line_index, low = %low, high = %high, "Creating trust line");
            state.create(line_index, line)
        }
    }
}
