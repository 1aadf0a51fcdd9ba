//! Invoice execution.

use newcoin_common::AccountId;
use newcoin_ledger::{index, Invoice};
use tracing::debug;

use crate::directory::{owner_dir_add, owner_dir_delete};
use crate::frame::InvoiceTx;
use crate::operations::check_destination;
use crate::result::{Malformed, Retry, TerResult};
use crate::state::LedgerStateManager;
use crate::validation::LedgerContext;

/// Execute an Invoice transaction.
///
/// Cancels an own invoice first (if asked), then creates one. A new invoice
/// is keyed by the source and the transaction sequence and listed in the
/// source's owner directory.
pub fn execute_invoice(
    op: &InvoiceTx,
    source: &AccountId,
    sequence: u32,
    state: &mut LedgerStateManager<'_>,
    context: &LedgerContext<'_>,
) -> TerResult {
    let create = match (op.destination, op.amount) {
        (Some(destination), Some(amount)) => Some((destination, amount)),
        (None, None) if op.cancel_sequence.is_some() => None,
        (None, _) => return Err(Malformed::DstNeeded.into()),
        (Some(_), None) => return Err(Malformed::BadAmount.into()),
    };
    if let Some((destination, amount)) = &create {
        check_destination(state, source, destination)?;
        if !amount.is_positive() || !amount.is_well_formed() {
            return Err(Malformed::BadAmount.into());
        }
    }

    if let Some(cancel) = op.cancel_sequence {
        let invoice_index = index::invoice(source, cancel);
        let invoice = state.load::<Invoice>(&invoice_index)?.ok_or(Retry::NoEntry)?;
        debug!(account = %source, sequence = cancel, "Cancelling invoice");
        owner_dir_delete(state, source, invoice.owner_node, &invoice_index)?;
        state.delete(&invoice_index)?;
    }

    let Some((destination, amount)) = create else {
        return Ok(());
    };
    let invoice_index = index::invoice(source, sequence);
    let owner_node = owner_dir_add(state, &context.config.directory, source, invoice_index)?;
    state.create(
        invoice_index,
        Invoice {
            account: *source,
            destination,
            amount,
            sequence,
            invoice_id: op.invoice_id,
            owner_node,
        },
    )
}
