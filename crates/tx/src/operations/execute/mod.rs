//! Transaction execution dispatcher.
//!
//! Each transaction type has its own submodule with the type-specific
//! logic. Handlers stage their changes in the [`LedgerStateManager`] and
//! report failure as a classified [`crate::TransactionEngineResult`]; the
//! engine discards the staged changes of a failed handler.

use crate::frame::{Transaction, TransactionKind};
use crate::result::TerResult;
use crate::state::LedgerStateManager;
use crate::validation::LedgerContext;

mod account_set;
mod authorize;
mod claim;
mod credit_set;
mod delete;
mod invoice;
mod nickname_set;
mod offer;
mod password_fund;
mod password_set;
mod payment;
pub(crate) mod ripple;
mod store;
mod take;
mod transit_set;
mod wallet_add;

pub use account_set::execute_account_set;
pub use claim::execute_claim;
pub use credit_set::execute_credit_set;
pub use delete::execute_delete;
pub use invoice::execute_invoice;
pub use nickname_set::execute_nickname_set;
pub use offer::execute_offer;
pub use password_fund::execute_password_fund;
pub use password_set::execute_password_set;
pub use payment::execute_payment;
pub use store::execute_store;
pub use take::execute_take;
pub use transit_set::{execute_transit_set, MAX_TRANSIT_RATE};
pub use wallet_add::execute_wallet_add;

/// Execute the type-specific part of a transaction.
///
/// Runs after the common checks and the fee charge.
pub fn execute_transaction(
    tx: &Transaction,
    state: &mut LedgerStateManager<'_>,
    context: &LedgerContext<'_>,
) -> TerResult {
    let source = &tx.source;
    match &tx.kind {
        TransactionKind::AccountSet(op) => execute_account_set(op, source, state, context),
        TransactionKind::Claim(op) => execute_claim(op, source, state, context),
        TransactionKind::CreditSet(op) => execute_credit_set(op, source, state, context),
        TransactionKind::Delete(op) => execute_delete(op, source, state, context),
        TransactionKind::Invoice(op) => {
            execute_invoice(op, source, tx.sequence, state, context)
        }
        TransactionKind::Offer(op) => execute_offer(op, source, tx.sequence, state, context),
        TransactionKind::NicknameSet(op) => execute_nickname_set(op, source, state, context),
        TransactionKind::PasswordFund(op) => execute_password_fund(op, source, state, context),
        TransactionKind::PasswordSet(op) => execute_password_set(op, source, state, context),
        TransactionKind::Payment(op) => execute_payment(op, source, state, context),
        TransactionKind::Store(op) => execute_store(op, source, state, context),
        TransactionKind::Take(op) => execute_take(op, source, state, context),
        TransactionKind::TransitSet(op) => execute_transit_set(op, source, state, context),
        TransactionKind::WalletAdd(op) => execute_wallet_add(op, source, state, context),
    }
}
