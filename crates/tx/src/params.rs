//! Flags controlling one apply call.

use bitflags::bitflags;

bitflags! {
    /// Checks to skip and side effects to enable when applying a transaction.
    ///
    /// Flags combine freely; [`TransactionEngineParams::NONE`] runs every check.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TransactionEngineParams: u32 {
        /// Run every check.
        const NONE = 0;
        /// The signature was already checked.
        const NO_CHECK_SIGN = 1;
        /// The transaction was voted into a ledger anyway.
        const NO_CHECK_FEE = 2;
        /// Burn the fee from the coin total and re-verify the total.
        const UPDATE_TOTAL_COINS = 4;
    }
}

impl Default for TransactionEngineParams {
    fn default() -> Self {
        Self::NONE
    }
}
