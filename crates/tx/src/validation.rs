//! Checks run before a handler is dispatched.
//!
//! Each check returns the classified failure the engine reports, so the
//! dispatcher is a straight sequence of `?` calls.

use newcoin_common::config::LOAD_BASE;
use newcoin_common::{Config, Hash256};
use newcoin_ledger::{index, AccountRoot, Ledger};

use crate::frame::{NicknameFlags, PaymentFlags, Transaction, TransactionKind, TransactionType};
use crate::params::TransactionEngineParams;
use crate::pathfind::PathFinder;
use crate::result::{Fault, Malformed, Rejected, Retry, TerResult};
use crate::signature_checker::SignatureVerifier;

/// Everything a handler may consult besides the ledger itself.
#[derive(Clone, Copy)]
pub struct LedgerContext<'a> {
    pub config: &'a Config,
    pub params: TransactionEngineParams,
    pub verifier: &'a dyn SignatureVerifier,
    pub pathfinder: &'a dyn PathFinder,
}

impl<'a> LedgerContext<'a> {
    pub fn new(
        config: &'a Config,
        params: TransactionEngineParams,
        verifier: &'a dyn SignatureVerifier,
        pathfinder: &'a dyn PathFinder,
    ) -> Self {
        Self {
            config,
            params,
            verifier,
            pathfinder,
        }
    }
}

/// Signature check, skipped under `NO_CHECK_SIGN`.
pub fn validate_signature(tx: &Transaction, context: &LedgerContext<'_>) -> TerResult {
    if context.params.contains(TransactionEngineParams::NO_CHECK_SIGN) {
        return Ok(());
    }
    if !context.verifier.verify_transaction(tx) {
        return Err(Malformed::BadSignature.into());
    }
    Ok(())
}

/// Shape checks that need no ledger state.
pub fn validate_basic(tx: &Transaction, config: &Config, ledger_seq: u32) -> TerResult {
    if tx
        .last_ledger_sequence
        .is_some_and(|last| last < ledger_seq)
    {
        return Err(Retry::PastLedger.into());
    }
    if tx.fee < 0 {
        return Err(Fault::Invalid.into());
    }
    let name = tx.tx_type().name();
    if config
        .engine
        .disabled_transactions
        .iter()
        .any(|disabled| disabled == name)
    {
        return Err(Fault::Unknown.into());
    }
    Ok(())
}

/// Whether the signing key may act for the source account.
///
/// Unsigned transactions only get here under `NO_CHECK_SIGN` and are not
/// checked.
pub fn validate_authorization(tx: &Transaction, root: &AccountRoot) -> TerResult {
    let Some(signer) = tx.signer() else {
        return Ok(());
    };
    let is_master = signer == tx.source;
    match tx.tx_type() {
        TransactionType::Claim if !is_master => Err(Malformed::BadClaimId.into()),
        TransactionType::PasswordSet if !is_master => Err(Malformed::BadSetId.into()),
        _ if is_master || root.authorized_key == Some(signer) => Ok(()),
        _ if root.is_claimed() => Err(Retry::BadAuth.into()),
        _ => Err(Rejected::BadAuthMaster.into()),
    }
}

/// Sequence check against the account's next expected sequence.
pub fn validate_sequence(
    tx: &Transaction,
    root: &AccountRoot,
    ledger: &Ledger,
    tx_id: &Hash256,
) -> TerResult {
    if tx.tx_type().is_prepaid() {
        return if tx.sequence == 0 {
            Ok(())
        } else {
            Err(Retry::BadSeq.into())
        };
    }
    if tx.sequence > root.sequence {
        return Err(Retry::PreSeq.into());
    }
    if tx.sequence < root.sequence {
        return if ledger.has_transaction(tx_id) {
            Err(Rejected::Already.into())
        } else {
            Err(Retry::PastSeq.into())
        };
    }
    Ok(())
}

/// Fee the transaction must offer at a load factor of 1.0.
pub fn required_fee(tx: &Transaction, config: &Config, ledger: &Ledger) -> i64 {
    let fees = &config.fees;
    match &tx.kind {
        TransactionKind::Claim(_) | TransactionKind::PasswordSet(_) => 0,
        TransactionKind::Payment(op) if op.flags.contains(PaymentFlags::CREATE_ACCOUNT) => {
            fees.account_create_fee
        }
        TransactionKind::WalletAdd(_) => fees.account_create_fee,
        TransactionKind::NicknameSet(op)
            if !op.flags.contains(NicknameFlags::RELEASE)
                && !ledger.contains(&index::nickname(&op.nickname)) =>
        {
            fees.nickname_create_fee
        }
        _ => fees.base_fee,
    }
}

/// Fee sufficiency and affordability.
///
/// Sufficiency is skipped under `NO_CHECK_FEE`; the source must always be
/// able to pay what it offered.
pub fn validate_fee(
    tx: &Transaction,
    root: &AccountRoot,
    cost: i64,
    context: &LedgerContext<'_>,
) -> TerResult {
    if !context.params.contains(TransactionEngineParams::NO_CHECK_FEE) {
        if tx.fee < cost {
            return Err(Fault::InsufFeeP.into());
        }
        let offered = i128::from(tx.fee) * i128::from(LOAD_BASE);
        let needed = i128::from(cost) * i128::from(context.config.fees.load_factor);
        if offered < needed {
            return Err(Retry::InsufFeeT.into());
        }
    }
    if root.balance < tx.fee {
        return Err(Retry::InsufFeeB.into());
    }
    Ok(())
}
