//! The transaction engine.
//!
//! [`TransactionEngine`] owns the configuration and the signature and path
//! collaborators, and optionally a default and an alternate target ledger.
//! Every apply call runs the common checks, charges the fee, dispatches to
//! the type handler and then commits the staged change set in one step.
//! A failed call leaves the target ledger exactly as it was.

use newcoin_common::Config;
use newcoin_ledger::{Ledger, SharedLedger};
use tracing::{debug, info, warn};

use crate::frame::{Transaction, TransactionType};
use crate::operations::execute::execute_transaction;
use crate::params::TransactionEngineParams;
use crate::pathfind::{PathFinder, TrustGraphPathFinder};
use crate::result::{Fault, Retry, Ter, TerResult};
use crate::signature_checker::{Ed25519Verifier, SignatureVerifier};
use crate::state::{inconsistent, LedgerStateManager};
use crate::validation::{
    required_fee, validate_authorization, validate_basic, validate_fee, validate_sequence,
    validate_signature, LedgerContext,
};

/// Applies transactions to ledgers.
pub struct TransactionEngine {
    default_ledger: Option<SharedLedger>,
    alternate_ledger: Option<SharedLedger>,
    config: Config,
    verifier: Box<dyn SignatureVerifier>,
    pathfinder: Box<dyn PathFinder>,
}

impl TransactionEngine {
    /// An engine with Ed25519 verification and the trust-graph pathfinder.
    ///
    /// Fails with [`crate::TxError::UnknownType`] if `[engine] disabled_transactions`
    /// names a transaction type that does not exist.
    pub fn new(config: Config) -> crate::Result<Self> {
        for name in &config.engine.disabled_transactions {
            TransactionType::from_name(name)?;
        }
        let pathfinder = TrustGraphPathFinder::new(config.paths);
        Ok(Self {
            default_ledger: None,
            alternate_ledger: None,
            config,
            verifier: Box::new(Ed25519Verifier),
            pathfinder: Box::new(pathfinder),
        })
    }

    pub fn with_verifier(mut self, verifier: impl SignatureVerifier + 'static) -> Self {
        self.verifier = Box::new(verifier);
        self
    }

    pub fn with_pathfinder(mut self, pathfinder: impl PathFinder + 'static) -> Self {
        self.pathfinder = Box::new(pathfinder);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn default_ledger(&self) -> Option<&SharedLedger> {
        self.default_ledger.as_ref()
    }

    pub fn alternate_ledger(&self) -> Option<&SharedLedger> {
        self.alternate_ledger.as_ref()
    }

    pub fn set_default_ledger(&mut self, ledger: SharedLedger) {
        self.default_ledger = Some(ledger);
    }

    pub fn set_alternate_ledger(&mut self, ledger: Option<SharedLedger>) {
        self.alternate_ledger = ledger;
    }

    /// Replaces the default ledger and drops the alternate.
    pub fn set_ledger(&mut self, ledger: SharedLedger) {
        self.default_ledger = Some(ledger);
        self.alternate_ledger = None;
    }

    /// Resolves the ledger a transaction targets.
    ///
    /// Sequence 0 means the default ledger. Otherwise the sequence must match
    /// the default or the alternate ledger.
    pub fn get_transaction_ledger(&self, target_sequence: u32) -> TerResult<SharedLedger> {
        if let Some(default) = &self.default_ledger {
            if target_sequence == 0 || default.read().current_sequence() == target_sequence {
                return Ok(default.clone());
            }
        }
        if let Some(alternate) = &self.alternate_ledger {
            if alternate.read().current_sequence() == target_sequence {
                return Ok(alternate.clone());
            }
        }
        debug!(target_sequence, "No ledger for transaction");
        Err(Fault::BadLedger.into())
    }

    /// Applies `tx` to the ledger with sequence `target_sequence`.
    ///
    /// The ledger's write lock is held for this one call.
    pub fn apply_transaction_at(
        &self,
        tx: &Transaction,
        params: TransactionEngineParams,
        target_sequence: u32,
    ) -> Ter {
        match self.get_transaction_ledger(target_sequence) {
            Ok(ledger) => {
                let mut ledger = ledger.write();
                self.apply_transaction(tx, params, &mut ledger)
            }
            Err(result) => result,
        }
    }

    /// Applies `tx` to `ledger`.
    pub fn apply_transaction(
        &self,
        tx: &Transaction,
        params: TransactionEngineParams,
        ledger: &mut Ledger,
    ) -> Ter {
        let result: Ter = self.try_apply(tx, params, ledger).into();
        match result {
            Ter::Success => {
                info!(
                    tx_type = %tx.tx_type(),
                    account = %tx.source,
                    seq = tx.sequence,
                    "Applied transaction"
                );
            }
            Ter::EngineFault(_) => {
                warn!(
                    tx_type = %tx.tx_type(),
                    account = %tx.source,
                    result = result.token(),
                    "Engine fault: {}",
                    result.human()
                );
            }
            _ => {
                debug!(
                    tx_type = %tx.tx_type(),
                    account = %tx.source,
                    result = result.token(),
                    "Transaction not applied"
                );
            }
        }
        result
    }

    fn try_apply(
        &self,
        tx: &Transaction,
        params: TransactionEngineParams,
        ledger: &mut Ledger,
    ) -> TerResult {
        let context = LedgerContext::new(
            &self.config,
            params,
            self.verifier.as_ref(),
            self.pathfinder.as_ref(),
        );
        let ledger_seq = ledger.current_sequence();

        validate_signature(tx, &context)?;
        validate_basic(tx, &self.config, ledger_seq)?;
        let tx_id = tx.id().map_err(inconsistent)?;

        let changes = {
            let snapshot: &Ledger = ledger;
            let mut state = LedgerStateManager::new(snapshot);
            let mut source = state.load_account(&tx.source)?.ok_or(Retry::NoAccount)?;
            validate_authorization(tx, &source)?;
            validate_sequence(tx, &source, snapshot, &tx_id)?;

            let cost = required_fee(tx, &self.config, snapshot);
            validate_fee(tx, &source, cost, &context)?;
            debug!(%tx_id, fee = tx.fee, cost, "Charging fee");

            source.balance -= tx.fee;
            if !tx.tx_type().is_prepaid() {
                source.sequence = source.sequence.wrapping_add(1);
            }
            state.update_account(source)?;

            execute_transaction(tx, &mut state, &context)?;

            if params.contains(TransactionEngineParams::UPDATE_TOTAL_COINS) {
                let expected = snapshot.total_coins() - tx.fee;
                let derived = state.native_total();
                if derived != Some(expected) {
                    warn!(expected, ?derived, "Coin total does not match balances");
                    return Err(Fault::Failed.into());
                }
            }
            state.into_changes()
        };

        debug!(%tx_id, entries = changes.len(), "Committing change set");
        changes.apply_to(ledger, ledger_seq);
        if params.contains(TransactionEngineParams::UPDATE_TOTAL_COINS) {
            ledger.set_total_coins(ledger.total_coins() - tx.fee);
        }
        ledger.record_transaction(tx_id);
        Ok(())
    }
}

impl std::fmt::Debug for TransactionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionEngine")
            .field("has_default_ledger", &self.default_ledger.is_some())
            .field("has_alternate_ledger", &self.alternate_ledger.is_some())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
