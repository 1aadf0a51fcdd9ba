//! Fixtures shared by handler and engine tests.

use newcoin_common::{AccountId, Config, Currency, Hash256};
use newcoin_crypto::SecretKey;
use newcoin_ledger::{index, AccountRoot, Amount, EntryKind, Ledger, LedgerEntry, RippleState};

use crate::frame::{CreditSetTx, GeneratorProof, TransitSetTx};
use crate::operations::execute::ripple::deliver;
use crate::operations::execute::{execute_credit_set, execute_transit_set};
use crate::params::TransactionEngineParams;
use crate::pathfind::TrustGraphPathFinder;
use crate::result::TerResult;
use crate::signature_checker::Ed25519Verifier;
use crate::state::LedgerStateManager;
use crate::validation::LedgerContext;

/// Coins in a test genesis ledger.
pub const GENESIS_COINS: i64 = 100_000_000_000;

/// Deterministic key from a one-byte seed.
pub fn secret(seed: u8) -> SecretKey {
    SecretKey::from_seed(&[seed; 32])
}

pub fn usd() -> Currency {
    Currency::from_code("USD").expect("USD is a valid currency code")
}

/// A generator proof for `generator`, signed by `key`.
pub fn generator_proof(key: &SecretKey, generator: &[u8]) -> GeneratorProof {
    GeneratorProof {
        generator: generator.to_vec(),
        public_key: key.public_key(),
        signature: key.sign(Hash256::sha512_half(generator).as_bytes()),
    }
}

/// A genesis ledger plus the collaborators handlers expect.
///
/// [`TestLedger::run`] executes a closure the way the engine executes a
/// handler: staged changes are committed on success and dropped on failure.
pub struct TestLedger {
    ledger: Ledger,
    master: AccountId,
    config: Config,
    verifier: Ed25519Verifier,
    pathfinder: TrustGraphPathFinder,
}

impl TestLedger {
    /// Genesis ledger whose coins are held by `secret(1)`.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let master = secret(1).public_key().account_id();
        Self {
            ledger: Ledger::genesis(master, GENESIS_COINS),
            master,
            pathfinder: TrustGraphPathFinder::new(config.paths),
            config,
            verifier: Ed25519Verifier,
        }
    }

    pub fn master(&self) -> AccountId {
        self.master
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// A copy of the current ledger.
    pub fn ledger(&self) -> Ledger {
        self.ledger.clone()
    }

    pub fn ledger_ref(&self) -> &Ledger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut Ledger {
        &mut self.ledger
    }

    pub fn context(&self) -> LedgerContext<'_> {
        LedgerContext::new(
            &self.config,
            TransactionEngineParams::NONE,
            &self.verifier,
            &self.pathfinder,
        )
    }

    /// Creates an account for `key` holding `drops`, taken from the master.
    pub fn fund(&mut self, key: &SecretKey, drops: i64) -> AccountId {
        let account = key.public_key().account_id();
        self.put_root(AccountRoot::new(account, drops));
        let mut master = self.root(&self.master);
        master.balance -= drops;
        self.put_root(master);
        account
    }

    /// Runs `f` against a fresh staging area and commits on success.
    pub fn run<F>(&mut self, f: F) -> TerResult
    where
        F: FnOnce(&mut LedgerStateManager<'_>, &LedgerContext<'_>) -> TerResult,
    {
        let changes = {
            let mut state = LedgerStateManager::new(&self.ledger);
            let context = self.context();
            f(&mut state, &context)?;
            state.into_changes()
        };
        let sequence = self.ledger.current_sequence();
        changes.apply_to(&mut self.ledger, sequence);
        Ok(())
    }

    /// `holder` extends `limit` of `currency` to `issuer`.
    pub fn trust(&mut self, holder: &AccountId, issuer: &AccountId, currency: Currency, limit: i64) {
        let op = CreditSetTx {
            destination: *issuer,
            limit: Amount::issued(limit, currency, *issuer),
        };
        let holder = *holder;
        self.run(|state, ctx| execute_credit_set(&op, &holder, state, ctx))
            .expect("trust line set");
    }

    /// Moves `value` of `issuer`'s `currency` from `from` to `to`.
    pub fn pay_issued(&mut self, issuer: &AccountId, to: &AccountId, currency: Currency, value: i64) {
        let amount = Amount::issued(value, currency, *issuer);
        let (from, to) = (*issuer, *to);
        self.run(|state, _| deliver(state, &from, &to, &amount))
            .expect("issued payment delivered");
    }

    /// Sets `account`'s transfer rate with no start or expiry.
    pub fn set_transit_rate(&mut self, account: &AccountId, rate: u32) {
        let op = TransitSetTx {
            rate: Some(rate),
            ..Default::default()
        };
        let account = *account;
        self.run(|state, ctx| execute_transit_set(&op, &account, state, ctx))
            .expect("transit rate set");
    }

    /// What `holder` holds of `issuer`'s `currency`; 0 without a line.
    pub fn issued_balance(&self, holder: &AccountId, issuer: &AccountId, currency: Currency) -> i64 {
        self.ledger
            .get_as::<RippleState>(&index::ripple_state(holder, issuer, &currency))
            .expect("trust line entry")
            .map_or(0, |line| line.balance_for(holder))
    }

    fn root(&self, account: &AccountId) -> AccountRoot {
        self.ledger
            .account(account)
            .expect("account root entry")
            .cloned()
            .expect("account exists")
    }

    fn put_root(&mut self, root: AccountRoot) {
        let index = index::account_root(&root.account);
        self.ledger.put(LedgerEntry::new(index, root.into_data()));
    }
}

impl Default for TestLedger {
    fn default() -> Self {
        Self::new()
    }
}
