//! Scenario files: a starting ledger and the transactions to apply to it.
//!
//! ```json
//! {
//!   "genesis": { "master_seed": "0101...01", "total_coins": 100000000000 },
//!   "transactions": [
//!     { "tx": { "source": "...", "sequence": 1, "fee": 10, "kind": { ... } },
//!       "seed": "0101...01" }
//!   ]
//! }
//! ```
//!
//! Either `genesis` or a full serialized `ledger` gives the starting state.
//! A transaction with a `seed` is signed with that key before it is applied.

use std::path::Path;

use anyhow::{bail, Context};
use newcoin_common::Hash256;
use newcoin_crypto::SecretKey;
use newcoin_ledger::Ledger;
use newcoin_tx::{Ter, Transaction, TransactionEngine, TransactionEngineParams};
use serde::Deserialize;
use tracing::{debug, info};

#[derive(Debug, Clone, Deserialize)]
pub struct Genesis {
    /// Hex seed of the master key.
    pub master_seed: String,
    pub total_coins: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioTx {
    pub tx: Transaction,
    /// Hex seed to sign with.
    #[serde(default)]
    pub seed: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub genesis: Option<Genesis>,
    #[serde(default)]
    pub ledger: Option<Ledger>,
    #[serde(default)]
    pub transactions: Vec<ScenarioTx>,
}

/// What applying a scenario produced.
#[derive(Debug)]
pub struct Report {
    pub results: Vec<Ter>,
    pub ledger: Ledger,
}

impl Report {
    pub fn state_hash(&self) -> anyhow::Result<Hash256> {
        Ok(self.ledger.state_hash()?)
    }
}

impl Scenario {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("parsing scenario {}", path.display()))
    }

    /// The ledger the scenario starts from.
    pub fn starting_ledger(&self) -> anyhow::Result<Ledger> {
        match (&self.ledger, &self.genesis) {
            (Some(ledger), None) => Ok(ledger.clone()),
            (None, Some(genesis)) => {
                let master = parse_seed(&genesis.master_seed)?.public_key().account_id();
                info!(master = %master, total_coins = genesis.total_coins, "Starting from genesis");
                Ok(Ledger::genesis(master, genesis.total_coins))
            }
            (Some(_), Some(_)) => bail!("scenario gives both a ledger and a genesis"),
            (None, None) => bail!("scenario gives neither a ledger nor a genesis"),
        }
    }

    /// Applies every transaction in order.
    pub fn run(
        &self,
        engine: &TransactionEngine,
        params: TransactionEngineParams,
    ) -> anyhow::Result<Report> {
        let mut ledger = self.starting_ledger()?;
        let mut results = Vec::with_capacity(self.transactions.len());
        for (position, entry) in self.transactions.iter().enumerate() {
            let tx = match &entry.seed {
                Some(seed) => entry
                    .tx
                    .clone()
                    .signed(&parse_seed(seed)?)
                    .with_context(|| format!("signing transaction {}", position))?,
                None => entry.tx.clone(),
            };
            let result = engine.apply_transaction(&tx, params, &mut ledger);
            debug!(position, result = result.token(), "Applied scenario transaction");
            results.push(result);
        }
        Ok(Report { results, ledger })
    }
}

fn parse_seed(seed: &str) -> anyhow::Result<SecretKey> {
    SecretKey::from_hex(seed).context("seed must be 32 hex-encoded bytes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use newcoin_common::{AccountId, Config};
    use newcoin_ledger::Amount;
    use newcoin_tx::{PaymentFlags, PaymentTx, Retry, TransactionKind};
    use std::io::Write;

    fn seed_hex(byte: u8) -> String {
        hex::encode([byte; 32])
    }

    fn scenario_json() -> String {
        let master = SecretKey::from_seed(&[1u8; 32]).public_key().account_id();
        let create = Transaction::new(
            master,
            1,
            1_000,
            TransactionKind::Payment(PaymentTx {
                destination: AccountId([9u8; 20]),
                amount: Amount::native(50_000),
                send_max: None,
                paths: None,
                flags: PaymentFlags::CREATE_ACCOUNT,
            }),
        );
        let mut again = create.clone();
        again.sequence = 2;
        serde_json::json!({
            "genesis": { "master_seed": seed_hex(1), "total_coins": 1_000_000 },
            "transactions": [
                { "tx": create, "seed": seed_hex(1) },
                { "tx": again, "seed": seed_hex(1) },
            ],
        })
        .to_string()
    }

    #[test]
    fn test_scenario_from_file_runs_in_order() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(scenario_json().as_bytes()).unwrap();

        let scenario = Scenario::from_file(file.path()).unwrap();
        let engine = TransactionEngine::new(Config::default()).unwrap();
        let report = scenario.run(&engine, TransactionEngineParams::NONE).unwrap();
        assert_eq!(
            report.results,
            vec![Ter::Success, Ter::Retriable(Retry::Created)]
        );
        assert!(report.ledger.account(&AccountId([9u8; 20])).unwrap().is_some());

        let rerun = scenario.run(&engine, TransactionEngineParams::NONE).unwrap();
        assert_eq!(rerun.state_hash().unwrap(), report.state_hash().unwrap());
    }

    #[test]
    fn test_starting_state_must_be_unambiguous() {
        let empty: Scenario = serde_json::from_str("{}").unwrap();
        assert!(empty.starting_ledger().is_err());

        let bad_seed: Scenario = serde_json::from_str(
            r#"{ "genesis": { "master_seed": "abcd", "total_coins": 5 } }"#,
        )
        .unwrap();
        assert!(bad_seed.starting_ledger().is_err());
    }
}
