//! newcoin-replay: apply a scenario of transactions and print the outcomes.
//!
//! ```bash
//! newcoin-replay --config newcoin.toml scenario.json --no-check-fee
//! ```
//!
//! Prints one `<position> <result token>` line per transaction, then the
//! state hash of the resulting ledger.

mod scenario;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use newcoin_common::config::LogLevel;
use newcoin_common::{logging, Config};
use newcoin_tx::{TransactionEngine, TransactionEngineParams};

use crate::scenario::Scenario;

/// Apply newcoin transactions to a ledger
#[derive(Parser)]
#[command(name = "newcoin-replay")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Scenario file (JSON)
    #[arg(value_name = "SCENARIO")]
    scenario: PathBuf,

    /// Skip signature verification
    #[arg(long)]
    no_check_sign: bool,

    /// Skip the fee sufficiency check
    #[arg(long)]
    no_check_fee: bool,

    /// Burn fees from the coin total and re-verify it
    #[arg(long)]
    update_total: bool,

    /// Enable verbose logging (debug level)
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn params(&self) -> TransactionEngineParams {
        let mut params = TransactionEngineParams::NONE;
        params.set(TransactionEngineParams::NO_CHECK_SIGN, self.no_check_sign);
        params.set(TransactionEngineParams::NO_CHECK_FEE, self.no_check_fee);
        params.set(TransactionEngineParams::UPDATE_TOTAL_COINS, self.update_total);
        params
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("loading configuration {}", path.display()))?,
        None => Config::default(),
    };
    if cli.verbose {
        config.logging.level = LogLevel::Debug;
    }
    logging::init(&config.logging)?;
    tracing::debug!(config = ?cli.config, "Logging initialized");

    let scenario = Scenario::from_file(&cli.scenario)?;
    let engine = TransactionEngine::new(config)?;
    let report = scenario.run(&engine, cli.params())?;

    for (position, result) in report.results.iter().enumerate() {
        println!("{} {}", position, result.token());
    }
    println!("state_hash {}", report.state_hash()?);
    Ok(())
}
