//! Payment execution.
//!
//! Native payments move drops between account roots. Issued payments ripple
//! credit along a chain of trust lines: each hop moves value from one
//! account to the next, and every intermediary may keep a transfer fee.

use std::collections::BTreeSet;

use newcoin_common::math::{apply_rate, Rounding, RATE_ONE};
use newcoin_common::AccountId;
use newcoin_ledger::{AccountRoot, Amount};
use tracing::{debug, trace};

use crate::frame::{Path, PaymentFlags, PaymentTx};
use crate::result::{Malformed, Rejected, Retry, TerResult};
use crate::state::LedgerStateManager;
use crate::validation::LedgerContext;

use super::ripple::{line_capacity, load_line, ripple_credit, transfer_native};

/// One step of a planned ripple: `value` moves from `from` to `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Hop {
    from: AccountId,
    to: AccountId,
    value: i64,
}

/// Execute a Payment transaction.
pub fn execute_payment(
    op: &PaymentTx,
    source: &AccountId,
    state: &mut LedgerStateManager<'_>,
    context: &LedgerContext<'_>,
) -> TerResult {
    let amount = &op.amount;
    let create = op.flags.contains(PaymentFlags::CREATE_ACCOUNT);

    if op.destination.is_zero() {
        return Err(Malformed::DstNeeded.into());
    }
    if !amount.is_positive() || !amount.is_well_formed() {
        return Err(Malformed::BadAmount.into());
    }
    if op.destination == *source {
        return Err(Malformed::Redundant.into());
    }
    if amount.is_native() && op.send_max.is_some() {
        return Err(Malformed::ExplicitXns.into());
    }
    if create && !amount.is_native() {
        return Err(Malformed::CreateXns.into());
    }
    if let Some(max) = &op.send_max {
        if max.currency != amount.currency || !max.is_positive() {
            return Err(Malformed::BadAmount.into());
        }
    }

    let destination = state.load_account(&op.destination)?;
    match (destination.is_some(), create) {
        (false, false) => return Err(Retry::NoDst.into()),
        (true, true) => return Err(Retry::Created.into()),
        _ => {}
    }

    if amount.is_native() {
        if create {
            return create_account(state, source, &op.destination, amount.value);
        }
        return transfer_native(state, source, &op.destination, amount.value);
    }
    ripple_payment(op, source, state, context)
}

fn create_account(
    state: &mut LedgerStateManager<'_>,
    source: &AccountId,
    destination: &AccountId,
    value: i64,
) -> TerResult {
    let mut sender = state.load_account(source)?.ok_or(Retry::NoAccount)?;
    if sender.balance < value {
        return Err(Retry::Unfunded.into());
    }
    sender.balance -= value;
    state.update_account(sender)?;
    debug!(account = %destination, funder = %source, value, "Creating account");
    state.create_account(AccountRoot::new(*destination, value))
}

fn ripple_payment(
    op: &PaymentTx,
    source: &AccountId,
    state: &mut LedgerStateManager<'_>,
    context: &LedgerContext<'_>,
) -> TerResult {
    let candidates = match &op.paths {
        Some(paths) => {
            check_explicit_paths(paths, source, &op.destination, state, context)?;
            paths.clone()
        }
        None => default_paths(op, source, state, context),
    };

    let max_cost = op.send_max.map_or(op.amount.value, |max| max.value);
    for path in &candidates {
        let Some(hops) = plan(state, source, &op.destination, path, &op.amount)? else {
            trace!(?path, "Path cannot carry payment");
            continue;
        };
        let cost = hops.first().map_or(0, |hop| hop.value);
        if cost > max_cost {
            trace!(?path, cost, max_cost, "Path too expensive");
            continue;
        }
        for hop in &hops {
            ripple_credit(state, &hop.from, &hop.to, &op.amount.currency, hop.value)?;
        }
        debug!(?path, cost, "Rippled payment");
        return Ok(());
    }
    Err(Retry::NoPath.into())
}

/// Explicit paths must be non-empty, well formed and name existing accounts.
fn check_explicit_paths(
    paths: &[Path],
    source: &AccountId,
    destination: &AccountId,
    state: &mut LedgerStateManager<'_>,
    context: &LedgerContext<'_>,
) -> TerResult {
    if paths.is_empty() {
        return Err(Malformed::RippleEmpty.into());
    }
    for path in paths {
        if !is_well_formed(path, source, destination, context.config.paths.max_path_length) {
            return Err(Malformed::BadPath.into());
        }
        for account in path {
            if state.load_account(account)?.is_none() {
                return Err(Rejected::BadRipple.into());
            }
        }
    }
    Ok(())
}

fn is_well_formed(
    path: &Path,
    source: &AccountId,
    destination: &AccountId,
    max_path_length: usize,
) -> bool {
    let mut seen = BTreeSet::new();
    path.len() + 2 <= max_path_length
        && path.iter().all(|account| {
            !account.is_zero() && account != source && account != destination && seen.insert(*account)
        })
}

/// The direct line, the issuer's two lines, then the pathfinder's proposals.
fn default_paths(
    op: &PaymentTx,
    source: &AccountId,
    state: &LedgerStateManager<'_>,
    context: &LedgerContext<'_>,
) -> Vec<Path> {
    let max_path_length = context.config.paths.max_path_length;
    let mut paths: Vec<Path> = vec![Vec::new()];
    let issuer = op.amount.issuer;
    if issuer != *source && issuer != op.destination {
        paths.push(vec![issuer]);
    }
    let found = context
        .pathfinder
        .find_paths(state.ledger(), source, &op.destination, &op.amount);
    for path in found {
        if is_well_formed(&path, source, &op.destination, max_path_length) && !paths.contains(&path) {
            paths.push(path);
        }
    }
    paths
}

/// Works backwards from the destination to find what each hop must carry.
///
/// `None` when some hop lacks a line or the capacity.
fn plan(
    state: &mut LedgerStateManager<'_>,
    source: &AccountId,
    destination: &AccountId,
    path: &Path,
    amount: &Amount,
) -> TerResult<Option<Vec<Hop>>> {
    let mut accounts = Vec::with_capacity(path.len() + 2);
    accounts.push(*source);
    accounts.extend_from_slice(path);
    accounts.push(*destination);

    let ledger_seq = state.ledger_seq();
    let mut hops = Vec::with_capacity(accounts.len() - 1);
    let mut value = amount.value;
    for (position, pair) in accounts.windows(2).enumerate().rev() {
        let (from, to) = (pair[0], pair[1]);
        let Some(line) = load_line(state, &from, &to, &amount.currency)? else {
            return Ok(None);
        };
        if line_capacity(&line, &to) < value {
            return Ok(None);
        }
        hops.push(Hop { from, to, value });

        // An intermediary forwarding `value` must first receive it plus its fee.
        if position > 0 {
            let Some(root) = state.load_account(&from)? else {
                return Ok(None);
            };
            match root.active_transit_rate(ledger_seq) {
                Some(rate) if rate != RATE_ONE => match apply_rate(value, rate, Rounding::Up) {
                    Ok(charged) => value = charged,
                    Err(_) => return Ok(None),
                },
                _ => {}
            }
        }
    }
    hops.reverse();
    Ok(Some(hops))
}
