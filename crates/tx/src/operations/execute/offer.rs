//! Offer execution and order book crossing.
//!
//! An offer sits in two directories: its owner's, and the book directory
//! for its pair of issues at its quality. Book directories of one pair sort
//! together by quality, so scanning a book best-first is a range walk.

use newcoin_common::math::{mul_div, Rounding};
use newcoin_common::{AccountId, Hash256};
use newcoin_ledger::{index, Amount, DirectoryNode, Offer};
use tracing::{debug, trace};

use crate::directory::{dir_add, dir_delete, dir_entries, owner_dir_add, owner_dir_delete};
use crate::frame::{OfferFlags, OfferTx};
use crate::result::{Malformed, Retry, TerResult};
use crate::state::{inconsistent, LedgerStateManager};
use crate::validation::LedgerContext;

use super::ripple::{deliver, holding, receivable};

/// Execute an Offer transaction.
///
/// Cancels first (if asked), then creates. A `TAKE` offer crosses the
/// opposite book before the remainder is placed.
pub fn execute_offer(
    op: &OfferTx,
    source: &AccountId,
    sequence: u32,
    state: &mut LedgerStateManager<'_>,
    context: &LedgerContext<'_>,
) -> TerResult {
    let create = match (&op.taker_pays, &op.taker_gets) {
        (Some(pays), Some(gets)) => Some((*pays, *gets)),
        (None, None) if op.cancel_sequence.is_some() => None,
        _ => return Err(Malformed::BadOffer.into()),
    };
    if let Some((pays, gets)) = &create {
        for amount in [pays, gets] {
            if !amount.is_positive() || !amount.is_well_formed() {
                return Err(Malformed::BadAmount.into());
            }
        }
        if pays.issue() == gets.issue() {
            return Err(Malformed::Redundant.into());
        }
    }

    if let Some(cancel) = op.cancel_sequence {
        let offer_index = index::offer(source, cancel);
        let offer = state.load::<Offer>(&offer_index)?.ok_or(Retry::NoOffer)?;
        debug!(account = %source, sequence = cancel, "Cancelling offer");
        remove_offer(state, &offer_index, &offer)?;
    }

    let Some((mut pays, mut gets)) = create else {
        return Ok(());
    };
    if holding(state, source, &gets.issue())? <= 0 {
        return Err(Retry::Unfunded.into());
    }

    if op.flags.contains(OfferFlags::TAKE) {
        let (got, paid) = cross_book(state, source, &pays, &gets)?;
        pays.value -= got;
        gets.value -= paid;
        debug!(account = %source, got, paid, "Crossed book");
    }
    if pays.value <= 0 || gets.value <= 0 {
        return Ok(());
    }
    place_offer(state, context, source, sequence, pays, gets)
}

fn place_offer(
    state: &mut LedgerStateManager<'_>,
    context: &LedgerContext<'_>,
    owner: &AccountId,
    sequence: u32,
    taker_pays: Amount,
    taker_gets: Amount,
) -> TerResult {
    let quality = index::offer_quality(taker_pays.value, taker_gets.value)
        .ok_or(Malformed::BadAmount)?;
    let book = index::book_dir(
        &index::book_base(&taker_pays.issue(), &taker_gets.issue()),
        quality,
    );
    let offer_index = index::offer(owner, sequence);
    let dir_config = &context.config.directory;
    let owner_node = owner_dir_add(state, dir_config, owner, offer_index)?;
    let book_node = dir_add(state, dir_config, &book, None, offer_index)?;
    trace!(offer = %offer_index, quality, "Placing offer");
    state.create(
        offer_index,
        Offer {
            account: *owner,
            sequence,
            taker_pays,
            taker_gets,
            owner_node,
            book_directory: book,
            book_node,
        },
    )
}

/// Removes an offer from both of its directories and the ledger.
pub(crate) fn remove_offer(
    state: &mut LedgerStateManager<'_>,
    offer_index: &Hash256,
    offer: &Offer,
) -> TerResult {
    owner_dir_delete(state, &offer.account, offer.owner_node, offer_index)?;
    dir_delete(state, offer.book_node, &offer.book_directory, offer_index)?;
    state.delete(offer_index)
}

/// Takes `got` of a resting offer's `taker_gets`, paying its price.
///
/// Returns what the taker paid. A fully taken offer is removed.
pub(crate) fn fill_offer(
    state: &mut LedgerStateManager<'_>,
    taker: &AccountId,
    offer_index: &Hash256,
    mut offer: Offer,
    got: i64,
) -> TerResult<i64> {
    let paid = mul_div(got, offer.taker_pays.value, offer.taker_gets.value, Rounding::Up)
        .map_err(|err| inconsistent(format!("pricing offer {}: {}", offer_index, err)))?;

    deliver(state, taker, &offer.account, &offer.taker_pays.with_value(paid))?;
    deliver(state, &offer.account, taker, &offer.taker_gets.with_value(got))?;

    offer.taker_gets.value -= got;
    offer.taker_pays.value -= paid;
    if offer.taker_gets.value <= 0 || offer.taker_pays.value <= 0 {
        trace!(offer = %offer_index, "Offer filled");
        remove_offer(state, offer_index, &offer)?;
    } else {
        state.update(*offer_index, offer)?;
    }
    Ok(paid)
}

/// Crosses resting offers that give what `taker` wants, best quality first,
/// while their price is no worse than `taker`'s own.
///
/// Returns `(got, paid)`.
fn cross_book(
    state: &mut LedgerStateManager<'_>,
    taker: &AccountId,
    wants: &Amount,
    gives: &Amount,
) -> TerResult<(i64, i64)> {
    // Resting offers in the opposite book pay what we give.
    let base = index::book_base(&gives.issue(), &wants.issue());
    let Some(limit) = index::offer_quality(gives.value, wants.value) else {
        return Ok((0, 0));
    };

    let (mut got, mut paid) = (0i64, 0i64);
    for book in state.indexes_in(base..=index::book_end(&base)) {
        if index::book_quality(&book) > limit {
            break;
        }
        match state.load::<DirectoryNode>(&book)? {
            Some(page) if page.root == book => {}
            _ => continue,
        }
        for offer_index in dir_entries(state, &book)? {
            let remaining_wants = wants.value - got;
            let remaining_gives = gives.value - paid;
            if remaining_wants <= 0 || remaining_gives <= 0 {
                return Ok((got, paid));
            }
            let Some(offer) = state.load::<Offer>(&offer_index)? else {
                continue;
            };
            if offer.account == *taker {
                continue;
            }
            let take = affordable_take(state, taker, &offer, remaining_wants, remaining_gives)?;
            if take <= 0 {
                continue;
            }
            paid += fill_offer(state, taker, &offer_index, offer, take)?;
            got += take;
        }
    }
    Ok((got, paid))
}

/// Largest amount of `offer.taker_gets` both sides can settle.
fn affordable_take(
    state: &mut LedgerStateManager<'_>,
    taker: &AccountId,
    offer: &Offer,
    wants: i64,
    gives: i64,
) -> TerResult<i64> {
    let owner_has = holding(state, &offer.account, &offer.taker_gets.issue())?;
    let taker_accepts = receivable(state, taker, &offer.taker_gets.issue())?;
    let take = offer
        .taker_gets
        .value
        .min(wants)
        .min(owner_has)
        .min(taker_accepts);
    if take <= 0 {
        return Ok(0);
    }

    let taker_has = holding(state, taker, &offer.taker_pays.issue())?;
    let owner_accepts = receivable(state, &offer.account, &offer.taker_pays.issue())?;
    let pay_cap = gives.min(taker_has).min(owner_accepts);
    let (offer_pays, offer_gets) = (offer.taker_pays.value, offer.taker_gets.value);
    let price = |got| mul_div(got, offer_pays, offer_gets, Rounding::Up);
    match price(take) {
        Ok(pay) if pay <= pay_cap => Ok(take),
        _ => {
            // Scale down to what the taker can pay, then make sure rounding
            // the price up still fits.
            let scaled = mul_div(pay_cap, offer_gets, offer_pays, Rounding::Down)
                .unwrap_or(0)
                .min(take);
            match price(scaled) {
                Ok(pay) if pay <= pay_cap => Ok(scaled),
                _ => Ok(0),
            }
        }
    }
}
