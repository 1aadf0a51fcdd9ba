//! NicknameSet execution.

use newcoin_common::AccountId;
use newcoin_ledger::{index, Nickname};

use crate::directory::{owner_dir_add, owner_dir_delete};
use crate::frame::{NicknameFlags, NicknameSetTx};
use crate::result::{Fault, Malformed, Retry, TerResult};
use crate::state::LedgerStateManager;
use crate::validation::LedgerContext;

/// Execute a NicknameSet transaction.
///
/// Claims a free nickname for the source, updates the minimum offer on a
/// nickname it already holds, or with `RELEASE` gives the nickname up.
pub fn execute_nickname_set(
    op: &NicknameSetTx,
    source: &AccountId,
    state: &mut LedgerStateManager<'_>,
    context: &LedgerContext<'_>,
) -> TerResult {
    let release = op.flags.contains(NicknameFlags::RELEASE);
    if let Some(minimum) = &op.minimum_offer {
        if release {
            return Err(Fault::Invalid.into());
        }
        if !minimum.is_positive() || !minimum.is_well_formed() {
            return Err(Malformed::BadAmount.into());
        }
    }

    let nickname_index = index::nickname(&op.nickname);
    match state.load::<Nickname>(&nickname_index)? {
        Some(held) if held.account != *source => Err(Retry::NicknameInUse.into()),
        Some(held) if release => {
            owner_dir_delete(state, source, held.owner_node, &nickname_index)?;
            state.delete(&nickname_index)
        }
        Some(mut held) => {
            held.minimum_offer = op.minimum_offer;
            state.update(nickname_index, held)
        }
        None if release => Err(Retry::NoEntry.into()),
        None => {
            let owner_node =
                owner_dir_add(state, &context.config.directory, source, nickname_index)?;
            state.create(
                nickname_index,
                Nickname {
                    nickname: op.nickname,
                    account: *source,
                    minimum_offer: op.minimum_offer,
                    owner_node,
                },
            )
        }
    }
}
