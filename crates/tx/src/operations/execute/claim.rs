//! Claim execution.

use newcoin_common::AccountId;

use crate::frame::ClaimTx;
use crate::result::{Rejected, TerResult};
use crate::state::{inconsistent, LedgerStateManager};
use crate::validation::LedgerContext;

use super::authorize::set_authorized;

/// Execute a Claim transaction.
///
/// Binds an unclaimed account to a generator. The generator's account id
/// becomes the account's authorised key.
pub fn execute_claim(
    op: &ClaimTx,
    source: &AccountId,
    state: &mut LedgerStateManager<'_>,
    context: &LedgerContext<'_>,
) -> TerResult {
    let root = state
        .load_account(source)?
        .ok_or_else(|| inconsistent(format!("claiming missing account {}", source)))?;
    if root.is_claimed() {
        return Err(Rejected::Claimed.into());
    }
    let authorized_key = op.proof.public_key.account_id();
    set_authorized(&op.proof, source, authorized_key, true, state, context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::Malformed;
    use crate::test_utils::{generator_proof, secret, TestLedger};
    use newcoin_ledger::{index, GeneratorMap};

    #[test]
    fn test_claim_sets_authorized_key() {
        let env = TestLedger::new();
        let ledger = env.ledger();
        let mut state = LedgerStateManager::new(&ledger);
        let generator = secret(40);
        let op = ClaimTx {
            proof: generator_proof(&generator, b"cipher"),
        };
        execute_claim(&op, &env.master(), &mut state, &env.context()).unwrap();

        let generator_id = generator.public_key().account_id();
        let root = state.load_account(&env.master()).unwrap().unwrap();
        assert_eq!(root.authorized_key, Some(generator_id));
        let map: GeneratorMap = state
            .load_existing(&index::generator(&generator_id))
            .unwrap();
        assert_eq!(map.cipher, b"cipher".to_vec());

        assert_eq!(
            execute_claim(&op, &env.master(), &mut state, &env.context()),
            Err(Rejected::Claimed.into())
        );
    }

    #[test]
    fn test_claim_bad_proof() {
        let env = TestLedger::new();
        let ledger = env.ledger();
        let mut state = LedgerStateManager::new(&ledger);
        let mut proof = generator_proof(&secret(40), b"cipher");
        proof.generator = b"other".to_vec();
        assert_eq!(
            execute_claim(&ClaimTx { proof }, &env.master(), &mut state, &env.context()),
            Err(Malformed::BadGenAuth.into())
        );
    }
}
