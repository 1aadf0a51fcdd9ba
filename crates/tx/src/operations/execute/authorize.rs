//! Generator authorisation shared by Claim and PasswordSet.

use newcoin_common::{AccountId, Hash256};
use newcoin_ledger::{index, AccountRoot, GeneratorMap};
use tracing::debug;

use crate::frame::GeneratorProof;
use crate::result::{Malformed, TerResult};
use crate::state::LedgerStateManager;
use crate::validation::LedgerContext;

/// Checks a generator proof, records the generator and sets the account's
/// authorised key.
///
/// With `must_set_generator` the generator must not be registered yet.
pub(crate) fn set_authorized(
    proof: &GeneratorProof,
    account: &AccountId,
    authorized_key: AccountId,
    must_set_generator: bool,
    state: &mut LedgerStateManager<'_>,
    context: &LedgerContext<'_>,
) -> TerResult {
    let message = Hash256::sha512_half(&proof.generator);
    if !context
        .verifier
        .verify_proof(&proof.public_key, message.as_bytes(), &proof.signature)
    {
        return Err(Malformed::BadGenAuth.into());
    }

    let generator = proof.public_key.account_id();
    let generator_index = index::generator(&generator);
    match state.load::<GeneratorMap>(&generator_index)? {
        Some(_) if must_set_generator => return Err(Malformed::GenInUse.into()),
        Some(_) => {}
        None => {
            debug!(generator = %generator, "Registering generator");
            state.create(
                generator_index,
                GeneratorMap {
                    generator,
                    cipher: proof.generator.clone(),
                },
            )?;
        }
    }

    let mut root: AccountRoot = state.load_existing(&index::account_root(account))?;
    root.authorized_key = Some(authorized_key);
    state.update_account(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{generator_proof, secret, TestLedger};

    #[test]
    fn test_generator_in_use() {
        let mut env = TestLedger::new();
        let alice = env.fund(&secret(2), 1_000);
        let master = env.master();
        let proof = generator_proof(&secret(40), b"cipher");
        let key = secret(40).public_key().account_id();

        env.run(|state, ctx| set_authorized(&proof, &master, key, true, state, ctx))
            .unwrap();
        assert_eq!(
            env.run(|state, ctx| set_authorized(&proof, &alice, key, true, state, ctx)),
            Err(Malformed::GenInUse.into())
        );
        assert_eq!(env.ledger_ref().account(&alice).unwrap().unwrap().authorized_key, None);

        // Re-authorising with a known generator is allowed when not required new.
        env.run(|state, ctx| set_authorized(&proof, &alice, key, false, state, ctx))
            .unwrap();
        assert_eq!(
            env.ledger_ref().account(&alice).unwrap().unwrap().authorized_key,
            Some(key)
        );
    }
}
