use newcoin_common::config::DirectoryConfig;
use newcoin_common::{AccountId, Config, Hash256};
use newcoin_ledger::{index, Amount, EntryKind, Ledger, LedgerEntry};
use newcoin_tx::directory::committed_dir_entries;
use newcoin_tx::test_utils::{generator_proof, secret, usd, TestLedger};
use newcoin_tx::{
    classify, ClaimTx, CreditSetTx, DeleteTx, Fault, InvoiceTx, Malformed, NicknameFlags,
    NicknameSetTx, PaymentFlags, PaymentTx, Rejected, Retry, StoreTx, Ter, Transaction,
    TransactionEngine, TransactionEngineParams, TransactionEngineResult, TransactionKind,
};

fn native_payment(
    source: AccountId,
    sequence: u32,
    destination: AccountId,
    value: i64,
) -> Transaction {
    Transaction::new(
        source,
        sequence,
        10,
        TransactionKind::Payment(PaymentTx {
            destination,
            amount: Amount::native(value),
            send_max: None,
            paths: None,
            flags: PaymentFlags::empty(),
        }),
    )
}

fn store(source: AccountId, sequence: u32, key: u8, data: &[u8]) -> Transaction {
    Transaction::new(
        source,
        sequence,
        10,
        TransactionKind::Store(StoreTx {
            key: Hash256([key; 32]),
            data: data.to_vec(),
        }),
    )
}

#[test]
fn test_same_input_same_outcome() {
    let mut env = TestLedger::new();
    let alice = env.fund(&secret(2), 10_000);
    let engine = TransactionEngine::new(Config::default()).unwrap();
    let tx = native_payment(env.master(), 1, alice, 2_500)
        .signed(&secret(1))
        .unwrap();

    let mut first = env.ledger();
    let mut second = env.ledger();
    let a = engine.apply_transaction(&tx, TransactionEngineParams::NONE, &mut first);
    let b = engine.apply_transaction(&tx, TransactionEngineParams::NONE, &mut second);
    assert_eq!(a, Ter::Success);
    assert_eq!(a, b);
    assert_eq!(first.state_hash().unwrap(), second.state_hash().unwrap());
    assert_eq!(first, second);
}

#[test]
fn test_underfunded_payment_leaves_ledger_untouched() {
    let mut env = TestLedger::new();
    let key = secret(2);
    let alice = env.fund(&key, 100);
    let engine = TransactionEngine::new(Config::default()).unwrap();
    let mut ledger = env.ledger();
    let before = ledger.state_hash().unwrap();

    let tx = native_payment(alice, 1, env.master(), 150).signed(&key).unwrap();
    let result = engine.apply_transaction(&tx, TransactionEngineParams::NO_CHECK_FEE, &mut ledger);
    assert!(
        matches!(result, Ter::Retriable(Retry::Unfunded) | Ter::Retriable(Retry::NoPath)),
        "{}",
        result
    );
    assert_eq!(ledger.state_hash().unwrap(), before);
    assert_eq!(ledger.account(&alice).unwrap().unwrap().sequence, 1);
    assert!(!ledger.has_transaction(&tx.id().unwrap()));
}

#[test]
fn test_replayed_transaction_is_already_applied() {
    let mut env = TestLedger::new();
    let key = secret(2);
    let alice = env.fund(&key, 10_000);
    let mut root = env.ledger_ref().account(&alice).unwrap().unwrap().clone();
    root.sequence = 5;
    env.ledger_mut()
        .put(LedgerEntry::new(index::account_root(&alice), root.into_data()));

    let engine = TransactionEngine::new(Config::default()).unwrap();
    let mut ledger = env.ledger();
    let tx = native_payment(alice, 5, env.master(), 100).signed(&key).unwrap();
    assert_eq!(
        engine.apply_transaction(&tx, TransactionEngineParams::NONE, &mut ledger),
        Ter::Success
    );
    assert_eq!(
        engine.apply_transaction(&tx, TransactionEngineParams::NONE, &mut ledger),
        Ter::LedgerRejected(Rejected::Already)
    );

    let stale = native_payment(alice, 5, env.master(), 99).signed(&key).unwrap();
    assert_eq!(
        engine.apply_transaction(&stale, TransactionEngineParams::NONE, &mut ledger),
        Ter::Retriable(Retry::PastSeq)
    );
    let early = native_payment(alice, 9, env.master(), 99).signed(&key).unwrap();
    assert_eq!(
        engine.apply_transaction(&early, TransactionEngineParams::NONE, &mut ledger),
        Ter::Retriable(Retry::PreSeq)
    );
}

#[test]
fn test_owner_directory_pages_come_and_go() {
    let config = Config {
        directory: DirectoryConfig {
            page_capacity: 4,
            ..Default::default()
        },
        ..Default::default()
    };
    let key = secret(2);
    let mut env = TestLedger::with_config(config.clone());
    let alice = env.fund(&key, 10_000);
    let engine = TransactionEngine::new(config).unwrap();
    let mut ledger = env.ledger();
    let root = index::owner_dir(&alice);

    let mut sequence = 1;
    for key_byte in 0..5u8 {
        let tx = store(alice, sequence, key_byte, b"blob").signed(&key).unwrap();
        assert_eq!(
            engine.apply_transaction(&tx, TransactionEngineParams::NONE, &mut ledger),
            Ter::Success
        );
        sequence += 1;
    }
    assert_eq!(committed_dir_entries(&ledger, &root).len(), 5);
    assert!(ledger.contains(&root));
    assert!(ledger.contains(&index::dir_node(&root, 1)));
    assert_eq!(ledger.account(&alice).unwrap().unwrap().owner_count, 5);

    for key_byte in 0..5u8 {
        let tx = store(alice, sequence, key_byte, b"").signed(&key).unwrap();
        assert_eq!(
            engine.apply_transaction(&tx, TransactionEngineParams::NONE, &mut ledger),
            Ter::Success
        );
        sequence += 1;
    }
    assert!(!ledger.contains(&root));
    assert!(!ledger.contains(&index::dir_node(&root, 1)));
    assert!(committed_dir_entries(&ledger, &root).is_empty());
    assert_eq!(ledger.account(&alice).unwrap().unwrap().owner_count, 0);
}

#[test]
fn test_delete_waits_for_owned_entries() {
    let mut env = TestLedger::new();
    let key = secret(2);
    let alice = env.fund(&key, 10_000);
    let master = env.master();
    let engine = TransactionEngine::new(Config::default()).unwrap();
    let mut ledger = env.ledger();

    let trust = |sequence: u32, limit: i64| {
        Transaction::new(
            alice,
            sequence,
            10,
            TransactionKind::CreditSet(CreditSetTx {
                destination: master,
                limit: Amount::issued(limit, usd(), master),
            }),
        )
        .signed(&key)
        .unwrap()
    };
    let delete = |sequence: u32| {
        Transaction::new(
            alice,
            sequence,
            10,
            TransactionKind::Delete(DeleteTx { destination: master }),
        )
        .signed(&key)
        .unwrap()
    };

    let params = TransactionEngineParams::NONE;
    assert_eq!(engine.apply_transaction(&trust(1, 100), params, &mut ledger), Ter::Success);
    assert_eq!(
        engine.apply_transaction(&delete(2), params, &mut ledger),
        Ter::Retriable(Retry::Owners)
    );
    assert_eq!(engine.apply_transaction(&trust(2, 0), params, &mut ledger), Ter::Success);
    assert!(!ledger.contains(&index::ripple_state(&alice, &master, &usd())));

    let master_before = ledger.account(&master).unwrap().unwrap().balance;
    assert_eq!(engine.apply_transaction(&delete(3), params, &mut ledger), Ter::Success);
    assert!(ledger.account(&alice).unwrap().is_none());
    // 10_000 less three fees of 10, the last one taken before the transfer.
    assert_eq!(
        ledger.account(&master).unwrap().unwrap().balance,
        master_before + 10_000 - 30
    );
}

#[test]
fn test_alternate_ledger_is_isolated() {
    let key = secret(1);
    let master = key.public_key().account_id();
    let genesis = Ledger::genesis(master, 1_000_000);
    let alternate = genesis.successor().unwrap();

    let mut engine = TransactionEngine::new(Config::default()).unwrap();
    engine.set_default_ledger(genesis.clone().into_shared());
    engine.set_alternate_ledger(Some(alternate.into_shared()));

    let mut tx = native_payment(master, 1, AccountId([7u8; 20]), 5_000);
    if let TransactionKind::Payment(op) = &mut tx.kind {
        op.flags = PaymentFlags::CREATE_ACCOUNT;
    }
    tx.fee = engine.config().fees.account_create_fee;
    let tx = tx.signed(&key).unwrap();

    assert_eq!(engine.apply_transaction_at(&tx, TransactionEngineParams::NONE, 2), Ter::Success);
    let default = engine.default_ledger().unwrap().read().clone();
    assert_eq!(default, genesis);
    let alternate = engine.alternate_ledger().unwrap().read().clone();
    assert!(alternate.contains(&index::account_root(&AccountId([7u8; 20]))));

    assert_eq!(
        engine.apply_transaction_at(&tx, TransactionEngineParams::NONE, 9),
        Ter::EngineFault(Fault::BadLedger)
    );
    assert_eq!(engine.apply_transaction_at(&tx, TransactionEngineParams::NONE, 0), Ter::Success);
}

#[test]
fn test_every_code_classifies() {
    let mut tokens = std::collections::HashSet::new();
    for result in TransactionEngineResult::all() {
        let (token, human) = classify(result.code()).unwrap();
        assert_eq!(token, result.token());
        assert!(!human.is_empty());
        assert!(tokens.insert(token), "duplicate token {}", token);
    }
    assert_eq!(classify(0), Some(("terSUCCESS", "The transaction was applied")));
    assert_eq!(classify(-1_000), None);
}

#[test]
fn test_wrong_key_on_unclaimed_account() {
    let mut env = TestLedger::new();
    let alice = env.fund(&secret(2), 10_000);
    let engine = TransactionEngine::new(Config::default()).unwrap();
    let mut ledger = env.ledger();

    // Signed by someone else's master key.
    let tx = native_payment(alice, 1, env.master(), 10).signed(&secret(3)).unwrap();
    assert_eq!(
        engine.apply_transaction(&tx, TransactionEngineParams::NONE, &mut ledger),
        Ter::LedgerRejected(Rejected::BadAuthMaster)
    );

    let mut forged = native_payment(alice, 1, env.master(), 10).signed(&secret(2)).unwrap();
    forged.fee = 11;
    assert_eq!(
        engine.apply_transaction(&forged, TransactionEngineParams::NONE, &mut ledger),
        Ter::Malformed(Malformed::BadSignature)
    );
    assert_eq!(
        engine.apply_transaction(&forged, TransactionEngineParams::NO_CHECK_SIGN, &mut ledger),
        Ter::Success
    );
}

#[test]
fn test_refused_transactions_repeat_their_code() {
    let mut env = TestLedger::new();
    let key = secret(2);
    let alice = env.fund(&key, 10_000);
    let engine = TransactionEngine::new(Config::default()).unwrap();
    let mut ledger = env.ledger();
    let before = ledger.state_hash().unwrap();

    let zero = native_payment(alice, 1, env.master(), 0).signed(&key).unwrap();
    let to_self = native_payment(alice, 1, alice, 10).signed(&key).unwrap();
    let unclaimed = native_payment(alice, 1, env.master(), 10)
        .signed(&secret(3))
        .unwrap();
    for (tx, expected) in [
        (&zero, Ter::Malformed(Malformed::BadAmount)),
        (&to_self, Ter::Malformed(Malformed::Redundant)),
        (&unclaimed, Ter::LedgerRejected(Rejected::BadAuthMaster)),
    ] {
        for _ in 0..2 {
            assert_eq!(
                engine.apply_transaction(tx, TransactionEngineParams::NONE, &mut ledger),
                expected
            );
        }
    }
    assert_eq!(ledger.state_hash().unwrap(), before);
}

#[test]
fn test_prepaid_claim_keeps_sequence() {
    let env = TestLedger::new();
    let master = env.master();
    let engine = TransactionEngine::new(Config::default()).unwrap();
    let mut ledger = env.ledger();
    let sequence_before = ledger.account(&master).unwrap().unwrap().sequence;

    let claim = Transaction::new(
        master,
        0,
        0,
        TransactionKind::Claim(ClaimTx {
            proof: generator_proof(&secret(40), b"cipher"),
        }),
    )
    .signed(&secret(1))
    .unwrap();
    assert_eq!(
        engine.apply_transaction(&claim, TransactionEngineParams::NONE, &mut ledger),
        Ter::Success
    );
    let root = ledger.account(&master).unwrap().unwrap();
    assert_eq!(root.sequence, sequence_before);
    assert_eq!(root.authorized_key, Some(secret(40).public_key().account_id()));
    assert!(ledger.has_transaction(&claim.id().unwrap()));

    let mut numbered = claim.clone();
    numbered.sequence = sequence_before;
    let numbered = numbered.signed(&secret(1)).unwrap();
    assert_eq!(
        engine.apply_transaction(&numbered, TransactionEngineParams::NONE, &mut ledger),
        Ter::Retriable(Retry::BadSeq)
    );

    let claimed = ledger.state_hash().unwrap();
    for _ in 0..2 {
        assert_eq!(
            engine.apply_transaction(&claim, TransactionEngineParams::NONE, &mut ledger),
            Ter::LedgerRejected(Rejected::Claimed)
        );
    }
    assert_eq!(ledger.state_hash().unwrap(), claimed);
}

#[test]
fn test_delete_after_invoice_and_nickname_removed() {
    let mut env = TestLedger::new();
    let key = secret(2);
    let alice = env.fund(&key, 10_000);
    let master = env.master();
    let engine = TransactionEngine::new(Config::default()).unwrap();
    let mut ledger = env.ledger();
    let params = TransactionEngineParams::NONE;
    let nickname = Hash256::sha512_half(b"alice");

    let signed = |sequence: u32, fee: i64, kind: TransactionKind| {
        Transaction::new(alice, sequence, fee, kind).signed(&key).unwrap()
    };
    let invoice = signed(
        1,
        10,
        TransactionKind::Invoice(InvoiceTx {
            destination: Some(master),
            amount: Some(Amount::native(100)),
            ..Default::default()
        }),
    );
    let claim_name = signed(
        2,
        1_000,
        TransactionKind::NicknameSet(NicknameSetTx {
            nickname,
            minimum_offer: None,
            flags: NicknameFlags::empty(),
        }),
    );
    let delete = |sequence| {
        signed(
            sequence,
            10,
            TransactionKind::Delete(DeleteTx {
                destination: master,
            }),
        )
    };

    assert_eq!(engine.apply_transaction(&invoice, params, &mut ledger), Ter::Success);
    assert_eq!(engine.apply_transaction(&claim_name, params, &mut ledger), Ter::Success);
    assert_eq!(
        engine.apply_transaction(&delete(3), params, &mut ledger),
        Ter::Retriable(Retry::Owners)
    );
    assert_eq!(committed_dir_entries(&ledger, &index::owner_dir(&alice)).len(), 2);

    let cancel = signed(
        3,
        10,
        TransactionKind::Invoice(InvoiceTx {
            cancel_sequence: Some(1),
            ..Default::default()
        }),
    );
    let release = signed(
        4,
        10,
        TransactionKind::NicknameSet(NicknameSetTx {
            nickname,
            minimum_offer: None,
            flags: NicknameFlags::RELEASE,
        }),
    );
    assert_eq!(engine.apply_transaction(&cancel, params, &mut ledger), Ter::Success);
    assert_eq!(engine.apply_transaction(&release, params, &mut ledger), Ter::Success);
    assert!(!ledger.contains(&index::owner_dir(&alice)));
    assert!(!ledger.contains(&index::nickname(&nickname)));

    assert_eq!(engine.apply_transaction(&delete(5), params, &mut ledger), Ter::Success);
    assert!(ledger.account(&alice).unwrap().is_none());
}
