//! Staging integration tests
//!
//! Drives whole transactions through the public API: create, fill, settle
//! the fee, sign and compose, against a real wallet database on disk.

use data_encoding::HEXLOWER;
use staging_wallet::core::codec::{encode_transaction, signing_message, SIGNATURE_BLOCK_LEN};
use staging_wallet::utils::ed25519_verify;
use staging_wallet::{
    AddressKind, Amount, FeeCalculator, FeeMode, LiteralResolver, TransactionStager, TxState,
    ValueAddress, WalletDb, WalletError,
};
use std::thread;
use tempfile::{tempdir, TempDir};

fn open_with_fee(mode: FeeMode) -> (WalletDb, TransactionStager, TempDir) {
    let temp_dir = tempdir().unwrap();
    let db = WalletDb::open(temp_dir.path().join("wallet")).unwrap();
    let fees = FeeCalculator::new(&mode).unwrap();
    let stager = TransactionStager::new(db.staging_store().clone(), fees);
    (db, stager, temp_dir)
}

fn open_fixed_fee() -> (WalletDb, TransactionStager, TempDir) {
    open_with_fee(FeeMode::Fixed { amount: 10 })
}

/// `alice` funds, `bob` receives, `credits` takes entry credits
fn add_named_addresses(db: &WalletDb) {
    let wallets = db.wallets();
    wallets.create_wallet(AddressKind::Factoid, "alice").unwrap();
    wallets.create_wallet(AddressKind::Factoid, "bob").unwrap();
    wallets
        .create_wallet(AddressKind::EntryCredit, "credits")
        .unwrap();
}

fn stage(db: &WalletDb, stager: &TransactionStager, name: &str, input: u64, output: u64) {
    let wallets = db.wallets();
    stager.new_transaction(name).unwrap();
    stager
        .add_input(wallets, name, "alice", Amount::new(input))
        .unwrap();
    stager
        .add_output(wallets, name, "bob", Amount::new(output))
        .unwrap();
}

/// 1000 from alice plus the fixed fee of 10 pays exactly 1010 to bob
fn stage_balanced(db: &WalletDb, stager: &TransactionStager, name: &str) {
    stage(db, stager, name, 1000, 1010);
    stager.add_fee(db.wallets(), name, "alice").unwrap();
}

#[test]
fn test_duplicate_name_rejected() {
    let (_db, stager, _dir) = open_fixed_fee();
    stager.new_transaction("t1").unwrap();
    assert_eq!(
        stager.new_transaction("t1"),
        Err(WalletError::DuplicateName("t1".to_string()))
    );
    assert_eq!(stager.list_transactions().unwrap(), vec!["t1"]);
}

#[test]
fn test_list_and_get_after_additions() {
    let (db, stager, _dir) = open_fixed_fee();
    add_named_addresses(&db);
    stage(&db, &stager, "b", 1000, 990);
    stager.new_transaction("a").unwrap();

    assert_eq!(stager.list_transactions().unwrap(), vec!["a", "b"]);

    let tx = stager.get_transaction("b").unwrap();
    let alice = db.wallets().get_addresses().unwrap()[0].address.clone();
    assert_eq!(tx.get_inputs()[0].get_address().to_string(), alice);
    assert_eq!(tx.get_inputs()[0].get_amount(), Amount::new(1000));
    assert_eq!(tx.get_outputs()[0].get_amount(), Amount::new(990));
    assert!(!tx.is_fee_settled());
    assert_eq!(tx.state(), TxState::Open);
}

#[test]
fn test_fee_add_then_sub_restores_entry() {
    let (db, stager, _dir) = open_with_fee(FeeMode::default());
    add_named_addresses(&db);
    stage(&db, &stager, "t1", 1_000_000, 500_000);
    let before = stager.get_transaction("t1").unwrap();

    let added = stager.add_fee(db.wallets(), "t1", "alice").unwrap();
    // one input and one output: 10 credits for size, 10 for the signature
    assert_eq!(added, Amount::new(20 * 1_000));

    let removed = stager.sub_fee(db.wallets(), "t1", "alice").unwrap();
    assert_eq!(added, removed);
    assert_eq!(stager.get_transaction("t1").unwrap(), before);
}

#[test]
fn test_resettle_after_shape_change() {
    let (db, stager, _dir) = open_with_fee(FeeMode::default());
    add_named_addresses(&db);
    let wallets = db.wallets();
    stage(&db, &stager, "t1", 1_000_000, 500_000);

    assert_eq!(
        stager.add_fee(wallets, "t1", "alice").unwrap(),
        Amount::new(20_000)
    );

    // a second input adds a signature: 10 + 20 credits
    stager
        .add_input(wallets, "t1", "bob", Amount::new(5))
        .unwrap();
    assert_eq!(stager.compute_fee("t1").unwrap(), Amount::new(30_000));

    // sub takes out what was added, add puts in the new price
    assert_eq!(
        stager.sub_fee(wallets, "t1", "alice").unwrap(),
        Amount::new(20_000)
    );
    let tx = stager.get_transaction("t1").unwrap();
    assert_eq!(tx.get_inputs()[0].get_amount(), Amount::new(1_000_000));
    assert!(!tx.is_fee_settled());

    assert_eq!(
        stager.add_fee(wallets, "t1", "alice").unwrap(),
        Amount::new(30_000)
    );
    let tx = stager.get_transaction("t1").unwrap();
    assert_eq!(tx.get_inputs()[0].get_amount(), Amount::new(1_030_000));
    assert_eq!(tx.get_settled_fee(), Some(Amount::new(30_000)));
}

#[test]
fn test_unbalanced_sign_then_adjust() {
    let (db, stager, _dir) = open_fixed_fee();
    add_named_addresses(&db);
    let wallets = db.wallets();

    // input 1000 + fee 10 = 1010 against 900 out
    stage(&db, &stager, "t1", 1000, 900);
    stager.add_fee(wallets, "t1", "alice").unwrap();
    let before = stager.get_transaction("t1").unwrap();

    assert_eq!(
        stager.sign(wallets, "t1"),
        Err(WalletError::UnbalancedTransaction {
            name: "t1".to_string(),
            difference: 110,
            fee: 10,
        })
    );
    assert_eq!(stager.get_transaction("t1").unwrap(), before);

    // a fixed fee does not move when the shape grows
    stager
        .add_output(wallets, "t1", "bob", Amount::new(110))
        .unwrap();
    let signed = stager.sign(wallets, "t1").unwrap();
    assert!(signed.is_signed());
}

#[test]
fn test_fee_is_additive_to_output_funding() {
    let (db, stager, _dir) = open_fixed_fee();
    add_named_addresses(&db);

    // input 1000 + fee 10 = 1010 against 990 out
    stage(&db, &stager, "t2", 1000, 990);
    stager.add_fee(db.wallets(), "t2", "alice").unwrap();
    assert_eq!(
        stager.sign(db.wallets(), "t2"),
        Err(WalletError::UnbalancedTransaction {
            name: "t2".to_string(),
            difference: 20,
            fee: 10,
        })
    );
    assert_eq!(stager.describe_transaction("t2").unwrap().difference, 20);
}

#[test]
fn test_balanced_transaction_signs() {
    let (db, stager, _dir) = open_fixed_fee();
    add_named_addresses(&db);

    stage_balanced(&db, &stager, "t3");
    assert_eq!(stager.describe_transaction("t3").unwrap().difference, 0);

    let tx = stager.sign(db.wallets(), "t3").unwrap();
    assert_eq!(tx.state(), TxState::Signed);
    assert_eq!(tx.get_signatures().len(), 1);
}

#[test]
fn test_equal_amounts_sign_without_fee() {
    let (db, stager, _dir) = open_fixed_fee();
    add_named_addresses(&db);

    stage(&db, &stager, "even", 1000, 1000);
    assert!(stager.sign(db.wallets(), "even").unwrap().is_signed());
}

#[test]
fn test_deficit_reported_as_negative() {
    let (db, stager, _dir) = open_fixed_fee();
    add_named_addresses(&db);

    stage(&db, &stager, "t3", 1000, 1005);
    assert!(matches!(
        stager.sign(db.wallets(), "t3"),
        Err(WalletError::UnbalancedTransaction { difference: -5, .. })
    ));
}

#[test]
fn test_incomplete_transactions_refused() {
    let (db, stager, _dir) = open_fixed_fee();
    add_named_addresses(&db);
    let wallets = db.wallets();

    stager.new_transaction("empty").unwrap();
    assert!(matches!(
        stager.sign(wallets, "empty"),
        Err(WalletError::IncompleteTransaction { .. })
    ));

    stager
        .add_input(wallets, "empty", "alice", Amount::new(10))
        .unwrap();
    assert!(matches!(
        stager.sign(wallets, "empty"),
        Err(WalletError::IncompleteTransaction { .. })
    ));

    // entry credit output alone is enough
    stager
        .add_ec_output(wallets, "empty", "credits", Amount::new(10))
        .unwrap();
    assert!(stager.sign(wallets, "empty").is_ok());
}

#[test]
fn test_signed_transaction_is_frozen() {
    let (db, stager, _dir) = open_fixed_fee();
    add_named_addresses(&db);
    let wallets = db.wallets();

    stage_balanced(&db, &stager, "t2");
    stager.sign(wallets, "t2").unwrap();
    let signed = stager.get_transaction("t2").unwrap();

    assert_eq!(
        stager.sign(wallets, "t2"),
        Err(WalletError::AlreadySigned("t2".to_string()))
    );
    assert!(matches!(
        stager.add_input(wallets, "t2", "alice", Amount::new(1)),
        Err(WalletError::SignedTransaction(_))
    ));
    assert!(matches!(
        stager.add_ec_output(wallets, "t2", "credits", Amount::new(1)),
        Err(WalletError::SignedTransaction(_))
    ));
    assert!(matches!(
        stager.sub_fee(wallets, "t2", "alice"),
        Err(WalletError::SignedTransaction(_))
    ));
    assert_eq!(stager.get_transaction("t2").unwrap(), signed);
}

#[test]
fn test_compose_is_deterministic() {
    let (db, stager, _dir) = open_fixed_fee();
    add_named_addresses(&db);
    stage_balanced(&db, &stager, "t2");

    assert_eq!(
        stager.compose("t2"),
        Err(WalletError::NotSigned("t2".to_string()))
    );

    stager.sign(db.wallets(), "t2").unwrap();

    let first = stager.compose("t2").unwrap();
    let second = stager.compose("t2").unwrap();
    assert_eq!(first, second);
    assert_eq!(stager.get_transaction("t2").unwrap().state(), TxState::Signed);
}

#[test]
fn test_signature_verifies_against_message() {
    let (db, stager, _dir) = open_fixed_fee();
    add_named_addresses(&db);
    stage_balanced(&db, &stager, "t2");
    let tx = stager.sign(db.wallets(), "t2").unwrap();

    let message = signing_message(&tx);
    let signature = &tx.get_signatures()[0];
    assert!(ed25519_verify(
        signature.get_public_key(),
        signature.get_signature(),
        &message
    ));
    assert_eq!(
        &ValueAddress::from_public_key(signature.get_public_key()),
        tx.get_inputs()[0].get_address()
    );

    let payload: serde_json::Value =
        serde_json::from_slice(&stager.compose("t2").unwrap()).unwrap();
    let encoded = HEXLOWER
        .decode(payload["params"]["transaction"].as_str().unwrap().as_bytes())
        .unwrap();
    assert_eq!(encoded, encode_transaction(&tx).unwrap());
    assert_eq!(encoded.len(), message.len() + SIGNATURE_BLOCK_LEN);
    assert_eq!(&encoded[..message.len()], message.as_slice());
}

#[test]
fn test_remove_missing_transaction() {
    let (_db, stager, _dir) = open_fixed_fee();
    assert_eq!(
        stager.remove_transaction("ghost"),
        Err(WalletError::NotFound("ghost".to_string()))
    );

    stager.new_transaction("keep").unwrap();
    stager.new_transaction("t1").unwrap();
    let keep = stager.get_transaction("keep").unwrap();
    assert_eq!(
        stager.remove_transaction("ghost"),
        Err(WalletError::NotFound("ghost".to_string()))
    );
    assert_eq!(stager.list_transactions().unwrap(), vec!["keep", "t1"]);
    assert_eq!(stager.get_transaction("keep").unwrap(), keep);

    stager.remove_transaction("t1").unwrap();
    assert_eq!(stager.list_transactions().unwrap(), vec!["keep"]);
    let literal = ValueAddress::from_rcd_hash([1; 32]).to_string();
    assert!(matches!(
        stager.add_input(&LiteralResolver, "t1", &literal, Amount::new(1)),
        Err(WalletError::NotFound(_))
    ));
}

#[test]
fn test_concurrent_inputs_all_land() {
    let (_db, stager, _dir) = open_fixed_fee();
    stager.new_transaction("busy").unwrap();

    thread::scope(|scope| {
        for i in 0..8u8 {
            let stager = &stager;
            scope.spawn(move || {
                let address = ValueAddress::from_rcd_hash([i; 32]).to_string();
                for _ in 0..5 {
                    stager
                        .add_input(&LiteralResolver, "busy", &address, Amount::new(u64::from(i)))
                        .unwrap();
                }
            });
        }
    });

    let tx = stager.get_transaction("busy").unwrap();
    assert_eq!(tx.get_inputs().len(), 40);
    assert_eq!(tx.get_input_value().unwrap(), Amount::new(5 * (0..8).sum::<u64>()));
}

#[test]
fn test_state_survives_reopen() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("wallet");
    let fees = FeeMode::Fixed { amount: 10 };

    {
        let db = WalletDb::open(&path).unwrap();
        add_named_addresses(&db);
        let stager =
            TransactionStager::new(db.staging_store().clone(), FeeCalculator::new(&fees).unwrap());
        stage_balanced(&db, &stager, "t2");
        drop(stager);
        db.close().unwrap();
    }

    let db = WalletDb::open(&path).unwrap();
    let stager =
        TransactionStager::new(db.staging_store().clone(), FeeCalculator::new(&fees).unwrap());
    let tx = stager.get_transaction("t2").unwrap();
    assert!(tx.is_fee_settled());
    assert_eq!(tx.get_inputs()[0].get_amount(), Amount::new(1010));

    // the reopened key store still signs for alice
    assert!(stager.sign(db.wallets(), "t2").unwrap().is_signed());
}

#[test]
fn test_address_kind_confusion_rejected() {
    let (db, stager, _dir) = open_fixed_fee();
    add_named_addresses(&db);
    let wallets = db.wallets();
    let ec = wallets
        .get_addresses()
        .unwrap()
        .into_iter()
        .find(|entry| entry.kind == AddressKind::EntryCredit)
        .unwrap()
        .address;

    stager.new_transaction("t1").unwrap();
    assert!(matches!(
        stager.add_output(wallets, "t1", &ec, Amount::new(5)),
        Err(WalletError::InvalidAddress(_))
    ));
    assert!(matches!(
        stager.add_ec_output(wallets, "t1", "bob", Amount::new(5)),
        Err(WalletError::InvalidAddress(_))
    ));
    assert!(stager.get_transaction("t1").unwrap().get_outputs().is_empty());
}

#[test]
fn test_negative_amount_text_rejected() {
    assert!(matches!(
        "-1".parse::<Amount>(),
        Err(WalletError::InvalidAmount(ref msg)) if msg.contains("may not be less than 0")
    ));
}
