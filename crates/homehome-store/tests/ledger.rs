//! Ledger properties: non-negative buckets, reconciliation, concurrent debits.

use homehome_core::{source, RewardError, UserId};
use homehome_store::{RocksStore, Store, StoreError, MAX_TRANSACTION_PAGE};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::Value;
use tempfile::TempDir;

fn open_store() -> (RocksStore, TempDir) {
    let dir = TempDir::new().unwrap();
    let store = RocksStore::open(dir.path()).unwrap();
    (store, dir)
}

#[test]
fn signed_history_reconciles_with_balance() {
    let (store, _dir) = open_store();
    let user_id = UserId::generate();
    let mut rng = StdRng::seed_from_u64(2024);

    for _ in 0..60 {
        let amount = rng.gen_range(1..=120);
        let result = match rng.gen_range(0..3) {
            0 => store.credit(&user_id, amount, "diary", Value::Null, None),
            1 => store.credit_paid(&user_id, amount, source::PURCHASE, Value::Null, None),
            _ => store.debit(&user_id, amount, "shop", Value::Null, None),
        };
        match result {
            Ok(_) | Err(StoreError::Reward(RewardError::InsufficientFunds { .. })) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    let balance = store.balance(&user_id).unwrap();
    let history = store.list_transactions_by_user(&user_id, 100, 0).unwrap();
    let signed: i128 = history.iter().map(|tx| tx.signed_amount()).sum();

    assert_eq!(signed, i128::from(balance.total));
    assert_eq!(balance.total, balance.free + balance.paid);
    // Newest entry carries the current total.
    if let Some(latest) = history.first() {
        assert_eq!(latest.balance_after, balance.total);
    }
}

#[test]
fn concurrent_debits_cannot_both_succeed() {
    let (store, _dir) = open_store();

    for _ in 0..20 {
        let user_id = UserId::generate();
        store.credit(&user_id, 100, "diary", Value::Null, None).unwrap();

        let outcomes: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..2)
                .map(|_| scope.spawn(|| store.debit(&user_id, 60, "shop", Value::Null, None)))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let successes = outcomes.iter().filter(|o| o.is_ok()).count();
        let refused = outcomes
            .iter()
            .filter(|o| {
                matches!(
                    o,
                    Err(StoreError::Reward(RewardError::InsufficientFunds { .. }))
                )
            })
            .count();
        assert_eq!((successes, refused), (1, 1));
        assert_eq!(store.balance(&user_id).unwrap().total, 40);
        assert_eq!(store.list_transactions_by_user(&user_id, 10, 0).unwrap().len(), 2);
    }
}

#[test]
fn different_users_are_independent() {
    let (store, _dir) = open_store();
    let users: Vec<UserId> = (0..8).map(|_| UserId::generate()).collect();

    std::thread::scope(|scope| {
        for user_id in &users {
            let store = &store;
            scope.spawn(move || {
                for _ in 0..25 {
                    store.credit(user_id, 4, "breathing", Value::Null, None).unwrap();
                }
            });
        }
    });

    for user_id in &users {
        assert_eq!(store.balance(user_id).unwrap().total, 100);
    }
}

#[test]
fn state_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let user_id = UserId::generate();
    {
        let store = RocksStore::open(dir.path()).unwrap();
        store.credit(&user_id, 55, "diary", Value::Null, None).unwrap();
    }
    let store = RocksStore::open(dir.path()).unwrap();
    assert_eq!(store.balance(&user_id).unwrap().free, 55);
    assert_eq!(store.list_transactions_by_user(&user_id, 10, 0).unwrap().len(), 1);
}

#[test]
fn full_page_returns_one_extra_row() {
    let (store, _dir) = open_store();
    let user_id = UserId::generate();

    for _ in 0..=MAX_TRANSACTION_PAGE + 5 {
        store.credit(&user_id, 1, source::DAILY_LOGIN, Value::Null, None).unwrap();
    }

    let page = store.list_transactions_by_user(&user_id, 1_000, 0).unwrap();
    assert_eq!(page.len(), MAX_TRANSACTION_PAGE + 1);
    assert_eq!(page[0].balance_after, (MAX_TRANSACTION_PAGE + 6) as u64);
}
