//! Affection and daily bonus engines against a real store.

use chrono::NaiveDate;
use homehome_core::{
    source, AffectionConfig, CharacterId, DailyBonusConfig, IdempotencyKey, RewardError, UserId,
};
use homehome_store::{RocksStore, Store, StoreError};
use tempfile::TempDir;

fn open_store() -> (RocksStore, TempDir) {
    let dir = TempDir::new().unwrap();
    let store = RocksStore::open(dir.path()).unwrap();
    (store, dir)
}

fn day(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

#[test]
fn increase_spanning_decades_grants_each_threshold() {
    let (store, _dir) = open_store();
    let user_id = UserId::generate();
    let luno: CharacterId = "luno".parse().unwrap();
    let config = AffectionConfig::default();

    store.increase_affection(&user_id, &luno, 5, &config, None).unwrap();
    assert_eq!(store.balance(&user_id).unwrap().total, 0);

    let gain = store.increase_affection(&user_id, &luno, 25, &config, None).unwrap();
    assert_eq!(gain.new_points, 30);
    assert_eq!(gain.thresholds_crossed, vec![10, 20, 30]);
    assert_eq!(gain.coins_awarded, 150);
    assert_eq!(gain.threshold_reached(), 30);

    let grants = store
        .list_transactions_by_user(&user_id, 100, 0)
        .unwrap()
        .into_iter()
        .filter(|tx| tx.source == source::AFFECTION_BONUS)
        .count();
    assert_eq!(grants, 3);
    assert_eq!(store.balance(&user_id).unwrap().free, 150);
}

#[test]
fn from_five_plus_twenty_crosses_ten_and_twenty() {
    let (store, _dir) = open_store();
    let user_id = UserId::generate();
    let cura: CharacterId = "cura".parse().unwrap();
    let config = AffectionConfig::default();

    store.increase_affection(&user_id, &cura, 5, &config, None).unwrap();
    let gain = store.increase_affection(&user_id, &cura, 20, &config, None).unwrap();
    assert_eq!(gain.thresholds_crossed, vec![10, 20]);
    assert_eq!(store.balance(&user_id).unwrap().total, 100);
}

#[test]
fn oversized_affection_is_rejected_atomically() {
    let (store, _dir) = open_store();
    let user_id = UserId::generate();
    let suu: CharacterId = "suu".parse().unwrap();
    let config = AffectionConfig::default();

    let result = store.increase_affection(&user_id, &suu, 500, &config, None);
    assert!(matches!(
        result,
        Err(StoreError::Reward(RewardError::InvalidAmount(_)))
    ));
    assert!(store.list_affection(&user_id).unwrap().is_empty());
}

#[test]
fn caller_dedupe_key_limits_chat_affection() {
    let (store, _dir) = open_store();
    let user_id = UserId::generate();
    let cura: CharacterId = "cura".parse().unwrap();
    let config = AffectionConfig::default();
    let chat: IdempotencyKey = "chat:2024-01-02".parse().unwrap();
    let diary: IdempotencyKey = "diary:entry-7".parse().unwrap();

    store.increase_affection(&user_id, &cura, 2, &config, Some(&chat)).unwrap();
    let replay = store.increase_affection(&user_id, &cura, 2, &config, Some(&chat));
    assert!(matches!(replay, Err(StoreError::DuplicateRequest { .. })));

    store.increase_affection(&user_id, &cura, 2, &config, Some(&diary)).unwrap();
    assert_eq!(store.get_affection(&user_id, &cura).unwrap().points, 4);
}

#[test]
fn streak_continues_repeats_and_resets() {
    let (store, _dir) = open_store();
    let user_id = UserId::generate();
    let config = DailyBonusConfig::default();

    for (date, streak) in [("2023-12-29", 1), ("2023-12-30", 2), ("2023-12-31", 3), ("2024-01-01", 4)] {
        let outcome = store.claim_daily_bonus(&user_id, day(date), &config, None).unwrap();
        assert_eq!(outcome.current_streak, streak);
    }

    let next = store.claim_daily_bonus(&user_id, day("2024-01-02"), &config, None).unwrap();
    assert_eq!(next.current_streak, 5);
    assert!(next.is_new_day);
    assert_eq!(next.coins_earned, 20);

    let again = store.claim_daily_bonus(&user_id, day("2024-01-02"), &config, None).unwrap();
    assert!(!again.is_new_day);
    assert_eq!(again.coins_earned, 0);
    assert_eq!(again.current_streak, 5);

    let gap = store.claim_daily_bonus(&user_id, day("2024-01-05"), &config, None).unwrap();
    assert_eq!(gap.current_streak, 1);
    assert!(gap.is_new_day);
    assert_eq!(gap.coins_earned, 10);

    let state = store.get_login_streak(&user_id).unwrap().unwrap();
    assert_eq!(state.last_login_date, day("2024-01-05"));
    assert_eq!(state.history.len(), 6);

    // 10 + 15 + 30 + 15 + 20 + 10
    assert_eq!(store.balance(&user_id).unwrap().total, 100);
}

#[test]
fn earlier_date_is_a_no_op() {
    let (store, _dir) = open_store();
    let user_id = UserId::generate();
    let config = DailyBonusConfig::default();

    store.claim_daily_bonus(&user_id, day("2024-03-10"), &config, None).unwrap();
    let skewed = store.claim_daily_bonus(&user_id, day("2024-03-09"), &config, None).unwrap();
    assert!(!skewed.is_new_day);
    assert_eq!(
        store.get_login_streak(&user_id).unwrap().unwrap().last_login_date,
        day("2024-03-10")
    );
}
