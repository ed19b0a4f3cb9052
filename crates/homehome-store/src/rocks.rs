//! `RocksDB` storage implementation.
//!
//! This module provides the `RocksStore` implementation of the `Store` trait.

use std::path::Path;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rand::RngCore;
use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, Direction, IteratorMode,
    MultiThreaded, Options, WriteBatch,
};
use serde_json::{json, Value};
use tracing::{debug, error, info};

use homehome_core::{
    source, AffectionConfig, AffectionGain, AffectionState, BalanceSnapshot, CharacterId,
    CurrencyBalance, CurrencyTransaction, DailyBonusConfig, DailyBonusOutcome, DrawOutcome,
    DrawResult, GachaConfig, IdempotencyKey, ItemCatalog, ItemId, LoginStreakState, OwnedItem,
    PityState, RewardError, RollCount, TransactionId, UserId,
};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::locks::UserLocks;
use crate::schema::{all_column_families, cf};
use crate::unit::UnitOfWork;
use crate::{Store, MAX_TRANSACTION_PAGE};

/// RocksDB-backed storage implementation.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
    locks: UserLocks,
}

/// Serialize a value using CBOR.
pub(crate) fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    ciborium::into_writer(value, &mut buf).map_err(|e| StoreError::Serialization(e.to_string()))?;
    Ok(buf)
}

/// Deserialize a value from CBOR.
pub(crate) fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
    ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)?;

        Ok(Self {
            db: Arc::new(db),
            locks: UserLocks::new(),
        })
    }

    /// Get a column family handle.
    pub(crate) fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    pub(crate) fn read<T: serde::de::DeserializeOwned>(
        &self,
        cf_name: &str,
        key: &[u8],
    ) -> Result<Option<T>> {
        let cf = self.cf(cf_name)?;
        self.db
            .get_cf(&cf, key)?
            .map(|data| deserialize(&data))
            .transpose()
    }

    pub(crate) fn exists(&self, cf_name: &str, key: &[u8]) -> Result<bool> {
        let cf = self.cf(cf_name)?;
        Ok(self.db.get_pinned_cf(&cf, key)?.is_some())
    }

    pub(crate) fn write(&self, batch: WriteBatch) -> Result<()> {
        self.db.write(batch)?;
        Ok(())
    }

    /// Every record whose key starts with `prefix`, in key order.
    fn scan_prefix<T: serde::de::DeserializeOwned>(
        &self,
        cf_name: &str,
        prefix: &[u8],
    ) -> Result<Vec<T>> {
        let cf = self.cf(cf_name)?;
        let mut records = Vec::new();
        for item in self
            .db
            .iterator_cf(&cf, IteratorMode::From(prefix, Direction::Forward))
        {
            let (key, value) = item?;
            if !key.starts_with(prefix) {
                break;
            }
            records.push(deserialize(&value)?);
        }
        Ok(records)
    }

    fn owned_item_ids(&self, user_id: &UserId) -> Result<std::collections::HashSet<ItemId>> {
        Ok(self
            .scan_prefix::<OwnedItem>(cf::OWNED_ITEMS, &keys::user_prefix(user_id))?
            .into_iter()
            .map(|owned| owned.item_id)
            .collect())
    }

    /// Shared body of the three single-entry ledger mutations.
    fn apply_ledger<F>(
        &self,
        user_id: &UserId,
        operation: &str,
        idempotency_key: Option<&IdempotencyKey>,
        stage: F,
    ) -> Result<BalanceSnapshot>
    where
        F: FnOnce(&mut UnitOfWork<'_>) -> Result<()>,
    {
        let lock = self.locks.handle(user_id);
        let _guard = lock.lock();

        let mut unit = UnitOfWork::begin(self, *user_id)?;
        unit.reserve_request(idempotency_key, operation)?;
        stage(&mut unit)?;
        unit.commit()
    }
}

impl Store for RocksStore {
    // =========================================================================
    // Ledger
    // =========================================================================

    fn balance(&self, user_id: &UserId) -> Result<BalanceSnapshot> {
        let balance: Option<CurrencyBalance> =
            self.read(cf::BALANCES, &keys::user_prefix(user_id))?;
        Ok(balance.map_or(
            BalanceSnapshot {
                free: 0,
                paid: 0,
                total: 0,
            },
            |b| b.snapshot(),
        ))
    }

    fn credit(
        &self,
        user_id: &UserId,
        amount: u64,
        source: &str,
        metadata: Value,
        idempotency_key: Option<&IdempotencyKey>,
    ) -> Result<BalanceSnapshot> {
        let balance = self.apply_ledger(user_id, "credit", idempotency_key, |unit| {
            unit.credit_free(amount, source, metadata)
        })?;
        info!(user_id = %user_id, amount, source, total = balance.total, "coins credited");
        Ok(balance)
    }

    fn credit_paid(
        &self,
        user_id: &UserId,
        amount: u64,
        source: &str,
        metadata: Value,
        idempotency_key: Option<&IdempotencyKey>,
    ) -> Result<BalanceSnapshot> {
        let balance = self.apply_ledger(user_id, "credit_paid", idempotency_key, |unit| {
            unit.credit_paid(amount, source, metadata)
        })?;
        info!(user_id = %user_id, amount, source, paid = balance.paid, "paid coins credited");
        Ok(balance)
    }

    fn debit(
        &self,
        user_id: &UserId,
        amount: u64,
        source: &str,
        metadata: Value,
        idempotency_key: Option<&IdempotencyKey>,
    ) -> Result<BalanceSnapshot> {
        let balance = self.apply_ledger(user_id, "debit", idempotency_key, |unit| {
            unit.debit(amount, source, metadata)
        })?;
        info!(user_id = %user_id, amount, source, total = balance.total, "coins debited");
        Ok(balance)
    }

    fn get_transaction(&self, transaction_id: &TransactionId) -> Result<Option<CurrencyTransaction>> {
        self.read(cf::TRANSACTIONS, &keys::transaction_key(transaction_id))
    }

    fn list_transactions_by_user(
        &self,
        user_id: &UserId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<CurrencyTransaction>> {
        let limit = limit.min(MAX_TRANSACTION_PAGE + 1);
        let mut transactions = Vec::with_capacity(limit);
        if limit == 0 {
            return Ok(transactions);
        }

        let cf_by_user = self.cf(cf::TRANSACTIONS_BY_USER)?;
        let prefix = keys::user_prefix(user_id);
        let upper = keys::user_prefix_end(user_id);

        // ULIDs sort by time, so a reverse scan yields newest first.
        let iter = self
            .db
            .iterator_cf(&cf_by_user, IteratorMode::From(&upper, Direction::Reverse));

        let mut skipped = 0;
        for item in iter {
            let (key, _) = item?;
            if !key.starts_with(&prefix) {
                break;
            }
            if skipped < offset {
                skipped += 1;
                continue;
            }
            let Some(tx_id) = keys::transaction_id_from_user_key(&key) else {
                continue;
            };
            if let Some(tx) = self.get_transaction(&tx_id)? {
                transactions.push(tx);
            }
            if transactions.len() >= limit {
                break;
            }
        }

        Ok(transactions)
    }

    // =========================================================================
    // Gacha
    // =========================================================================

    fn draw(
        &self,
        user_id: &UserId,
        count: RollCount,
        catalog: &ItemCatalog,
        config: &GachaConfig,
        rng: &mut dyn RngCore,
        idempotency_key: Option<&IdempotencyKey>,
    ) -> Result<DrawOutcome> {
        let lock = self.locks.handle(user_id);
        let _guard = lock.lock();

        let mut unit = UnitOfWork::begin(self, *user_id)?;
        unit.reserve_request(idempotency_key, "gacha_draw")?;

        // Charge first: on InsufficientFunds nothing below runs.
        let cost = config.cost(count);
        unit.debit(cost, source::GACHA, json!({ "roll_count": count.draws() }))?;

        let pity_key = keys::user_prefix(user_id);
        let mut pity: PityState = self
            .read(cf::GACHA_PITY, &pity_key)?
            .unwrap_or_else(|| PityState::new(*user_id));
        let mut owned = self.owned_item_ids(user_id)?;

        let now = Utc::now();
        let mut results = Vec::with_capacity(count.draws() as usize);

        for position in 0..count.draws() {
            let roll = GachaConfig::roll(&mut *rng);
            let drawn = pity.next_rarity(config, roll, now);
            if drawn.guaranteed {
                info!(user_id = %user_id, position, "pity guarantee forced SSR");
            }

            let entry = catalog.pick(drawn.rarity, &mut *rng).map_err(|e| {
                error!(rarity = %drawn.rarity, "catalog has no drawable item");
                e
            })?;

            let is_new = owned.insert(entry.id);
            if is_new {
                let item = OwnedItem::obtained(*user_id, entry.id, now);
                unit.put(cf::OWNED_ITEMS, &keys::owned_item_key(user_id, &entry.id), &item)?;
            } else if config.duplicate_rebate > 0 {
                unit.credit_free(
                    config.duplicate_rebate,
                    source::GACHA_DUPLICATE,
                    json!({ "item_id": entry.id }),
                )?;
            }

            results.push(DrawResult {
                item_id: entry.id,
                rarity: drawn.rarity,
                is_new,
            });
        }

        unit.put(cf::GACHA_PITY, &pity_key, &pity)?;
        let balance = unit.commit()?;

        info!(
            user_id = %user_id,
            draws = count.draws(),
            cost,
            pity_count = pity.current_count,
            total = balance.total,
            "gacha draw completed"
        );
        Ok(DrawOutcome {
            results,
            balance,
            pity,
        })
    }

    fn get_pity(&self, user_id: &UserId) -> Result<PityState> {
        Ok(self
            .read(cf::GACHA_PITY, &keys::user_prefix(user_id))?
            .unwrap_or_else(|| PityState::new(*user_id)))
    }

    fn list_owned_items(&self, user_id: &UserId) -> Result<Vec<OwnedItem>> {
        self.scan_prefix(cf::OWNED_ITEMS, &keys::user_prefix(user_id))
    }

    fn equip_item(
        &self,
        user_id: &UserId,
        item_id: &ItemId,
        catalog: &ItemCatalog,
    ) -> Result<OwnedItem> {
        let lock = self.locks.handle(user_id);
        let _guard = lock.lock();

        let key = keys::owned_item_key(user_id, item_id);
        let mut target: OwnedItem = self
            .read(cf::OWNED_ITEMS, &key)?
            .ok_or(RewardError::ItemNotOwned { item_id: *item_id })?;

        let same_category = catalog
            .get(item_id)
            .map(|entry| catalog.ids_in_category(&entry.category))
            .unwrap_or_default();

        let mut unit = UnitOfWork::begin(self, *user_id)?;
        for mut owned in self.list_owned_items(user_id)? {
            let sibling = owned.item_id != *item_id && same_category.contains(&owned.item_id);
            if owned.is_equipped && sibling {
                owned.is_equipped = false;
                unit.put(
                    cf::OWNED_ITEMS,
                    &keys::owned_item_key(user_id, &owned.item_id),
                    &owned,
                )?;
            }
        }
        target.is_equipped = true;
        unit.put(cf::OWNED_ITEMS, &key, &target)?;
        unit.commit()?;

        debug!(user_id = %user_id, item_id = %item_id, "item equipped");
        Ok(target)
    }

    // =========================================================================
    // Affection
    // =========================================================================

    fn increase_affection(
        &self,
        user_id: &UserId,
        character_id: &CharacterId,
        amount: u64,
        config: &AffectionConfig,
        idempotency_key: Option<&IdempotencyKey>,
    ) -> Result<AffectionGain> {
        let lock = self.locks.handle(user_id);
        let _guard = lock.lock();

        let mut unit = UnitOfWork::begin(self, *user_id)?;
        unit.reserve_request(idempotency_key, "affection_increase")?;

        let key = keys::affection_key(user_id, character_id);
        let mut state: AffectionState = self
            .read(cf::AFFECTION, &key)?
            .unwrap_or_else(|| AffectionState::new(*user_id, character_id.clone()));
        let gain = state.increase(amount, config)?;

        if config.bonus_per_threshold > 0 {
            for threshold in &gain.thresholds_crossed {
                unit.credit_free(
                    config.bonus_per_threshold,
                    source::AFFECTION_BONUS,
                    json!({ "character_id": character_id.as_str(), "threshold": threshold }),
                )?;
            }
        }
        unit.put(cf::AFFECTION, &key, &state)?;
        unit.commit()?;

        info!(
            user_id = %user_id,
            character_id = %character_id,
            amount,
            points = gain.new_points,
            thresholds = gain.thresholds_crossed.len(),
            coins = gain.coins_awarded,
            "affection increased"
        );
        Ok(gain)
    }

    fn get_affection(
        &self,
        user_id: &UserId,
        character_id: &CharacterId,
    ) -> Result<AffectionState> {
        Ok(self
            .read(cf::AFFECTION, &keys::affection_key(user_id, character_id))?
            .unwrap_or_else(|| AffectionState::new(*user_id, character_id.clone())))
    }

    fn list_affection(&self, user_id: &UserId) -> Result<Vec<AffectionState>> {
        self.scan_prefix(cf::AFFECTION, &keys::user_prefix(user_id))
    }

    // =========================================================================
    // Daily bonus
    // =========================================================================

    fn claim_daily_bonus(
        &self,
        user_id: &UserId,
        today: NaiveDate,
        config: &DailyBonusConfig,
        idempotency_key: Option<&IdempotencyKey>,
    ) -> Result<DailyBonusOutcome> {
        let lock = self.locks.handle(user_id);
        let _guard = lock.lock();

        let mut unit = UnitOfWork::begin(self, *user_id)?;
        unit.reserve_request(idempotency_key, "daily_bonus")?;

        let key = keys::user_prefix(user_id);
        let previous: Option<LoginStreakState> = self.read(cf::LOGIN_STREAKS, &key)?;
        let (state, outcome) = LoginStreakState::claim(previous, *user_id, today, config);

        if outcome.is_new_day {
            if outcome.coins_earned > 0 {
                unit.credit_free(
                    outcome.coins_earned,
                    source::DAILY_LOGIN,
                    json!({ "streak": outcome.current_streak, "date": today }),
                )?;
            }
            unit.put(cf::LOGIN_STREAKS, &key, &state)?;
        }
        unit.commit()?;

        info!(
            user_id = %user_id,
            %today,
            streak = outcome.current_streak,
            coins = outcome.coins_earned,
            new_day = outcome.is_new_day,
            "daily bonus claimed"
        );
        Ok(outcome)
    }

    fn get_login_streak(&self, user_id: &UserId) -> Result<Option<LoginStreakState>> {
        self.read(cf::LOGIN_STREAKS, &keys::user_prefix(user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use homehome_core::{CatalogEntry, Rarity, TransactionKind};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::TempDir;

    fn create_test_store() -> (RocksStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = RocksStore::open(dir.path()).unwrap();
        (store, dir)
    }

    fn catalog() -> ItemCatalog {
        let entries = Rarity::ALL
            .iter()
            .flat_map(|&rarity| {
                (0..3).map(move |i| CatalogEntry {
                    id: ItemId::generate(),
                    name: format!("{rarity}-{i}"),
                    rarity,
                    category: if i == 0 { "outfit" } else { "background" }.into(),
                    is_default: false,
                })
            })
            .collect();
        ItemCatalog::new(entries).unwrap()
    }

    #[test]
    fn unknown_user_has_zero_balance() {
        let (store, _dir) = create_test_store();
        let balance = store.balance(&UserId::generate()).unwrap();
        assert_eq!(balance.total, 0);
    }

    #[test]
    fn debit_spends_free_before_paid() {
        let (store, _dir) = create_test_store();
        let user_id = UserId::generate();

        store.credit(&user_id, 30, source::DAILY_LOGIN, Value::Null, None).unwrap();
        store.credit_paid(&user_id, 100, source::PURCHASE, Value::Null, None).unwrap();

        let balance = store.debit(&user_id, 50, "shop", Value::Null, None).unwrap();
        assert_eq!(balance.free, 0);
        assert_eq!(balance.paid, 80);
        assert_eq!(balance.total, 80);
    }

    #[test]
    fn failed_debit_leaves_no_trace() {
        let (store, _dir) = create_test_store();
        let user_id = UserId::generate();
        store.credit(&user_id, 40, source::DAILY_LOGIN, Value::Null, None).unwrap();

        let result = store.debit(&user_id, 41, "shop", Value::Null, None);
        assert!(matches!(
            result,
            Err(StoreError::Reward(RewardError::InsufficientFunds {
                available: 40,
                required: 41
            }))
        ));
        assert_eq!(store.balance(&user_id).unwrap().total, 40);
        assert_eq!(store.list_transactions_by_user(&user_id, 10, 0).unwrap().len(), 1);
    }

    #[test]
    fn zero_amount_and_bad_source_are_rejected() {
        let (store, _dir) = create_test_store();
        let user_id = UserId::generate();

        assert!(matches!(
            store.credit(&user_id, 0, "diary", Value::Null, None),
            Err(StoreError::Reward(RewardError::InvalidAmount(_)))
        ));
        assert!(matches!(
            store.credit(&user_id, 5, "", Value::Null, None),
            Err(StoreError::Reward(RewardError::InvalidSource(_)))
        ));
        assert!(store.list_transactions_by_user(&user_id, 10, 0).unwrap().is_empty());
    }

    #[test]
    fn transactions_list_newest_first() {
        let (store, _dir) = create_test_store();
        let user_id = UserId::generate();

        store.credit(&user_id, 10, "diary", Value::Null, None).unwrap();
        store.credit(&user_id, 20, "breathing", Value::Null, None).unwrap();
        store.debit(&user_id, 5, "shop", Value::Null, None).unwrap();

        let all = store.list_transactions_by_user(&user_id, 10, 0).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].kind, TransactionKind::Spend);
        assert_eq!(all[0].balance_after, 25);
        assert_eq!(all[2].source, "diary");

        let page = store.list_transactions_by_user(&user_id, 1, 1).unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].source, "breathing");

        let fetched = store.get_transaction(&all[1].id).unwrap().unwrap();
        assert_eq!(fetched, all[1]);

        // Another user's history is not visible.
        assert!(store
            .list_transactions_by_user(&UserId::generate(), 10, 0)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn idempotency_key_blocks_replay_only_after_success() {
        let (store, _dir) = create_test_store();
        let user_id = UserId::generate();
        let key: IdempotencyKey = "purchase-1".parse().unwrap();

        // A failed call does not consume the key.
        assert!(store.debit(&user_id, 10, "shop", Value::Null, Some(&key)).is_err());

        store.credit(&user_id, 10, "diary", Value::Null, Some(&key)).unwrap();
        let replay = store.credit(&user_id, 10, "diary", Value::Null, Some(&key));
        assert!(matches!(replay, Err(StoreError::DuplicateRequest { .. })));
        assert_eq!(store.balance(&user_id).unwrap().total, 10);

        // Keys are scoped per user.
        let other = UserId::generate();
        store.credit(&other, 10, "diary", Value::Null, Some(&key)).unwrap();
    }

    #[test]
    fn draw_records_items_and_pity() {
        let (store, _dir) = create_test_store();
        let user_id = UserId::generate();
        let catalog = catalog();
        let config = GachaConfig::default();
        let mut rng = StdRng::seed_from_u64(42);

        store.credit(&user_id, 800, source::PURCHASE, Value::Null, None).unwrap();
        let outcome = store
            .draw(&user_id, RollCount::Eleven, &catalog, &config, &mut rng, None)
            .unwrap();
        let results = &outcome.results;
        assert_eq!(results.len(), 11);

        let owned = store.list_owned_items(&user_id).unwrap();
        let new_count = results.iter().filter(|r| r.is_new).count();
        assert_eq!(owned.len(), new_count);

        let duplicates = (results.len() - new_count) as u64;
        assert_eq!(store.balance(&user_id).unwrap().total, duplicates * config.duplicate_rebate);
        assert_eq!(outcome.balance, store.balance(&user_id).unwrap());

        let pity = store.get_pity(&user_id).unwrap();
        assert_eq!(outcome.pity, pity);
        let last_ssr = results.iter().rposition(|r| r.rarity == Rarity::Ssr);
        let expected = match last_ssr {
            Some(i) => results.len() - i - 1,
            None => results.len(),
        };
        assert_eq!(pity.current_count as usize, expected);
    }

    #[test]
    fn equip_swaps_within_category() {
        let (store, _dir) = create_test_store();
        let user_id = UserId::generate();
        let catalog = catalog();
        let config = GachaConfig::default();
        let mut rng = StdRng::seed_from_u64(3);

        store.credit(&user_id, 8_000, source::PURCHASE, Value::Null, None).unwrap();
        for _ in 0..10 {
            store
                .draw(&user_id, RollCount::Eleven, &catalog, &config, &mut rng, None)
                .unwrap();
        }

        let backgrounds: Vec<ItemId> = store
            .list_owned_items(&user_id)
            .unwrap()
            .into_iter()
            .filter(|o| catalog.get(&o.item_id).unwrap().category == "background")
            .map(|o| o.item_id)
            .take(2)
            .collect();
        assert_eq!(backgrounds.len(), 2);

        store.equip_item(&user_id, &backgrounds[0], &catalog).unwrap();
        store.equip_item(&user_id, &backgrounds[1], &catalog).unwrap();

        let equipped: Vec<ItemId> = store
            .list_owned_items(&user_id)
            .unwrap()
            .into_iter()
            .filter(|o| o.is_equipped)
            .map(|o| o.item_id)
            .collect();
        assert_eq!(equipped, vec![backgrounds[1]]);

        let missing = ItemId::generate();
        assert!(matches!(
            store.equip_item(&user_id, &missing, &catalog),
            Err(StoreError::Reward(RewardError::ItemNotOwned { .. }))
        ));
    }

    #[test]
    fn affection_records_bonus_per_threshold() {
        let (store, _dir) = create_test_store();
        let user_id = UserId::generate();
        let cura: CharacterId = "cura".parse().unwrap();
        let config = AffectionConfig::default();

        store.increase_affection(&user_id, &cura, 8, &config, None).unwrap();
        let gain = store.increase_affection(&user_id, &cura, 14, &config, None).unwrap();
        assert_eq!(gain.new_points, 22);
        assert_eq!(gain.thresholds_crossed, vec![10, 20]);

        let bonuses: Vec<CurrencyTransaction> = store
            .list_transactions_by_user(&user_id, 10, 0)
            .unwrap()
            .into_iter()
            .filter(|tx| tx.source == source::AFFECTION_BONUS)
            .collect();
        assert_eq!(bonuses.len(), 2);
        assert_eq!(bonuses[0].metadata["character_id"], "cura");
        assert_eq!(store.balance(&user_id).unwrap().total, 100);

        assert_eq!(store.get_affection(&user_id, &cura).unwrap().points, 22);
        let suu: CharacterId = "suu".parse().unwrap();
        assert_eq!(store.get_affection(&user_id, &suu).unwrap().points, 0);
        assert_eq!(store.list_affection(&user_id).unwrap().len(), 1);
    }

    #[test]
    fn same_day_claim_writes_nothing_new() {
        let (store, _dir) = create_test_store();
        let user_id = UserId::generate();
        let config = DailyBonusConfig::default();
        let today: NaiveDate = "2024-06-01".parse().unwrap();

        let first = store.claim_daily_bonus(&user_id, today, &config, None).unwrap();
        assert!(first.is_new_day);
        let again = store.claim_daily_bonus(&user_id, today, &config, None).unwrap();
        assert!(!again.is_new_day);

        assert_eq!(store.balance(&user_id).unwrap().total, 10);
        assert_eq!(store.list_transactions_by_user(&user_id, 10, 0).unwrap().len(), 1);
        let streak = store.get_login_streak(&user_id).unwrap().unwrap();
        assert_eq!(streak.current_streak, 1);
        assert_eq!(streak.last_login_date, today);
    }
}
