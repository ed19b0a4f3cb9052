//! `RocksDB` storage and reward engines for homehome.
//!
//! This crate persists the reward economy and runs its four engines (ledger,
//! gacha, affection, daily bonus) as atomic per-user units of work.
//!
//! # Architecture
//!
//! The storage uses the following column families:
//!
//! - `balances`: `CurrencyBalance`, keyed by `user_id`
//! - `transactions`: ledger entries, keyed by `transaction_id` (ULID)
//! - `transactions_by_user`: index for listing a user's history
//! - `owned_items`: inventory, keyed by `user_id || item_id`
//! - `gacha_pity`: pity counters, keyed by `user_id`
//! - `affection`: points, keyed by `user_id || character_id`
//! - `login_streaks`: streak state, keyed by `user_id`
//! - `request_keys`: consumed idempotency keys, keyed by `user_id || key`
//!
//! Each mutating call takes the user's lock, reads what it needs, computes
//! with the `homehome-core` state machines and writes everything in one
//! `WriteBatch`. A call that fails before the write changes nothing.
//!
//! # Example
//!
//! ```no_run
//! use homehome_store::{RocksStore, Store};
//! use homehome_core::{source, UserId};
//!
//! let store = RocksStore::open("/tmp/homehome-db").unwrap();
//!
//! let user_id = UserId::generate();
//! store
//!     .credit(&user_id, 100, source::DAILY_LOGIN, serde_json::Value::Null, None)
//!     .unwrap();
//! let balance = store.balance(&user_id).unwrap();
//! assert_eq!(balance.total, 100);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod locks;
pub mod rocks;
pub mod schema;
mod unit;

pub use error::{Result, StoreError};
pub use locks::UserLocks;
pub use rocks::RocksStore;

use chrono::NaiveDate;
use rand::RngCore;
use serde_json::Value;

use homehome_core::{
    AffectionConfig, AffectionGain, AffectionState, BalanceSnapshot, CharacterId,
    CurrencyTransaction, DailyBonusConfig, DailyBonusOutcome, DrawOutcome, GachaConfig,
    IdempotencyKey, ItemCatalog, ItemId, LoginStreakState, OwnedItem, PityState, RollCount,
    TransactionId, UserId,
};

/// Largest page a caller may request.
///
/// [`Store::list_transactions_by_user`] returns up to one row more so a
/// full page can still tell whether another one follows.
pub const MAX_TRANSACTION_PAGE: usize = 100;

/// The storage trait defining every reward operation.
///
/// Mutating methods are atomic per user: they either commit every write or
/// none. An optional idempotency key is consumed only on success.
pub trait Store: Send + Sync {
    // =========================================================================
    // Ledger
    // =========================================================================

    /// Current balance. Zeros for a user with no record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn balance(&self, user_id: &UserId) -> Result<BalanceSnapshot>;

    /// Credit free (reward) coins and append an `earn` entry.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` for zero or overflow.
    /// - `InvalidSource` for a bad source tag.
    /// - `StoreError::DuplicateRequest` on key replay.
    fn credit(
        &self,
        user_id: &UserId,
        amount: u64,
        source: &str,
        metadata: Value,
        idempotency_key: Option<&IdempotencyKey>,
    ) -> Result<BalanceSnapshot>;

    /// Credit purchased coins and append an `earn` entry.
    ///
    /// # Errors
    ///
    /// Same as [`Store::credit`].
    fn credit_paid(
        &self,
        user_id: &UserId,
        amount: u64,
        source: &str,
        metadata: Value,
        idempotency_key: Option<&IdempotencyKey>,
    ) -> Result<BalanceSnapshot>;

    /// Debit coins (free first) and append a `spend` entry.
    ///
    /// # Errors
    ///
    /// - `InsufficientFunds` when the total is too low; nothing changes.
    /// - `InvalidAmount` / `InvalidSource` / `DuplicateRequest` as for credit.
    fn debit(
        &self,
        user_id: &UserId,
        amount: u64,
        source: &str,
        metadata: Value,
        idempotency_key: Option<&IdempotencyKey>,
    ) -> Result<BalanceSnapshot>;

    /// Get a transaction by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_transaction(&self, transaction_id: &TransactionId) -> Result<Option<CurrencyTransaction>>;

    /// List transactions for a user, newest first. `limit` is capped at
    /// [`MAX_TRANSACTION_PAGE`] plus one.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_transactions_by_user(
        &self,
        user_id: &UserId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<CurrencyTransaction>>;

    // =========================================================================
    // Gacha
    // =========================================================================

    /// Charge for and perform `count` draws, in order. The outcome carries
    /// the balance and pity counter as committed by this call.
    ///
    /// # Errors
    ///
    /// - `InsufficientFunds`: no draw happens and pity is unchanged.
    /// - `CatalogEmpty`: configuration error; nothing is written.
    fn draw(
        &self,
        user_id: &UserId,
        count: RollCount,
        catalog: &ItemCatalog,
        config: &GachaConfig,
        rng: &mut dyn RngCore,
        idempotency_key: Option<&IdempotencyKey>,
    ) -> Result<DrawOutcome>;

    /// Pity counter. A fresh counter for a user who never drew.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_pity(&self, user_id: &UserId) -> Result<PityState>;

    /// Every item the user owns, in key order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_owned_items(&self, user_id: &UserId) -> Result<Vec<OwnedItem>>;

    /// Equip an owned item and unequip the others of its category.
    ///
    /// # Errors
    ///
    /// `ItemNotOwned` when the user does not own `item_id`.
    fn equip_item(
        &self,
        user_id: &UserId,
        item_id: &ItemId,
        catalog: &ItemCatalog,
    ) -> Result<OwnedItem>;

    // =========================================================================
    // Affection
    // =========================================================================

    /// Add affection points and credit one bonus per threshold crossed.
    ///
    /// # Errors
    ///
    /// `InvalidAmount` for zero or oversized amounts.
    fn increase_affection(
        &self,
        user_id: &UserId,
        character_id: &CharacterId,
        amount: u64,
        config: &AffectionConfig,
        idempotency_key: Option<&IdempotencyKey>,
    ) -> Result<AffectionGain>;

    /// Affection for one character; zero points when there is no record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_affection(&self, user_id: &UserId, character_id: &CharacterId)
        -> Result<AffectionState>;

    /// Affection for every character the user has interacted with.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_affection(&self, user_id: &UserId) -> Result<Vec<AffectionState>>;

    // =========================================================================
    // Daily bonus
    // =========================================================================

    /// Claim the login bonus for `today`. Repeated claims on one day are a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn claim_daily_bonus(
        &self,
        user_id: &UserId,
        today: NaiveDate,
        config: &DailyBonusConfig,
        idempotency_key: Option<&IdempotencyKey>,
    ) -> Result<DailyBonusOutcome>;

    /// Stored streak, if the user ever claimed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_login_streak(&self, user_id: &UserId) -> Result<Option<LoginStreakState>>;
}
