//! Core types and reward state machines for homehome.
//!
//! This crate holds the pure rules of the reward economy. Nothing here
//! touches storage; the store crate persists what these types compute.
//!
//! - **Identifiers**: `UserId`, `ItemId`, `TransactionId`, `OwnedItemId`, `CharacterId`
//! - **Ledger**: `CurrencyBalance`, `CurrencyTransaction`, `TransactionKind`
//! - **Gacha**: `GachaConfig`, `PityState`, `ItemCatalog`, `Rarity`, `RollCount`
//! - **Affection**: `AffectionState`, `AffectionConfig`
//! - **Login streaks**: `LoginStreakState`, `DailyBonusConfig`
//!
//! # Coins
//!
//! Balances are split into free coins (earned in-app) and paid coins
//! (purchased). Debits always spend free coins first. Amounts are `u64`
//! so a balance can never go negative.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod affection;
pub mod economy;
pub mod error;
pub mod gacha;
pub mod ids;
pub mod ledger;
pub mod streak;

pub use affection::{thresholds_between, AffectionConfig, AffectionGain, AffectionState};
pub use economy::EconomyConfig;
pub use error::{Result, RewardError};
pub use gacha::{
    CatalogEntry, DrawOutcome, DrawResult, GachaConfig, ItemCatalog, OwnedItem, PityState, Rarity,
    RarityDraw, RollCount, RATE_SCALE_BP,
};
pub use ids::{
    CharacterId, IdError, IdempotencyKey, ItemId, OwnedItemId, TransactionId, UserId,
    MAX_CHARACTER_ID_LEN, MAX_IDEMPOTENCY_KEY_LEN,
};
pub use ledger::{
    source, validate_source, BalanceSnapshot, CurrencyBalance, CurrencyTransaction, DebitSplit,
    TransactionKind, MAX_SOURCE_LEN,
};
pub use streak::{
    classify, DailyBonusConfig, DailyBonusOutcome, LoginStreakState, StreakTransition,
};
