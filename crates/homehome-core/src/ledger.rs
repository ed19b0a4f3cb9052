//! Currency balance and transaction types.
//!
//! A balance is split into two provenance buckets. Reward coins always land
//! in the free bucket; the paid bucket is only filled by the billing side.
//! Debits drain free coins before touching paid ones.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, RewardError};
use crate::{TransactionId, UserId};

/// Source tags written on ledger entries by the engines.
pub mod source {
    /// Coins spent on a gacha draw.
    pub const GACHA: &str = "gacha";
    /// Rebate for drawing an item that was already owned.
    pub const GACHA_DUPLICATE: &str = "gacha_duplicate";
    /// Bonus for crossing an affection threshold.
    pub const AFFECTION_BONUS: &str = "affection_bonus";
    /// Daily login reward.
    pub const DAILY_LOGIN: &str = "daily_login";
    /// Coins bought through the billing collaborator.
    pub const PURCHASE: &str = "purchase";
}

/// Longest accepted source tag.
pub const MAX_SOURCE_LEN: usize = 64;

/// A user's spendable coins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyBalance {
    /// Owner.
    pub user_id: UserId,
    /// Reward coins, spent first.
    pub free_coins: u64,
    /// Purchased coins.
    pub paid_coins: u64,
    /// Last mutation time.
    pub updated_at: DateTime<Utc>,
}

/// How a debit was covered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebitSplit {
    /// Taken from the free bucket.
    pub from_free: u64,
    /// Taken from the paid bucket.
    pub from_paid: u64,
}

/// Read-only view of a balance returned to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    /// Free coins.
    pub free: u64,
    /// Paid coins.
    pub paid: u64,
    /// `free + paid`.
    pub total: u64,
}

impl CurrencyBalance {
    /// A zero balance, used for users with no record yet.
    #[must_use]
    pub fn empty(user_id: UserId) -> Self {
        Self {
            user_id,
            free_coins: 0,
            paid_coins: 0,
            updated_at: Utc::now(),
        }
    }

    /// Free plus paid coins.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.free_coins.saturating_add(self.paid_coins)
    }

    /// Snapshot for callers.
    #[must_use]
    pub const fn snapshot(&self) -> BalanceSnapshot {
        BalanceSnapshot {
            free: self.free_coins,
            paid: self.paid_coins,
            total: self.total(),
        }
    }

    /// Add reward coins to the free bucket.
    ///
    /// # Errors
    ///
    /// `InvalidAmount` when `amount` is zero or the bucket would overflow.
    pub fn credit_free(&mut self, amount: u64) -> Result<()> {
        self.free_coins = checked_credit(self.free_coins, self.paid_coins, amount)?;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Add purchased coins to the paid bucket.
    ///
    /// # Errors
    ///
    /// `InvalidAmount` when `amount` is zero or the bucket would overflow.
    pub fn credit_paid(&mut self, amount: u64) -> Result<()> {
        self.paid_coins = checked_credit(self.paid_coins, self.free_coins, amount)?;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Remove `amount` coins, free bucket first.
    ///
    /// On error the balance is left untouched.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` when `amount` is zero.
    /// - `InsufficientFunds` when `free + paid < amount`.
    pub fn debit(&mut self, amount: u64) -> Result<DebitSplit> {
        if amount == 0 {
            return Err(RewardError::InvalidAmount("debit amount must be positive".into()));
        }
        let available = self.total();
        if available < amount {
            return Err(RewardError::InsufficientFunds {
                available,
                required: amount,
            });
        }

        let from_free = amount.min(self.free_coins);
        let from_paid = amount - from_free;
        self.free_coins -= from_free;
        self.paid_coins -= from_paid;
        self.updated_at = Utc::now();

        Ok(DebitSplit {
            from_free,
            from_paid,
        })
    }
}

fn checked_credit(bucket: u64, other: u64, amount: u64) -> Result<u64> {
    if amount == 0 {
        return Err(RewardError::InvalidAmount("credit amount must be positive".into()));
    }
    bucket
        .checked_add(amount)
        .filter(|next| next.checked_add(other).is_some())
        .ok_or_else(|| RewardError::InvalidAmount("credit would overflow balance".into()))
}

/// Validate a caller-supplied source tag.
///
/// # Errors
///
/// `InvalidSource` for an empty or oversized tag.
pub fn validate_source(source: &str) -> Result<()> {
    if source.is_empty() || source.len() > MAX_SOURCE_LEN {
        return Err(RewardError::InvalidSource(format!(
            "source tag must be 1-{MAX_SOURCE_LEN} characters"
        )));
    }
    Ok(())
}

/// Direction of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Coins added.
    Earn,
    /// Coins removed.
    Spend,
}

/// An immutable ledger entry. Exactly one per successful credit or debit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyTransaction {
    /// Time-ordered id.
    pub id: TransactionId,
    /// Owner.
    pub user_id: UserId,
    /// Earn or spend.
    pub kind: TransactionKind,
    /// Unsigned amount; the sign comes from `kind`.
    pub amount: u64,
    /// What caused the entry (`gacha`, `daily_login`, ...).
    pub source: String,
    /// Total balance right after this entry.
    pub balance_after: u64,
    /// Free-form context (`character_id`, `item_id`, ...).
    pub metadata: serde_json::Value,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl CurrencyTransaction {
    /// Build an `earn` entry.
    #[must_use]
    pub fn earn(
        user_id: UserId,
        amount: u64,
        source: &str,
        balance_after: u64,
        metadata: serde_json::Value,
    ) -> Self {
        Self::new(user_id, TransactionKind::Earn, amount, source, balance_after, metadata)
    }

    /// Build a `spend` entry.
    #[must_use]
    pub fn spend(
        user_id: UserId,
        amount: u64,
        source: &str,
        balance_after: u64,
        metadata: serde_json::Value,
    ) -> Self {
        Self::new(user_id, TransactionKind::Spend, amount, source, balance_after, metadata)
    }

    fn new(
        user_id: UserId,
        kind: TransactionKind,
        amount: u64,
        source: &str,
        balance_after: u64,
        metadata: serde_json::Value,
    ) -> Self {
        Self {
            id: TransactionId::generate(),
            user_id,
            kind,
            amount,
            source: source.to_owned(),
            balance_after,
            metadata,
            created_at: Utc::now(),
        }
    }

    /// Amount with sign applied: positive for earn, negative for spend.
    #[must_use]
    pub fn signed_amount(&self) -> i128 {
        match self.kind {
            TransactionKind::Earn => i128::from(self.amount),
            TransactionKind::Spend => -i128::from(self.amount),
        }
    }
}
