//! Daily login streaks.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, RewardError};
use crate::UserId;

/// Login reward table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyBonusConfig {
    /// Coins for streak day 1, 2, ... wrapping around.
    pub rewards: Vec<u64>,
}

impl Default for DailyBonusConfig {
    fn default() -> Self {
        Self {
            rewards: vec![10, 15, 30, 15, 20, 20, 40],
        }
    }
}

impl DailyBonusConfig {
    /// Coins granted on the given streak day (1-based).
    #[must_use]
    pub fn reward_for_streak(&self, streak: u32) -> u64 {
        if self.rewards.is_empty() {
            return 0;
        }
        let index = (streak.max(1) as usize - 1) % self.rewards.len();
        self.rewards.get(index).copied().unwrap_or(0)
    }

    /// Check internal consistency.
    ///
    /// # Errors
    ///
    /// `Configuration` for an empty table or a zero entry.
    pub fn validate(&self) -> Result<()> {
        if self.rewards.is_empty() || self.rewards.contains(&0) {
            return Err(RewardError::Configuration(
                "daily rewards must be a non-empty list of positive amounts".into(),
            ));
        }
        Ok(())
    }
}

/// How a claim moved the streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakTransition {
    /// First ever login.
    First,
    /// Already claimed today (or the clock went backwards).
    SameDay,
    /// Logged in yesterday; streak extended.
    Continued,
    /// A day or more was missed; streak restarted.
    Reset,
}

impl StreakTransition {
    /// Whether this transition grants a reward.
    #[must_use]
    pub const fn is_new_day(self) -> bool {
        !matches!(self, Self::SameDay)
    }
}

/// Classify `today` against the previous login date.
#[must_use]
pub fn classify(last_login: Option<NaiveDate>, today: NaiveDate) -> StreakTransition {
    match last_login {
        None => StreakTransition::First,
        Some(last) if today <= last => StreakTransition::SameDay,
        Some(last) if last.succ_opt() == Some(today) => StreakTransition::Continued,
        Some(_) => StreakTransition::Reset,
    }
}

/// Per-user login streak.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginStreakState {
    /// Owner.
    pub user_id: UserId,
    /// Most recent rewarded day.
    pub last_login_date: NaiveDate,
    /// Consecutive days ending at `last_login_date`.
    pub current_streak: u32,
    /// Every rewarded day.
    pub history: BTreeSet<NaiveDate>,
    /// Last change.
    pub updated_at: DateTime<Utc>,
}

/// Result of a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyBonusOutcome {
    /// Coins credited (0 when not a new day).
    pub coins_earned: u64,
    /// Streak after the claim.
    pub current_streak: u32,
    /// Whether this claim was the first of the day.
    pub is_new_day: bool,
}

impl LoginStreakState {
    /// Apply a claim on `today` to an optional prior state.
    ///
    /// Returns the updated state (unchanged for a same-day claim) and the
    /// outcome. Crediting the coins is the caller's job.
    #[must_use]
    pub fn claim(
        previous: Option<Self>,
        user_id: UserId,
        today: NaiveDate,
        config: &DailyBonusConfig,
    ) -> (Self, DailyBonusOutcome) {
        let transition = classify(previous.as_ref().map(|s| s.last_login_date), today);

        let mut state = previous.unwrap_or_else(|| Self {
            user_id,
            last_login_date: today,
            current_streak: 0,
            history: BTreeSet::new(),
            updated_at: Utc::now(),
        });

        match transition {
            StreakTransition::SameDay => {
                let outcome = DailyBonusOutcome {
                    coins_earned: 0,
                    current_streak: state.current_streak,
                    is_new_day: false,
                };
                return (state, outcome);
            }
            StreakTransition::First | StreakTransition::Reset => state.current_streak = 1,
            StreakTransition::Continued => state.current_streak = state.current_streak.saturating_add(1),
        }

        state.last_login_date = today;
        state.history.insert(today);
        state.updated_at = Utc::now();

        let outcome = DailyBonusOutcome {
            coins_earned: config.reward_for_streak(state.current_streak),
            current_streak: state.current_streak,
            is_new_day: true,
        };
        (state, outcome)
    }
}
