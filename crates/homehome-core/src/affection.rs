//! Character affection and threshold rewards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, RewardError};
use crate::{CharacterId, UserId};

/// Affection step size and bonus settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AffectionConfig {
    /// Every multiple of this is a threshold.
    pub threshold_step: u64,
    /// Coins credited per threshold crossed.
    pub bonus_per_threshold: u64,
    /// Largest `amount` accepted by one call.
    pub max_increase_per_call: u64,
}

impl Default for AffectionConfig {
    fn default() -> Self {
        Self {
            threshold_step: 10,
            bonus_per_threshold: 50,
            max_increase_per_call: 100,
        }
    }
}

impl AffectionConfig {
    /// Check internal consistency.
    ///
    /// # Errors
    ///
    /// `Configuration` for a zero step or a zero per-call cap.
    pub fn validate(&self) -> Result<()> {
        if self.threshold_step == 0 {
            return Err(RewardError::Configuration("threshold step must be positive".into()));
        }
        if self.max_increase_per_call == 0 {
            return Err(RewardError::Configuration(
                "max affection increase must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Affection a user has built with one character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffectionState {
    /// Owner.
    pub user_id: UserId,
    /// Character.
    pub character_id: CharacterId,
    /// Accumulated points. Never decreases.
    pub points: u64,
    /// Last change.
    pub updated_at: DateTime<Utc>,
}

/// Result of [`AffectionState::increase`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffectionGain {
    /// Points after the increase.
    pub new_points: u64,
    /// Thresholds in `(old, new]`, ascending.
    pub thresholds_crossed: Vec<u64>,
    /// `bonus_per_threshold * thresholds_crossed.len()`.
    pub coins_awarded: u64,
}

impl AffectionGain {
    /// Highest threshold crossed, or 0 when none was.
    #[must_use]
    pub fn threshold_reached(&self) -> u64 {
        self.thresholds_crossed.last().copied().unwrap_or(0)
    }
}

impl AffectionState {
    /// Zero affection.
    #[must_use]
    pub fn new(user_id: UserId, character_id: CharacterId) -> Self {
        Self {
            user_id,
            character_id,
            points: 0,
            updated_at: Utc::now(),
        }
    }

    /// Add `amount` points and report the thresholds crossed.
    ///
    /// The state is only modified on success.
    ///
    /// # Errors
    ///
    /// `InvalidAmount` when `amount` is zero, above the per-call cap, or
    /// would overflow.
    pub fn increase(&mut self, amount: u64, config: &AffectionConfig) -> Result<AffectionGain> {
        if amount == 0 {
            return Err(RewardError::InvalidAmount("affection amount must be positive".into()));
        }
        if amount > config.max_increase_per_call {
            return Err(RewardError::InvalidAmount(format!(
                "affection amount {amount} exceeds {}",
                config.max_increase_per_call
            )));
        }
        let new_points = self
            .points
            .checked_add(amount)
            .ok_or_else(|| RewardError::InvalidAmount("affection would overflow".into()))?;

        let thresholds_crossed = thresholds_between(self.points, new_points, config.threshold_step);
        let coins_awarded = config
            .bonus_per_threshold
            .saturating_mul(thresholds_crossed.len() as u64);

        self.points = new_points;
        self.updated_at = Utc::now();

        Ok(AffectionGain {
            new_points,
            thresholds_crossed,
            coins_awarded,
        })
    }
}

/// Multiples of `step` in the half-open interval `(old, new]`.
#[must_use]
pub fn thresholds_between(old: u64, new: u64, step: u64) -> Vec<u64> {
    if step == 0 || new <= old {
        return Vec::new();
    }
    let first = (old / step + 1).saturating_mul(step);
    (0..)
        .map_while(|i: u64| first.checked_add(i.checked_mul(step)?))
        .take_while(|&t| t <= new)
        .collect()
}
