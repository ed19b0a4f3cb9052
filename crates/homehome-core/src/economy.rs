//! Aggregate economy settings.

use serde::{Deserialize, Serialize};

use crate::affection::AffectionConfig;
use crate::error::Result;
use crate::gacha::GachaConfig;
use crate::streak::DailyBonusConfig;

/// Every tunable number of the reward economy.
///
/// Loaded from JSON at startup; missing sections fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Gacha prices, rates and pity.
    pub gacha: GachaConfig,
    /// Affection thresholds and bonus.
    pub affection: AffectionConfig,
    /// Login reward table.
    pub daily_bonus: DailyBonusConfig,
}

impl EconomyConfig {
    /// Validate every section.
    ///
    /// # Errors
    ///
    /// The first `Configuration` error found.
    pub fn validate(&self) -> Result<()> {
        self.gacha.validate()?;
        self.affection.validate()?;
        self.daily_bonus.validate()
    }
}
