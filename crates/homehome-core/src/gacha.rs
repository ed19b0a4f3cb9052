//! Gacha draw rules: rarities, roll counts, the pity counter and the item
//! catalog.
//!
//! Randomness enters in two places only: a rarity roll in basis points and a
//! uniform index into the eligible items of that rarity. The pity guarantee
//! is a separate branch of [`PityState::next_rarity`] and never depends on
//! the roll.

use std::collections::{HashMap, HashSet};
use std::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RewardError};
use crate::{BalanceSnapshot, ItemId, OwnedItemId, UserId};

/// Rates are expressed in basis points out of this scale.
pub const RATE_SCALE_BP: u32 = 10_000;

/// Item rarity tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rarity {
    /// Common.
    #[serde(rename = "R")]
    R,
    /// Super rare.
    #[serde(rename = "SR")]
    Sr,
    /// Top rarity; resets the pity counter.
    #[serde(rename = "SSR")]
    Ssr,
}

impl Rarity {
    /// Every tier, lowest first.
    pub const ALL: [Self; 3] = [Self::R, Self::Sr, Self::Ssr];

    /// Display label (`R`, `SR`, `SSR`).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::R => "R",
            Self::Sr => "SR",
            Self::Ssr => "SSR",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Number of items drawn by one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum RollCount {
    /// One draw at full price.
    Single,
    /// Eleven draws for the price of ten.
    Eleven,
}

impl RollCount {
    /// Number of draws performed.
    #[must_use]
    pub const fn draws(self) -> u32 {
        match self {
            Self::Single => 1,
            Self::Eleven => 11,
        }
    }
}

impl TryFrom<u32> for RollCount {
    type Error = RewardError;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            1 => Ok(Self::Single),
            11 => Ok(Self::Eleven),
            other => Err(RewardError::InvalidRollCount(other)),
        }
    }
}

impl From<RollCount> for u32 {
    fn from(count: RollCount) -> Self {
        count.draws()
    }
}

/// Gacha prices, rates and pity settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GachaConfig {
    /// Cost of a single draw.
    pub single_cost: u64,
    /// Cost of an eleven-draw (one draw bundled free).
    pub eleven_cost: u64,
    /// Draws without an SSR after which the next draw is forced to SSR.
    pub pity_threshold: u32,
    /// SSR rate in basis points.
    pub ssr_rate_bp: u32,
    /// SR rate in basis points. R takes the remainder.
    pub sr_rate_bp: u32,
    /// Free coins credited when a drawn item is already owned.
    pub duplicate_rebate: u64,
}

impl Default for GachaConfig {
    fn default() -> Self {
        Self {
            single_cost: 80,
            eleven_cost: 800,
            pity_threshold: 50,
            ssr_rate_bp: 300,
            sr_rate_bp: 1_200,
            duplicate_rebate: 10,
        }
    }
}

impl GachaConfig {
    /// Coins charged for `count`.
    #[must_use]
    pub const fn cost(&self, count: RollCount) -> u64 {
        match count {
            RollCount::Single => self.single_cost,
            RollCount::Eleven => self.eleven_cost,
        }
    }

    /// Map a roll in `0..RATE_SCALE_BP` onto a rarity band.
    ///
    /// Bands are laid out `[SSR | SR | R]` from zero.
    #[must_use]
    pub const fn rarity_for_roll(&self, roll_bp: u32) -> Rarity {
        if roll_bp < self.ssr_rate_bp {
            Rarity::Ssr
        } else if roll_bp < self.ssr_rate_bp.saturating_add(self.sr_rate_bp) {
            Rarity::Sr
        } else {
            Rarity::R
        }
    }

    /// Draw a uniform roll for [`Self::rarity_for_roll`].
    pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> u32 {
        rng.gen_range(0..RATE_SCALE_BP)
    }

    /// Check internal consistency.
    ///
    /// # Errors
    ///
    /// `Configuration` for zero prices, a zero pity threshold or rates above
    /// the scale.
    pub fn validate(&self) -> Result<()> {
        if self.single_cost == 0 || self.eleven_cost == 0 {
            return Err(RewardError::Configuration("gacha costs must be positive".into()));
        }
        if self.pity_threshold == 0 {
            return Err(RewardError::Configuration("pity threshold must be positive".into()));
        }
        if self.ssr_rate_bp.saturating_add(self.sr_rate_bp) > RATE_SCALE_BP {
            return Err(RewardError::Configuration(format!(
                "SSR + SR rates exceed {RATE_SCALE_BP} bp"
            )));
        }
        Ok(())
    }
}

/// Outcome of one step of the pity state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RarityDraw {
    /// Rarity awarded.
    pub rarity: Rarity,
    /// True when the pity guarantee forced the SSR.
    pub guaranteed: bool,
}

/// Per-user pity counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PityState {
    /// Owner.
    pub user_id: UserId,
    /// Draws since the last SSR.
    pub current_count: u32,
    /// Time of the last SSR, if any.
    pub last_ssr_at: Option<DateTime<Utc>>,
}

impl PityState {
    /// Fresh counter for a user who has never drawn.
    #[must_use]
    pub const fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            current_count: 0,
            last_ssr_at: None,
        }
    }

    /// Advance the counter by one draw.
    ///
    /// When the counter has reached the threshold the draw is an SSR
    /// regardless of `roll_bp`. Any SSR resets the counter to zero; any other
    /// rarity increments it.
    pub fn next_rarity(
        &mut self,
        config: &GachaConfig,
        roll_bp: u32,
        now: DateTime<Utc>,
    ) -> RarityDraw {
        let draw = if self.current_count >= config.pity_threshold {
            RarityDraw {
                rarity: Rarity::Ssr,
                guaranteed: true,
            }
        } else {
            RarityDraw {
                rarity: config.rarity_for_roll(roll_bp),
                guaranteed: false,
            }
        };

        if draw.rarity == Rarity::Ssr {
            self.current_count = 0;
            self.last_ssr_at = Some(now);
        } else {
            self.current_count += 1;
        }
        draw
    }

    /// Misses left before the guarantee kicks in; zero means the next draw
    /// is a guaranteed SSR.
    #[must_use]
    pub const fn draws_until_guarantee(&self, config: &GachaConfig) -> u32 {
        config.pity_threshold.saturating_sub(self.current_count)
    }
}

/// Reference data for one drawable (or default) item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Item id.
    pub id: ItemId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Rarity tier.
    pub rarity: Rarity,
    /// Wardrobe slot (`outfit`, `background`, `effect`...).
    pub category: String,
    /// Starter items are never drawn.
    #[serde(default)]
    pub is_default: bool,
}

/// Read-only item catalog indexed by rarity.
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    entries: Vec<CatalogEntry>,
    by_id: HashMap<ItemId, usize>,
    eligible: HashMap<Rarity, Vec<usize>>,
}

impl ItemCatalog {
    /// Index a list of entries.
    ///
    /// # Errors
    ///
    /// `InvalidCatalog` when an item id appears twice.
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self> {
        let mut by_id = HashMap::with_capacity(entries.len());
        let mut eligible: HashMap<Rarity, Vec<usize>> = HashMap::new();

        for (index, entry) in entries.iter().enumerate() {
            if by_id.insert(entry.id, index).is_some() {
                return Err(RewardError::InvalidCatalog(format!(
                    "duplicate item id {}",
                    entry.id
                )));
            }
            if !entry.is_default {
                eligible.entry(entry.rarity).or_default().push(index);
            }
        }

        Ok(Self {
            entries,
            by_id,
            eligible,
        })
    }

    /// Parse a JSON array of entries.
    ///
    /// # Errors
    ///
    /// `InvalidCatalog` for malformed JSON or duplicate ids.
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<CatalogEntry> =
            serde_json::from_str(json).map_err(|e| RewardError::InvalidCatalog(e.to_string()))?;
        Self::new(entries)
    }

    /// Fail unless every rarity has at least one drawable item.
    ///
    /// # Errors
    ///
    /// `CatalogEmpty` naming the first rarity with nothing to draw.
    pub fn ensure_drawable(&self) -> Result<()> {
        for rarity in Rarity::ALL {
            if self.eligible_count(rarity) == 0 {
                return Err(RewardError::CatalogEmpty { rarity });
            }
        }
        Ok(())
    }

    /// Look up an entry.
    #[must_use]
    pub fn get(&self, id: &ItemId) -> Option<&CatalogEntry> {
        self.by_id.get(id).and_then(|&i| self.entries.get(i))
    }

    /// All entries, defaults included.
    #[must_use]
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Number of drawable items of `rarity`.
    #[must_use]
    pub fn eligible_count(&self, rarity: Rarity) -> usize {
        self.eligible.get(&rarity).map_or(0, Vec::len)
    }

    /// Pick a drawable item of `rarity` uniformly.
    ///
    /// # Errors
    ///
    /// `CatalogEmpty` when no non-default item has that rarity.
    pub fn pick<R: Rng + ?Sized>(&self, rarity: Rarity, rng: &mut R) -> Result<&CatalogEntry> {
        let pool = self
            .eligible
            .get(&rarity)
            .filter(|pool| !pool.is_empty())
            .ok_or(RewardError::CatalogEmpty { rarity })?;
        let index = pool[rng.gen_range(0..pool.len())];
        self.entries
            .get(index)
            .ok_or(RewardError::CatalogEmpty { rarity })
    }

    /// Item ids sharing `category`.
    #[must_use]
    pub fn ids_in_category(&self, category: &str) -> HashSet<ItemId> {
        self.entries
            .iter()
            .filter(|e| e.category == category)
            .map(|e| e.id)
            .collect()
    }
}

/// One item in a user's inventory. At most one row per (user, item).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnedItem {
    /// Row id.
    pub id: OwnedItemId,
    /// Owner.
    pub user_id: UserId,
    /// Catalog item.
    pub item_id: ItemId,
    /// First time the item was obtained.
    pub obtained_at: DateTime<Utc>,
    /// Whether the item is worn.
    pub is_equipped: bool,
}

impl OwnedItem {
    /// A freshly obtained, unequipped item.
    #[must_use]
    pub fn obtained(user_id: UserId, item_id: ItemId, now: DateTime<Utc>) -> Self {
        Self {
            id: OwnedItemId::generate(),
            user_id,
            item_id,
            obtained_at: now,
            is_equipped: false,
        }
    }
}

/// Result of a single draw as reported to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawResult {
    /// Item drawn.
    pub item_id: ItemId,
    /// Its rarity.
    pub rarity: Rarity,
    /// False when the user already owned it (a rebate was credited).
    pub is_new: bool,
}

/// Everything one committed draw call produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawOutcome {
    /// Results in draw order.
    pub results: Vec<DrawResult>,
    /// Balance right after the cost and any rebates were applied.
    pub balance: BalanceSnapshot,
    /// Pity counter after the last draw.
    pub pity: PityState,
}
