//! Error types for the reward economy.

use crate::gacha::Rarity;
use crate::ids::{IdError, ItemId};

/// Result type for reward operations.
pub type Result<T> = std::result::Result<T, RewardError>;

/// Errors raised by the ledger and the reward engines.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RewardError {
    /// The user cannot cover a debit. Recoverable by earning more coins.
    #[error("insufficient funds: available={available}, required={required}")]
    InsufficientFunds {
        /// Free plus paid coins held.
        available: u64,
        /// Coins the operation needed.
        required: u64,
    },

    /// Zero, oversized, or overflowing amount.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Empty or oversized ledger source tag.
    #[error("invalid source: {0}")]
    InvalidSource(String),

    /// Only single and eleven draws exist.
    #[error("invalid roll count: {0} (expected 1 or 11)")]
    InvalidRollCount(u32),

    /// The catalog has no drawable item for a rarity.
    #[error("catalog has no eligible {rarity} item")]
    CatalogEmpty {
        /// The rarity that could not be served.
        rarity: Rarity,
    },

    /// Malformed catalog data.
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),

    /// Equip requested for an item the user does not own.
    #[error("item not owned: {item_id}")]
    ItemNotOwned {
        /// The requested item.
        item_id: ItemId,
    },

    /// Invalid identifier.
    #[error("invalid identifier: {0}")]
    InvalidId(#[from] IdError),

    /// Economy configuration rejected by validation.
    #[error("configuration error: {0}")]
    Configuration(String),
}
