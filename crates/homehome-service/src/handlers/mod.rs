//! API handlers.

use homehome_core::{BalanceSnapshot, IdempotencyKey};
use serde::Serialize;

use crate::error::ApiError;

pub mod affection;
pub mod currency;
pub mod gacha;
pub mod health;
pub mod items;
pub mod login_bonus;

/// Balance response, shared by every endpoint that moves coins.
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    /// Free (earned) coins.
    pub free: u64,
    /// Paid (purchased) coins.
    pub paid: u64,
    /// Free plus paid.
    pub total: u64,
}

impl From<BalanceSnapshot> for BalanceResponse {
    fn from(balance: BalanceSnapshot) -> Self {
        Self {
            free: balance.free,
            paid: balance.paid,
            total: balance.total,
        }
    }
}

/// Parse an optional idempotency key from a request body.
fn idempotency_key(raw: Option<&str>) -> Result<Option<IdempotencyKey>, ApiError> {
    raw.map(str::parse::<IdempotencyKey>).transpose().map_err(ApiError::from)
}
