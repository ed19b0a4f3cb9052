//! Daily login bonus handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use homehome_core::{classify, DailyBonusOutcome, StreakTransition};
use homehome_store::Store;

use super::idempotency_key;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Claim request. The body is optional.
#[derive(Debug, Default, Deserialize)]
pub struct ClaimRequest {
    /// Optional retry key.
    #[serde(default)]
    pub idempotency_key: Option<String>,
}

/// Claim response.
#[derive(Debug, Serialize)]
pub struct ClaimResponse {
    /// Coins credited by this claim; zero on a repeat.
    pub coins_earned: u64,
    /// Consecutive days including today.
    pub current_streak: u32,
    /// False when today was already claimed.
    pub is_new_day: bool,
}

impl From<DailyBonusOutcome> for ClaimResponse {
    fn from(outcome: DailyBonusOutcome) -> Self {
        Self {
            coins_earned: outcome.coins_earned,
            current_streak: outcome.current_streak,
            is_new_day: outcome.is_new_day,
        }
    }
}

/// Claim today's login bonus. Days are UTC calendar dates.
pub async fn claim(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    body: Option<Json<ClaimRequest>>,
) -> Result<Json<ClaimResponse>, ApiError> {
    let body = body.map(|Json(b)| b).unwrap_or_default();
    let key = idempotency_key(body.idempotency_key.as_deref())?;
    let today = Utc::now().date_naive();
    let outcome = state.store.claim_daily_bonus(
        &auth.user_id,
        today,
        &state.economy().daily_bonus,
        key.as_ref(),
    )?;
    Ok(Json(outcome.into()))
}

/// Streak response.
#[derive(Debug, Serialize)]
pub struct StreakResponse {
    /// Consecutive days, zero if the user never claimed.
    pub current_streak: u32,
    /// Last claimed date (`YYYY-MM-DD`).
    pub last_login_date: Option<String>,
    /// Reward for the next claim that starts a new day.
    pub next_reward: u64,
    /// Every claimed date (`YYYY-MM-DD`), oldest first, for the calendar.
    pub history: Vec<String>,
}

/// Get the login streak.
pub async fn streak(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<StreakResponse>, ApiError> {
    let stored = state.store.get_login_streak(&auth.user_id)?;
    let today = Utc::now().date_naive();

    // A missed day means the next claim starts over.
    let (current_streak, next_day) = match &stored {
        Some(s) => match classify(Some(s.last_login_date), today) {
            StreakTransition::Reset => (0, 1),
            _ => (s.current_streak, s.current_streak.saturating_add(1)),
        },
        None => (0, 1),
    };

    let (last_login_date, history) = match stored {
        Some(s) => (
            Some(s.last_login_date.to_string()),
            s.history.iter().map(ToString::to_string).collect(),
        ),
        None => (None, Vec::new()),
    };

    Ok(Json(StreakResponse {
        current_streak,
        last_login_date,
        next_reward: state.economy().daily_bonus.reward_for_streak(next_day),
        history,
    }))
}
