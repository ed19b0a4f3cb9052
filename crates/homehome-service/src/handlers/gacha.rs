//! Gacha draw and pity handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use homehome_core::{DrawResult, ItemId, PityState, Rarity, RollCount};
use homehome_store::Store;

use super::{idempotency_key, BalanceResponse};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Draw request.
#[derive(Debug, Deserialize)]
pub struct DrawRequest {
    /// 1 or 11.
    pub roll_count: u32,
    /// Optional retry key.
    #[serde(default)]
    pub idempotency_key: Option<String>,
}

/// One drawn item.
#[derive(Debug, Serialize)]
pub struct DrawResultResponse {
    /// Catalog item.
    pub item_id: ItemId,
    /// Item name from the catalog.
    pub name: String,
    /// Rarity tier.
    pub rarity: Rarity,
    /// False when the draw was a duplicate and paid a rebate instead.
    pub is_new: bool,
}

/// Pity counter response.
#[derive(Debug, Serialize)]
pub struct PityResponse {
    /// Draws since the last SSR.
    pub current_count: u32,
    /// Time of the last SSR.
    pub last_ssr_at: Option<String>,
    /// Misses left before an SSR is guaranteed.
    pub draws_until_guarantee: u32,
}

/// Draw response.
#[derive(Debug, Serialize)]
pub struct DrawResponse {
    /// Results in draw order.
    pub results: Vec<DrawResultResponse>,
    /// Balance after the cost and any rebates.
    pub balance: BalanceResponse,
    /// Counter after the draws.
    pub pity: PityResponse,
}

fn pity_response(state: &AppState, pity: &PityState) -> PityResponse {
    PityResponse {
        current_count: pity.current_count,
        last_ssr_at: pity.last_ssr_at.map(|t| t.to_rfc3339()),
        draws_until_guarantee: pity.draws_until_guarantee(&state.economy().gacha),
    }
}

/// Perform a single or 11-draw.
pub async fn draw(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<DrawRequest>,
) -> Result<Json<DrawResponse>, ApiError> {
    let count = RollCount::try_from(body.roll_count)?;
    let key = idempotency_key(body.idempotency_key.as_deref())?;

    let mut rng = StdRng::from_entropy();
    let outcome = state.store.draw(
        &auth.user_id,
        count,
        &state.catalog,
        &state.economy().gacha,
        &mut rng,
        key.as_ref(),
    )?;

    let results = outcome
        .results
        .into_iter()
        .map(|DrawResult { item_id, rarity, is_new }| DrawResultResponse {
            item_id,
            name: state
                .catalog
                .get(&item_id)
                .map(|entry| entry.name.clone())
                .unwrap_or_default(),
            rarity,
            is_new,
        })
        .collect();

    Ok(Json(DrawResponse {
        results,
        balance: outcome.balance.into(),
        pity: pity_response(&state, &outcome.pity),
    }))
}

/// Get the pity counter.
pub async fn get_pity(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<PityResponse>, ApiError> {
    let pity = state.store.get_pity(&auth.user_id)?;
    Ok(Json(pity_response(&state, &pity)))
}
