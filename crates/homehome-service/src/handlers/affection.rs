//! Character affection handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use homehome_core::{AffectionGain, CharacterId};
use homehome_store::Store;

use super::idempotency_key;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Affection increase request.
#[derive(Debug, Deserialize)]
pub struct IncreaseAffectionRequest {
    /// Character identifier.
    pub character_id: String,
    /// Points to add.
    pub amount: u64,
    /// Optional key, e.g. `chat:2024-01-02` to cap chat affection per day.
    #[serde(default)]
    pub idempotency_key: Option<String>,
}

/// Affection increase response.
#[derive(Debug, Serialize)]
pub struct IncreaseAffectionResponse {
    /// Points after the increase.
    pub new_points: u64,
    /// Every threshold crossed, ascending.
    pub thresholds_crossed: Vec<u64>,
    /// Coins credited for the crossed thresholds.
    pub coins_awarded: u64,
    /// Highest threshold crossed, or 0.
    pub threshold_reached: u64,
}

impl From<AffectionGain> for IncreaseAffectionResponse {
    fn from(gain: AffectionGain) -> Self {
        Self {
            threshold_reached: gain.threshold_reached(),
            new_points: gain.new_points,
            thresholds_crossed: gain.thresholds_crossed,
            coins_awarded: gain.coins_awarded,
        }
    }
}

/// Add affection points to a character.
pub async fn increase(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<IncreaseAffectionRequest>,
) -> Result<Json<IncreaseAffectionResponse>, ApiError> {
    let character_id: CharacterId = body.character_id.parse()?;
    let key = idempotency_key(body.idempotency_key.as_deref())?;
    let gain = state.store.increase_affection(
        &auth.user_id,
        &character_id,
        body.amount,
        &state.economy().affection,
        key.as_ref(),
    )?;
    Ok(Json(gain.into()))
}

/// Affection for one character.
#[derive(Debug, Serialize)]
pub struct CharacterAffection {
    /// Character identifier.
    pub character_id: CharacterId,
    /// Current points.
    pub points: u64,
}

/// Affection list response.
#[derive(Debug, Serialize)]
pub struct ListAffectionResponse {
    /// One row per character the user has interacted with.
    pub characters: Vec<CharacterAffection>,
}

/// List affection for every character.
pub async fn list(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<ListAffectionResponse>, ApiError> {
    let characters = state
        .store
        .list_affection(&auth.user_id)?
        .into_iter()
        .map(|a| CharacterAffection {
            character_id: a.character_id,
            points: a.points,
        })
        .collect();
    Ok(Json(ListAffectionResponse { characters }))
}
