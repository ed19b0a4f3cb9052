//! Inventory handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use homehome_core::{ItemId, OwnedItem, Rarity};
use homehome_store::Store;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// One owned item.
#[derive(Debug, Serialize)]
pub struct OwnedItemResponse {
    /// Catalog item.
    pub item_id: ItemId,
    /// Item name, empty if the catalog no longer lists it.
    pub name: String,
    /// Rarity, if the catalog still lists the item.
    pub rarity: Option<Rarity>,
    /// Category, if the catalog still lists the item.
    pub category: Option<String>,
    /// When the item was obtained.
    pub obtained_at: String,
    /// Whether the item is equipped.
    pub is_equipped: bool,
}

impl OwnedItemResponse {
    fn new(state: &AppState, item: OwnedItem) -> Self {
        let entry = state.catalog.get(&item.item_id);
        Self {
            item_id: item.item_id,
            name: entry.map(|e| e.name.clone()).unwrap_or_default(),
            rarity: entry.map(|e| e.rarity),
            category: entry.map(|e| e.category.clone()),
            obtained_at: item.obtained_at.to_rfc3339(),
            is_equipped: item.is_equipped,
        }
    }
}

/// Inventory response.
#[derive(Debug, Serialize)]
pub struct ListItemsResponse {
    /// Owned items.
    pub items: Vec<OwnedItemResponse>,
}

/// List owned items.
pub async fn list_items(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<ListItemsResponse>, ApiError> {
    let items = state
        .store
        .list_owned_items(&auth.user_id)?
        .into_iter()
        .map(|item| OwnedItemResponse::new(&state, item))
        .collect();
    Ok(Json(ListItemsResponse { items }))
}

/// Equip request.
#[derive(Debug, Deserialize)]
pub struct EquipRequest {
    /// Catalog item to equip.
    pub item_id: String,
}

/// Equip an owned item; others in its category are unequipped.
pub async fn equip(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<EquipRequest>,
) -> Result<Json<OwnedItemResponse>, ApiError> {
    let item_id: ItemId = body.item_id.parse()?;
    let item = state
        .store
        .equip_item(&auth.user_id, &item_id, &state.catalog)?;
    Ok(Json(OwnedItemResponse::new(&state, item)))
}
