//! Inventory routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use hwf_core::inventory::StockStatus;
use hwf_db::entities::inventory_items;
use hwf_db::repositories::{InventoryFilter, InventoryInput, InventoryRepository};
use hwf_shared::types::PageRequest;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{AppState, error::ApiError};

/// Creates the inventory routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/inventory", get(list_items).post(create_item))
        .route(
            "/inventory/{item_id}",
            get(get_item).put(update_item).delete(delete_item),
        )
        .route("/inventory/{item_id}/adjust", post(adjust_item))
}

/// Query parameters for listing inventory.
#[derive(Debug, Deserialize)]
pub struct ListInventoryQuery {
    /// Filter by category.
    pub category: Option<String>,
    /// Filter by availability flag.
    pub available: Option<bool>,
}

/// Request body for creating or replacing an inventory item.
#[derive(Debug, Deserialize)]
pub struct InventoryRequest {
    /// Item name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Category.
    pub category: Option<String>,
    /// Quantity on hand (default: 0).
    pub quantity: Option<i32>,
    /// Unit of measure.
    pub unit: Option<String>,
    /// Storage location.
    pub location: Option<String>,
    /// Offered on the request form (default: true).
    pub is_available: Option<bool>,
}

impl From<InventoryRequest> for InventoryInput {
    fn from(req: InventoryRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            category: req.category,
            quantity: req.quantity.unwrap_or(0),
            unit: req.unit,
            location: req.location,
            is_available: req.is_available.unwrap_or(true),
        }
    }
}

/// Request body for a stock adjustment.
#[derive(Debug, Deserialize)]
pub struct AdjustRequest {
    /// Signed change to the quantity on hand.
    pub delta: i32,
}

/// An inventory item with its stock level.
#[derive(Debug, Serialize)]
pub struct InventoryResponse {
    /// The item.
    #[serde(flatten)]
    pub item: inventory_items::Model,
    /// Stock level derived from the quantity.
    pub stock_status: StockStatus,
}

impl From<inventory_items::Model> for InventoryResponse {
    fn from(item: inventory_items::Model) -> Self {
        Self {
            stock_status: StockStatus::from_quantity(item.quantity),
            item,
        }
    }
}

/// GET `/inventory` - List inventory items.
async fn list_items(
    State(state): State<AppState>,
    Query(query): Query<ListInventoryQuery>,
    Query(page): Query<PageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = InventoryRepository::new((*state.db).clone());
    let filter = InventoryFilter {
        category: query.category,
        is_available: query.available,
    };
    let items = repo.list(filter, &page).await?;
    Ok(Json(items.map(InventoryResponse::from)))
}

/// POST `/inventory` - Create an inventory item.
async fn create_item(
    State(state): State<AppState>,
    Json(payload): Json<InventoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = InventoryRepository::new((*state.db).clone());
    let item = repo.create(payload.into()).await?;

    info!(item_id = item.id, quantity = item.quantity, "Inventory item created");
    Ok((StatusCode::CREATED, Json(InventoryResponse::from(item))))
}

/// GET `/inventory/{item_id}` - Get an inventory item.
async fn get_item(
    State(state): State<AppState>,
    Path(item_id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = InventoryRepository::new((*state.db).clone());
    let item = repo
        .find_by_id(item_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Inventory item not found: {item_id}")))?;
    Ok(Json(InventoryResponse::from(item)))
}

/// PUT `/inventory/{item_id}` - Replace an inventory item.
async fn update_item(
    State(state): State<AppState>,
    Path(item_id): Path<i32>,
    Json(payload): Json<InventoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = InventoryRepository::new((*state.db).clone());
    let item = repo.update(item_id, payload.into()).await?;

    info!(item_id, "Inventory item updated");
    Ok(Json(InventoryResponse::from(item)))
}

/// DELETE `/inventory/{item_id}` - Delete an unreferenced inventory item.
async fn delete_item(
    State(state): State<AppState>,
    Path(item_id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = InventoryRepository::new((*state.db).clone());
    repo.delete(item_id).await?;

    info!(item_id, "Inventory item deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST `/inventory/{item_id}/adjust` - Add or remove stock.
async fn adjust_item(
    State(state): State<AppState>,
    Path(item_id): Path<i32>,
    Json(payload): Json<AdjustRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = InventoryRepository::new((*state.db).clone());
    let item = repo.adjust_quantity(item_id, payload.delta).await?;

    info!(
        item_id,
        delta = payload.delta,
        quantity = item.quantity,
        "Inventory adjusted"
    );
    Ok(Json(InventoryResponse::from(item)))
}
