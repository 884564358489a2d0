//! Requested product lines.
//!
//! Quantities are written as requested; stock on hand is only compared to
//! produce warnings.

use std::collections::HashMap;

use hwf_core::request::{ProductLine, RequestItemStatus, StockShortfall, check_stock, normalize_line};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::entities::{inventory_items, request_items, requests};
use crate::repositories::request::RequestError;

/// A request item with the inventory fields shown alongside it.
#[derive(Debug, Clone, Serialize)]
pub struct RequestItemDetail {
    /// The request item row.
    #[serde(flatten)]
    pub item: request_items::Model,
    /// Inventory item name.
    pub item_name: Option<String>,
    /// Unit of measure.
    pub unit: Option<String>,
    /// Quantity on hand now.
    pub available_quantity: Option<i32>,
}

/// Items written for a request plus any stock warnings.
#[derive(Debug, Clone, Serialize)]
pub struct SavedItems {
    /// All items on the request after the write.
    pub items: Vec<RequestItemDetail>,
    /// Lines asking for more than is on hand.
    pub stock_warnings: Vec<StockShortfall>,
}

/// Repository for the `request_items` table.
#[derive(Debug, Clone)]
pub struct RequestItemRepository {
    db: DatabaseConnection,
}

impl RequestItemRepository {
    /// Creates a new request-item repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Adds one product line to a request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or inventory item does not exist.
    pub async fn add_request_item(
        &self,
        request_id: i32,
        line: ProductLine,
    ) -> Result<SavedItems, RequestError> {
        let line = normalize_line(line)?;
        let txn = self.db.begin().await?;

        ensure_request(&txn, request_id).await?;
        let stock_warnings = insert_items(&txn, request_id, &[line]).await?;
        let items = items_for(&txn, request_id).await?;

        txn.commit().await?;
        info!(
            request_id,
            inventory_item_id = line.inventory_item_id,
            quantity = line.requested_quantity,
            "Request item added"
        );
        Ok(SavedItems {
            items,
            stock_warnings,
        })
    }

    /// Replaces every product line on a request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or any inventory item does not exist.
    pub async fn replace_request_items(
        &self,
        request_id: i32,
        lines: Vec<ProductLine>,
    ) -> Result<SavedItems, RequestError> {
        let lines = lines
            .into_iter()
            .map(normalize_line)
            .collect::<Result<Vec<_>, _>>()?;
        let txn = self.db.begin().await?;

        ensure_request(&txn, request_id).await?;
        let stock_warnings = replace_items(&txn, request_id, &lines).await?;
        let items = items_for(&txn, request_id).await?;

        txn.commit().await?;
        info!(request_id, count = lines.len(), "Request items replaced");
        Ok(SavedItems {
            items,
            stock_warnings,
        })
    }

    /// Lists the items on a request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request does not exist.
    pub async fn list_request_items(
        &self,
        request_id: i32,
    ) -> Result<Vec<RequestItemDetail>, RequestError> {
        ensure_request(&self.db, request_id).await?;
        Ok(items_for(&self.db, request_id).await?)
    }
}

/// Deletes all items of a request and inserts the given lines.
pub(crate) async fn replace_items<C: ConnectionTrait>(
    conn: &C,
    request_id: i32,
    lines: &[ProductLine],
) -> Result<Vec<StockShortfall>, RequestError> {
    let removed = request_items::Entity::delete_many()
        .filter(request_items::Column::RequestId.eq(request_id))
        .exec(conn)
        .await?
        .rows_affected;
    debug!(request_id, removed, "Request items cleared");
    insert_items(conn, request_id, lines).await
}

/// Inserts one `requested` row per line and reports stock shortfalls.
pub(crate) async fn insert_items<C: ConnectionTrait>(
    conn: &C,
    request_id: i32,
    lines: &[ProductLine],
) -> Result<Vec<StockShortfall>, RequestError> {
    if lines.is_empty() {
        return Ok(Vec::new());
    }

    let on_hand = on_hand_for(conn, lines).await?;
    if let Some(missing) = lines
        .iter()
        .find(|line| !on_hand.contains_key(&line.inventory_item_id))
    {
        return Err(RequestError::InventoryItemNotFound(
            missing.inventory_item_id,
        ));
    }

    let now: sea_orm::prelude::DateTimeWithTimeZone = chrono::Utc::now().into();
    let rows = lines.iter().map(|line| request_items::ActiveModel {
        request_id: Set(request_id),
        inventory_item_id: Set(line.inventory_item_id),
        quantity: Set(line.requested_quantity),
        status: Set(RequestItemStatus::Requested.as_str().to_string()),
        created_at: Set(now),
        ..Default::default()
    });
    request_items::Entity::insert_many(rows)
        .exec_without_returning(conn)
        .await?;

    let shortfalls = check_stock(lines, &on_hand);
    for shortfall in &shortfalls {
        warn!(
            request_id,
            inventory_item_id = shortfall.inventory_item_id,
            requested = shortfall.requested,
            available = shortfall.available,
            "Request item exceeds stock on hand"
        );
    }
    debug!(request_id, inserted = lines.len(), "Request items inserted");
    Ok(shortfalls)
}

pub(crate) async fn items_for<C: ConnectionTrait>(
    conn: &C,
    request_id: i32,
) -> Result<Vec<RequestItemDetail>, DbErr> {
    let rows = request_items::Entity::find()
        .filter(request_items::Column::RequestId.eq(request_id))
        .order_by_asc(request_items::Column::Id)
        .find_also_related(inventory_items::Entity)
        .all(conn)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(item, inventory)| RequestItemDetail {
            item,
            item_name: inventory.as_ref().map(|i| i.name.clone()),
            unit: inventory.as_ref().and_then(|i| i.unit.clone()),
            available_quantity: inventory.map(|i| i.quantity),
        })
        .collect())
}

async fn on_hand_for<C: ConnectionTrait>(
    conn: &C,
    lines: &[ProductLine],
) -> Result<HashMap<i32, i32>, DbErr> {
    let mut ids: Vec<i32> = lines.iter().map(|l| l.inventory_item_id).collect();
    ids.sort_unstable();
    ids.dedup();

    let items = inventory_items::Entity::find()
        .filter(inventory_items::Column::Id.is_in(ids))
        .all(conn)
        .await?;
    Ok(items.into_iter().map(|i| (i.id, i.quantity)).collect())
}

pub(crate) async fn ensure_request<C: ConnectionTrait>(
    conn: &C,
    request_id: i32,
) -> Result<requests::Model, RequestError> {
    requests::Entity::find_by_id(request_id)
        .one(conn)
        .await?
        .ok_or(RequestError::NotFound(request_id))
}
