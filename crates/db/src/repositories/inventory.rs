//! Inventory repository for database operations.

use hwf_core::inventory::{StockAdjustmentError, apply_adjustment};
use hwf_core::text::non_blank;
use hwf_shared::AppError;
use hwf_shared::types::{PageRequest, PageResponse};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::debug;

use crate::entities::{inventory_items, request_items};
use crate::repositories::{domain_error, fetch_page};

/// Error types for inventory operations.
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    /// Inventory item not found.
    #[error("Inventory item not found: {0}")]
    NotFound(i32),

    /// Name is blank.
    #[error("Item name is required")]
    NameRequired,

    /// Quantity on hand cannot be negative.
    #[error("Quantity cannot be negative: {0}")]
    NegativeQuantity(i32),

    /// Cannot delete an item referenced by request items.
    #[error("Cannot delete inventory item: referenced by {0} request items")]
    InUse(u64),

    /// Adjustment rejected.
    #[error(transparent)]
    Adjustment(#[from] StockAdjustmentError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<InventoryError> for AppError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::NotFound(_) => Self::NotFound(err.to_string()),
            InventoryError::NameRequired | InventoryError::NegativeQuantity(_) => {
                Self::Validation(err.to_string())
            }
            InventoryError::InUse(_) => Self::Conflict(err.to_string()),
            InventoryError::Adjustment(e) => domain_error(e.status_code(), e.to_string()),
            InventoryError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating or replacing an inventory item.
#[derive(Debug, Clone)]
pub struct InventoryInput {
    /// Item name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Category ("food", "furniture", ...).
    pub category: Option<String>,
    /// Quantity on hand.
    pub quantity: i32,
    /// Unit of measure.
    pub unit: Option<String>,
    /// Storage location.
    pub location: Option<String>,
    /// Offered on the request form.
    pub is_available: bool,
}

impl Default for InventoryInput {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: None,
            category: None,
            quantity: 0,
            unit: None,
            location: None,
            is_available: true,
        }
    }
}

impl InventoryInput {
    fn validate(&self) -> Result<(), InventoryError> {
        if self.name.trim().is_empty() {
            return Err(InventoryError::NameRequired);
        }
        if self.quantity < 0 {
            return Err(InventoryError::NegativeQuantity(self.quantity));
        }
        Ok(())
    }
}

/// Filter options for listing inventory.
#[derive(Debug, Clone, Default)]
pub struct InventoryFilter {
    /// Exact category match.
    pub category: Option<String>,
    /// Filter by availability flag.
    pub is_available: Option<bool>,
}

/// Inventory repository for CRUD operations and stock adjustments.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    db: DatabaseConnection,
}

impl InventoryRepository {
    /// Creates a new inventory repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an inventory item.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or the quantity is negative.
    pub async fn create(
        &self,
        input: InventoryInput,
    ) -> Result<inventory_items::Model, InventoryError> {
        input.validate()?;

        let now = chrono::Utc::now().into();
        let item = inventory_items::ActiveModel {
            name: Set(input.name.trim().to_string()),
            description: Set(non_blank(input.description)),
            category: Set(non_blank(input.category)),
            quantity: Set(input.quantity),
            unit: Set(non_blank(input.unit)),
            location: Set(non_blank(input.location)),
            is_available: Set(input.is_available),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        Ok(item.insert(&self.db).await?)
    }

    /// Finds an inventory item by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(
        &self,
        id: i32,
    ) -> Result<Option<inventory_items::Model>, InventoryError> {
        Ok(inventory_items::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// Lists inventory items by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: InventoryFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<inventory_items::Model>, InventoryError> {
        let mut query = inventory_items::Entity::find()
            .order_by_asc(inventory_items::Column::Name)
            .order_by_asc(inventory_items::Column::Id);

        if let Some(category) = non_blank(filter.category) {
            query = query.filter(inventory_items::Column::Category.eq(category));
        }
        if let Some(is_available) = filter.is_available {
            query = query.filter(inventory_items::Column::IsAvailable.eq(is_available));
        }

        Ok(fetch_page(query, &self.db, page).await?)
    }

    /// Replaces an inventory item's fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the item does not exist or the input is invalid.
    pub async fn update(
        &self,
        id: i32,
        input: InventoryInput,
    ) -> Result<inventory_items::Model, InventoryError> {
        input.validate()?;

        let item = inventory_items::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(InventoryError::NotFound(id))?;

        let mut active: inventory_items::ActiveModel = item.into();
        active.name = Set(input.name.trim().to_string());
        active.description = Set(non_blank(input.description));
        active.category = Set(non_blank(input.category));
        active.quantity = Set(input.quantity);
        active.unit = Set(non_blank(input.unit));
        active.location = Set(non_blank(input.location));
        active.is_available = Set(input.is_available);
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes an item no request refers to.
    ///
    /// # Errors
    ///
    /// Returns an error if the item does not exist or is referenced.
    pub async fn delete(&self, id: i32) -> Result<(), InventoryError> {
        let item = inventory_items::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(InventoryError::NotFound(id))?;

        let references = request_items::Entity::find()
            .filter(request_items::Column::InventoryItemId.eq(id))
            .count(&self.db)
            .await?;
        if references > 0 {
            return Err(InventoryError::InUse(references));
        }

        inventory_items::Entity::delete_by_id(item.id)
            .exec(&self.db)
            .await?;
        Ok(())
    }

    /// Adds `delta` (which may be negative) to the quantity on hand.
    ///
    /// # Errors
    ///
    /// Returns an error if the item does not exist or the result would be
    /// negative.
    pub async fn adjust_quantity(
        &self,
        id: i32,
        delta: i32,
    ) -> Result<inventory_items::Model, InventoryError> {
        let txn = self.db.begin().await?;

        let item = inventory_items::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(InventoryError::NotFound(id))?;
        let quantity = apply_adjustment(item.quantity, delta)?;

        let mut active: inventory_items::ActiveModel = item.into();
        active.quantity = Set(quantity);
        active.updated_at = Set(chrono::Utc::now().into());
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        debug!(inventory_item_id = id, delta, quantity, "Stock adjusted");
        Ok(updated)
    }
}
