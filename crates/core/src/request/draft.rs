//! Request form normalization.
//!
//! A `RequestForm` is what the admin UI submits for both create and update.
//! `normalize` turns it into a `RequestDraft` with typed status/priority and
//! the same required-field checks the form performs. Team ids and product
//! lines are kept exactly as submitted, duplicates included.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::request::error::DraftError;
use crate::request::types::{RequestPriority, RequestStatus};
use crate::text::non_blank;

/// Smallest quantity a product line can request.
pub const MIN_REQUESTED_QUANTITY: i32 = 1;

/// One selected product on the request form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductLine {
    /// Inventory item being requested.
    #[serde(alias = "inventoryItemId", alias = "id")]
    pub inventory_item_id: i32,
    /// Requested quantity.
    #[serde(alias = "requestedQuantity", alias = "quantity")]
    pub requested_quantity: i32,
}

impl ProductLine {
    /// Creates a product line.
    #[must_use]
    pub const fn new(inventory_item_id: i32, requested_quantity: i32) -> Self {
        Self {
            inventory_item_id,
            requested_quantity,
        }
    }
}

/// Raw request form as submitted by clients.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestForm {
    /// Client the request is for.
    #[serde(alias = "clientId")]
    pub client_id: Option<i32>,
    /// Teams to link.
    #[serde(default, alias = "teamIds")]
    pub team_ids: Vec<i32>,
    /// Volunteer to link, if any.
    #[serde(alias = "volunteerId")]
    pub volunteer_id: Option<i32>,
    /// Status string.
    pub status: Option<String>,
    /// Priority string.
    pub priority: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// Delivery location.
    pub location: Option<String>,
    /// Planned delivery time.
    #[serde(alias = "scheduledAt")]
    pub scheduled_at: Option<DateTime<FixedOffset>>,
    /// Selected products.
    #[serde(default)]
    pub products: Vec<ProductLine>,
}

/// Validated request ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDraft {
    /// Client the request is for.
    pub client_id: i32,
    /// Teams to link, duplicates preserved.
    pub team_ids: Vec<i32>,
    /// Volunteer to link.
    pub volunteer_id: Option<i32>,
    /// Status.
    pub status: RequestStatus,
    /// Priority.
    pub priority: RequestPriority,
    /// Description, `None` when blank.
    pub description: Option<String>,
    /// Location, `None` when blank.
    pub location: Option<String>,
    /// Planned delivery time.
    pub scheduled_at: Option<DateTime<FixedOffset>>,
    /// Product lines with quantities clamped to `MIN_REQUESTED_QUANTITY`.
    pub products: Vec<ProductLine>,
}

impl RequestForm {
    /// Validates the form and produces a draft.
    ///
    /// # Errors
    ///
    /// Returns an error if the client is missing, a status or priority is
    /// unknown, or an id is not positive.
    pub fn normalize(self) -> Result<RequestDraft, DraftError> {
        let client_id = self
            .client_id
            .filter(|id| *id > 0)
            .ok_or(DraftError::ClientRequired)?;

        if let Some(bad) = self.team_ids.iter().find(|id| **id <= 0) {
            return Err(DraftError::InvalidTeam(*bad));
        }

        let status = match non_blank(self.status) {
            Some(s) => RequestStatus::parse(&s).ok_or(DraftError::InvalidStatus(s))?,
            None => RequestStatus::default(),
        };

        let priority = match non_blank(self.priority) {
            Some(p) => RequestPriority::parse(&p).ok_or(DraftError::InvalidPriority(p))?,
            None => RequestPriority::default(),
        };

        let products = self
            .products
            .into_iter()
            .map(normalize_line)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RequestDraft {
            client_id,
            team_ids: self.team_ids,
            // The form sends 0 for "no volunteer".
            volunteer_id: self.volunteer_id.filter(|id| *id > 0),
            status,
            priority,
            description: non_blank(self.description),
            location: non_blank(self.location),
            scheduled_at: self.scheduled_at,
            products,
        })
    }
}

impl RequestDraft {
    /// Creates a minimal draft for a client with default status and priority.
    #[must_use]
    pub fn for_client(client_id: i32) -> Self {
        Self {
            client_id,
            team_ids: Vec::new(),
            volunteer_id: None,
            status: RequestStatus::default(),
            priority: RequestPriority::default(),
            description: None,
            location: None,
            scheduled_at: None,
            products: Vec::new(),
        }
    }

    /// Value for the single-team column kept for older readers: the first
    /// linked team.
    #[must_use]
    pub fn legacy_team_id(&self) -> Option<i32> {
        self.team_ids.first().copied()
    }
}

/// Validates one product line and clamps its quantity.
///
/// # Errors
///
/// Returns an error if the inventory item id is not positive.
pub fn normalize_line(line: ProductLine) -> Result<ProductLine, DraftError> {
    if line.inventory_item_id <= 0 {
        return Err(DraftError::InvalidInventoryItem(line.inventory_item_id));
    }
    Ok(ProductLine {
        inventory_item_id: line.inventory_item_id,
        requested_quantity: clamp_quantity(line.requested_quantity),
    })
}

/// Clamps a requested quantity to the form's minimum.
#[must_use]
pub fn clamp_quantity(quantity: i32) -> i32 {
    quantity.max(MIN_REQUESTED_QUANTITY)
}
