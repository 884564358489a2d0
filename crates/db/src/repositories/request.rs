//! Request repository: the create, update and delete workflows.
//!
//! Each workflow runs in one database transaction. A create or update
//! writes, in order:
//!
//! 1. the `requests` row,
//! 2. the team links (delete all, insert one row per submitted id),
//! 3. one `request_items` row per product line with status `requested`,
//! 4. the volunteer link, only if no link for the pair exists yet.
//!
//! Updates replace teams and items on every save. There is no version
//! check, so concurrent updates of the same request all succeed and the
//! last commit wins.

use hwf_core::request::{
    DraftError, RequestDraft, RequestPriority, RequestStatus, StockShortfall,
};
use hwf_shared::AppError;
use hwf_shared::types::{PageRequest, PageResponse};
use sea_orm::sea_query::Query;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::entities::{
    clients, delivery_assignments, request_items, request_teams, request_volunteers, requests,
    volunteers,
};
use crate::repositories::assignment::link_volunteer;
use crate::repositories::request_item::{
    RequestItemDetail, ensure_request, insert_items, items_for, replace_items,
};
use crate::repositories::request_team::{replace_teams, team_ids_for};
use crate::repositories::{domain_error, fetch_page};

/// Error types for request operations.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// Request not found.
    #[error("Request not found: {0}")]
    NotFound(i32),

    /// Referenced client does not exist.
    #[error("Client {0} does not exist")]
    ClientNotFound(i32),

    /// Referenced team does not exist.
    #[error("Team {0} does not exist")]
    TeamNotFound(i32),

    /// Referenced inventory item does not exist.
    #[error("Inventory item {0} does not exist")]
    InventoryItemNotFound(i32),

    /// Referenced volunteer does not exist.
    #[error("Volunteer {0} does not exist")]
    VolunteerNotFound(i32),

    /// The submitted form is invalid.
    #[error(transparent)]
    Draft(#[from] DraftError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<RequestError> for AppError {
    fn from(err: RequestError) -> Self {
        match err {
            RequestError::NotFound(_) => Self::NotFound(err.to_string()),
            RequestError::ClientNotFound(_)
            | RequestError::TeamNotFound(_)
            | RequestError::InventoryItemNotFound(_)
            | RequestError::VolunteerNotFound(_) => Self::Validation(err.to_string()),
            RequestError::Draft(e) => domain_error(e.status_code(), e.to_string()),
            RequestError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// A request with everything linked to it.
#[derive(Debug, Clone, Serialize)]
pub struct RequestDetails {
    /// The request row.
    #[serde(flatten)]
    pub request: requests::Model,
    /// The client, if the row still exists.
    pub client: Option<clients::Model>,
    /// Linked team ids in insertion order, duplicates included.
    pub team_ids: Vec<i32>,
    /// Requested product lines.
    pub items: Vec<RequestItemDetail>,
    /// Linked volunteer ids.
    pub volunteer_ids: Vec<i32>,
    /// Delivery assignments.
    pub assignments: Vec<delivery_assignments::Model>,
}

/// Result of a create or update workflow.
#[derive(Debug, Clone, Serialize)]
pub struct SavedRequest {
    /// The request as stored.
    pub request: RequestDetails,
    /// Lines asking for more than is on hand. Advisory only.
    pub stock_warnings: Vec<StockShortfall>,
}

/// Filter options for listing requests.
#[derive(Debug, Clone, Default)]
pub struct RequestFilter {
    /// Filter by status.
    pub status: Option<RequestStatus>,
    /// Filter by priority.
    pub priority: Option<RequestPriority>,
    /// Filter by client.
    pub client_id: Option<i32>,
    /// Requests linked to this team, through `request_teams` or the
    /// legacy column.
    pub team_id: Option<i32>,
}

/// Request repository.
#[derive(Debug, Clone)]
pub struct RequestRepository {
    db: DatabaseConnection,
}

impl RequestRepository {
    /// Creates a new request repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a request with its teams, items and volunteer link.
    ///
    /// Quantities above stock on hand are accepted and reported in
    /// `stock_warnings`.
    ///
    /// # Errors
    ///
    /// Returns an error if a referenced client, team, inventory item or
    /// volunteer does not exist. Nothing is written in that case.
    pub async fn create_request(&self, draft: RequestDraft) -> Result<SavedRequest, RequestError> {
        let txn = self.db.begin().await?;

        ensure_references(&txn, &draft).await?;

        let now = chrono::Utc::now().into();
        let request = requests::ActiveModel {
            client_id: Set(draft.client_id),
            team_id: Set(draft.legacy_team_id()),
            status: Set(draft.status.as_str().to_string()),
            priority: Set(draft.priority.as_str().to_string()),
            description: Set(draft.description.clone()),
            location: Set(draft.location.clone()),
            scheduled_at: Set(draft.scheduled_at),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        debug!(request_id = request.id, "Request row inserted");

        if !draft.team_ids.is_empty() {
            replace_teams(&txn, request.id, &draft.team_ids).await?;
        }
        let stock_warnings = insert_items(&txn, request.id, &draft.products).await?;
        if let Some(volunteer_id) = draft.volunteer_id {
            link_volunteer(&txn, request.id, volunteer_id).await?;
        }

        txn.commit().await?;
        info!(
            request_id = request.id,
            client_id = draft.client_id,
            teams = draft.team_ids.len(),
            items = draft.products.len(),
            "Request created"
        );

        let details = self
            .get_request(request.id)
            .await?
            .ok_or(RequestError::NotFound(request.id))?;
        Ok(SavedRequest {
            request: details,
            stock_warnings,
        })
    }

    /// Replaces a request's fields, teams and items.
    ///
    /// An empty team or product list clears the existing links. The
    /// volunteer link is only ever added, never removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or a referenced row does not exist.
    pub async fn update_request(
        &self,
        id: i32,
        draft: RequestDraft,
    ) -> Result<SavedRequest, RequestError> {
        let txn = self.db.begin().await?;

        let existing = ensure_request(&txn, id).await?;
        ensure_references(&txn, &draft).await?;

        let mut active: requests::ActiveModel = existing.into();
        active.client_id = Set(draft.client_id);
        active.team_id = Set(draft.legacy_team_id());
        active.status = Set(draft.status.as_str().to_string());
        active.priority = Set(draft.priority.as_str().to_string());
        active.description = Set(draft.description.clone());
        active.location = Set(draft.location.clone());
        active.scheduled_at = Set(draft.scheduled_at);
        active.updated_at = Set(chrono::Utc::now().into());
        active.update(&txn).await?;

        replace_teams(&txn, id, &draft.team_ids).await?;
        let stock_warnings = replace_items(&txn, id, &draft.products).await?;
        if let Some(volunteer_id) = draft.volunteer_id {
            link_volunteer(&txn, id, volunteer_id).await?;
        }

        txn.commit().await?;
        info!(
            request_id = id,
            status = %draft.status,
            teams = draft.team_ids.len(),
            items = draft.products.len(),
            "Request updated"
        );

        let details = self
            .get_request(id)
            .await?
            .ok_or(RequestError::NotFound(id))?;
        Ok(SavedRequest {
            request: details,
            stock_warnings,
        })
    }

    /// Deletes a request with its delivery assignments, items and team
    /// links.
    ///
    /// Volunteer links are left in place and keep pointing at the deleted
    /// id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request does not exist.
    pub async fn delete_request(&self, id: i32) -> Result<(), RequestError> {
        let txn = self.db.begin().await?;

        ensure_request(&txn, id).await?;

        let assignments = delivery_assignments::Entity::delete_many()
            .filter(delivery_assignments::Column::RequestId.eq(id))
            .exec(&txn)
            .await?
            .rows_affected;
        let items = request_items::Entity::delete_many()
            .filter(request_items::Column::RequestId.eq(id))
            .exec(&txn)
            .await?
            .rows_affected;
        request_teams::Entity::delete_many()
            .filter(request_teams::Column::RequestId.eq(id))
            .exec(&txn)
            .await?;
        requests::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        info!(request_id = id, assignments, items, "Request deleted");
        Ok(())
    }

    /// Loads a request with client, teams, items, volunteers and delivery
    /// assignments.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_request(&self, id: i32) -> Result<Option<RequestDetails>, RequestError> {
        let Some((request, client)) = requests::Entity::find_by_id(id)
            .find_also_related(clients::Entity)
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let team_ids = team_ids_for(&self.db, id).await?;
        let items = items_for(&self.db, id).await?;
        let volunteer_ids = volunteer_ids_for(&self.db, id).await?;
        let assignments = delivery_assignments::Entity::find()
            .filter(delivery_assignments::Column::RequestId.eq(id))
            .order_by_asc(delivery_assignments::Column::Id)
            .all(&self.db)
            .await?;

        Ok(Some(RequestDetails {
            request,
            client,
            team_ids,
            items,
            volunteer_ids,
            assignments,
        }))
    }

    /// Lists requests, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_requests(
        &self,
        filter: RequestFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<requests::Model>, RequestError> {
        let mut query = requests::Entity::find()
            .order_by_desc(requests::Column::CreatedAt)
            .order_by_desc(requests::Column::Id);

        if let Some(status) = filter.status {
            query = query.filter(requests::Column::Status.eq(status.as_str()));
        }
        if let Some(priority) = filter.priority {
            query = query.filter(requests::Column::Priority.eq(priority.as_str()));
        }
        if let Some(client_id) = filter.client_id {
            query = query.filter(requests::Column::ClientId.eq(client_id));
        }
        if let Some(team_id) = filter.team_id {
            query = query.filter(
                Condition::any()
                    .add(requests::Column::TeamId.eq(team_id))
                    .add(
                        requests::Column::Id.in_subquery(
                            Query::select()
                                .column(request_teams::Column::RequestId)
                                .from(request_teams::Entity)
                                .and_where(request_teams::Column::TeamId.eq(team_id))
                                .to_owned(),
                        ),
                    ),
            );
        }

        Ok(fetch_page(query, &self.db, page).await?)
    }
}

/// Checks the client and volunteer a draft points at.
///
/// Teams and inventory items are checked by the link writers.
async fn ensure_references<C: ConnectionTrait>(
    conn: &C,
    draft: &RequestDraft,
) -> Result<(), RequestError> {
    if clients::Entity::find_by_id(draft.client_id)
        .one(conn)
        .await?
        .is_none()
    {
        return Err(RequestError::ClientNotFound(draft.client_id));
    }
    if let Some(volunteer_id) = draft.volunteer_id
        && volunteers::Entity::find_by_id(volunteer_id)
            .one(conn)
            .await?
            .is_none()
    {
        return Err(RequestError::VolunteerNotFound(volunteer_id));
    }
    Ok(())
}

async fn volunteer_ids_for<C: ConnectionTrait>(
    conn: &C,
    request_id: i32,
) -> Result<Vec<i32>, DbErr> {
    request_volunteers::Entity::find()
        .select_only()
        .column(request_volunteers::Column::VolunteerId)
        .filter(request_volunteers::Column::RequestId.eq(request_id))
        .order_by_asc(request_volunteers::Column::Id)
        .into_tuple()
        .all(conn)
        .await
}
