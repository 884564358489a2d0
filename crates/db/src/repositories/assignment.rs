//! Volunteer links and delivery assignments for requests.

use chrono::NaiveDate;
use hwf_core::assignment::{
    AssignmentAction, AssignmentStatus, AssignmentTransitionError, AssignmentTransitions,
};
use hwf_core::text::non_blank;
use hwf_core::volunteer::Availability;
use hwf_shared::AppError;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::entities::{delivery_assignments, request_volunteers, volunteers};
use crate::repositories::request_item::ensure_request;
use crate::repositories::request::RequestError;
use crate::repositories::domain_error;

/// Error types for assignment operations.
#[derive(Debug, thiserror::Error)]
pub enum AssignmentError {
    /// Request not found.
    #[error("Request not found: {0}")]
    RequestNotFound(i32),

    /// Volunteer not found.
    #[error("Volunteer {0} does not exist")]
    VolunteerNotFound(i32),

    /// Delivery assignment not found.
    #[error("Delivery assignment not found: {0}")]
    AssignmentNotFound(i32),

    /// Volunteer is not linked to the request.
    #[error("Volunteer {volunteer_id} is not assigned to request {request_id}")]
    NotAssigned {
        /// Request id.
        request_id: i32,
        /// Volunteer id.
        volunteer_id: i32,
    },

    /// Status change not allowed.
    #[error(transparent)]
    Transition(#[from] AssignmentTransitionError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<AssignmentError> for AppError {
    fn from(err: AssignmentError) -> Self {
        match err {
            AssignmentError::RequestNotFound(_)
            | AssignmentError::AssignmentNotFound(_)
            | AssignmentError::NotAssigned { .. } => Self::NotFound(err.to_string()),
            AssignmentError::VolunteerNotFound(_) => Self::Validation(err.to_string()),
            AssignmentError::Transition(e) => domain_error(e.status_code(), e.to_string()),
            AssignmentError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

impl From<RequestError> for AssignmentError {
    fn from(err: RequestError) -> Self {
        match err {
            RequestError::NotFound(id) => Self::RequestNotFound(id),
            RequestError::Database(e) => Self::Database(e),
            other => Self::Database(DbErr::Custom(other.to_string())),
        }
    }
}

/// Input for linking a volunteer to a request.
#[derive(Debug, Clone, Default)]
pub struct AssignVolunteerInput {
    /// Volunteer to link.
    pub volunteer_id: i32,
    /// Delivery date; when set a delivery assignment is scheduled too.
    pub scheduled_date: Option<NaiveDate>,
    /// Notes for the delivery assignment.
    pub notes: Option<String>,
}

/// Result of linking a volunteer.
#[derive(Debug, Clone, Serialize)]
pub struct VolunteerAssignment {
    /// The link row, new or existing.
    pub link: request_volunteers::Model,
    /// False when the link already existed.
    pub created: bool,
    /// Delivery assignment scheduled by this call.
    pub delivery: Option<delivery_assignments::Model>,
}

/// Requested change to a delivery assignment.
#[derive(Debug, Clone, Default)]
pub struct AssignmentChange {
    /// Target status.
    pub status: Option<AssignmentStatus>,
    /// Completion date for `completed`, new date for `scheduled`, or a new
    /// date on its own.
    pub date: Option<NaiveDate>,
    /// Replacement notes; blank clears them.
    pub notes: Option<String>,
}

/// Repository for volunteer links and delivery assignments.
#[derive(Debug, Clone)]
pub struct AssignmentRepository {
    db: DatabaseConnection,
}

impl AssignmentRepository {
    /// Creates a new assignment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Links a volunteer to a request and optionally schedules a delivery.
    ///
    /// Linking is idempotent. A delivery assignment is created on every
    /// call that carries a date.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or volunteer does not exist.
    pub async fn assign_volunteer(
        &self,
        request_id: i32,
        input: AssignVolunteerInput,
    ) -> Result<VolunteerAssignment, AssignmentError> {
        let txn = self.db.begin().await?;

        ensure_request(&txn, request_id).await?;
        let volunteer = volunteers::Entity::find_by_id(input.volunteer_id)
            .one(&txn)
            .await?
            .ok_or(AssignmentError::VolunteerNotFound(input.volunteer_id))?;
        if let Some(date) = input.scheduled_date {
            let available = volunteer
                .availability
                .as_deref()
                .and_then(|text| Availability::parse(text).ok())
                .is_none_or(|a| a.days().is_empty() || a.covers(date));
            if !available {
                warn!(
                    request_id,
                    volunteer_id = volunteer.id,
                    %date,
                    "Delivery scheduled outside volunteer availability"
                );
            }
        }

        let (link, created) = link_volunteer(&txn, request_id, input.volunteer_id).await?;

        let delivery = match input.scheduled_date {
            Some(date) => {
                let now = chrono::Utc::now().into();
                let assignment = delivery_assignments::ActiveModel {
                    request_id: Set(request_id),
                    volunteer_id: Set(input.volunteer_id),
                    scheduled_date: Set(Some(date)),
                    completed_date: Set(None),
                    status: Set(AssignmentStatus::Scheduled.as_str().to_string()),
                    notes: Set(non_blank(input.notes)),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(&txn)
                .await?;
                Some(assignment)
            }
            None => None,
        };

        txn.commit().await?;
        info!(
            request_id,
            volunteer_id = input.volunteer_id,
            created,
            delivery_id = delivery.as_ref().map(|d| d.id),
            "Volunteer assigned to request"
        );
        Ok(VolunteerAssignment {
            link,
            created,
            delivery,
        })
    }

    /// Removes a volunteer from a request along with their open deliveries.
    ///
    /// Completed and cancelled deliveries are kept as history.
    ///
    /// # Errors
    ///
    /// Returns an error if the volunteer is not linked to the request.
    pub async fn unassign_volunteer(
        &self,
        request_id: i32,
        volunteer_id: i32,
    ) -> Result<(), AssignmentError> {
        let txn = self.db.begin().await?;

        let removed = request_volunteers::Entity::delete_many()
            .filter(request_volunteers::Column::RequestId.eq(request_id))
            .filter(request_volunteers::Column::VolunteerId.eq(volunteer_id))
            .exec(&txn)
            .await?
            .rows_affected;
        if removed == 0 {
            return Err(AssignmentError::NotAssigned {
                request_id,
                volunteer_id,
            });
        }

        let open = delivery_assignments::Entity::delete_many()
            .filter(delivery_assignments::Column::RequestId.eq(request_id))
            .filter(delivery_assignments::Column::VolunteerId.eq(volunteer_id))
            .filter(delivery_assignments::Column::Status.eq(AssignmentStatus::Scheduled.as_str()))
            .exec(&txn)
            .await?
            .rows_affected;

        txn.commit().await?;
        info!(request_id, volunteer_id, open_deliveries = open, "Volunteer unassigned");
        Ok(())
    }

    /// Lists the delivery assignments of a request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request does not exist.
    pub async fn list_for_request(
        &self,
        request_id: i32,
    ) -> Result<Vec<delivery_assignments::Model>, AssignmentError> {
        ensure_request(&self.db, request_id).await?;
        Ok(delivery_assignments::Entity::find()
            .filter(delivery_assignments::Column::RequestId.eq(request_id))
            .order_by_asc(delivery_assignments::Column::ScheduledDate)
            .order_by_asc(delivery_assignments::Column::Id)
            .all(&self.db)
            .await?)
    }

    /// Completes, cancels or reschedules a delivery assignment, and/or
    /// replaces its notes.
    ///
    /// # Errors
    ///
    /// Returns an error if the assignment does not exist or the status
    /// change is not allowed.
    pub async fn update_assignment(
        &self,
        id: i32,
        change: AssignmentChange,
        today: NaiveDate,
    ) -> Result<delivery_assignments::Model, AssignmentError> {
        let txn = self.db.begin().await?;

        let assignment = delivery_assignments::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(AssignmentError::AssignmentNotFound(id))?;
        let current = AssignmentStatus::parse(&assignment.status)
            .ok_or_else(|| AssignmentTransitionError::InvalidStatus(assignment.status.clone()))?;

        let action = match (change.status, change.date) {
            (Some(target), date) => {
                AssignmentTransitions::to_status(current, target, date, today)?
            }
            (None, Some(date)) => Some(AssignmentTransitions::reschedule(current, date)?),
            (None, None) => None,
        };

        let mut active: delivery_assignments::ActiveModel = assignment.into();
        match &action {
            Some(AssignmentAction::Complete {
                new_status,
                completed_date,
            }) => {
                active.status = Set(new_status.as_str().to_string());
                active.completed_date = Set(Some(*completed_date));
            }
            Some(AssignmentAction::Cancel { new_status }) => {
                active.status = Set(new_status.as_str().to_string());
            }
            Some(AssignmentAction::Reschedule {
                new_status,
                scheduled_date,
            }) => {
                active.status = Set(new_status.as_str().to_string());
                active.scheduled_date = Set(Some(*scheduled_date));
                active.completed_date = Set(None);
            }
            None => {}
        }
        if let Some(notes) = change.notes {
            active.notes = Set(non_blank(Some(notes)));
        }
        active.updated_at = Set(chrono::Utc::now().into());
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        info!(
            assignment_id = id,
            from = %current,
            to = %updated.status,
            "Delivery assignment updated"
        );
        Ok(updated)
    }
}

/// Links a volunteer to a request unless the pair is already linked.
///
/// Returns the link row and whether it was created.
pub(crate) async fn link_volunteer<C: ConnectionTrait>(
    conn: &C,
    request_id: i32,
    volunteer_id: i32,
) -> Result<(request_volunteers::Model, bool), DbErr> {
    let existing = request_volunteers::Entity::find()
        .filter(request_volunteers::Column::RequestId.eq(request_id))
        .filter(request_volunteers::Column::VolunteerId.eq(volunteer_id))
        .one(conn)
        .await?;
    if let Some(link) = existing {
        debug!(request_id, volunteer_id, "Volunteer already linked");
        return Ok((link, false));
    }

    let link = request_volunteers::ActiveModel {
        request_id: Set(request_id),
        volunteer_id: Set(volunteer_id),
        created_at: Set(chrono::Utc::now().into()),
        ..Default::default()
    }
    .insert(conn)
    .await?;
    debug!(request_id, volunteer_id, "Volunteer linked");
    Ok((link, true))
}
