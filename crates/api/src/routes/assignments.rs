//! Volunteer assignment and delivery routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post},
};
use chrono::NaiveDate;
use hwf_core::assignment::AssignmentStatus;
use hwf_db::repositories::{AssignVolunteerInput, AssignmentChange, AssignmentRepository};
use serde::Deserialize;
use serde_json::json;

use crate::{AppState, error::ApiError};

/// Creates the assignment routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/requests/{request_id}/volunteers", post(assign_volunteer))
        .route(
            "/requests/{request_id}/volunteers/{volunteer_id}",
            delete(unassign_volunteer),
        )
        .route("/requests/{request_id}/assignments", get(list_assignments))
        .route("/delivery-assignments/{assignment_id}", patch(update_assignment))
}

/// Request body for assigning a volunteer.
#[derive(Debug, Deserialize)]
pub struct AssignVolunteerRequest {
    /// Volunteer to link.
    #[serde(alias = "volunteerId")]
    pub volunteer_id: i32,
    /// Delivery date (YYYY-MM-DD); schedules a delivery when present.
    #[serde(alias = "scheduledDate")]
    pub scheduled_date: Option<NaiveDate>,
    /// Delivery notes.
    pub notes: Option<String>,
}

/// Request body for changing a delivery assignment.
#[derive(Debug, Deserialize)]
pub struct UpdateAssignmentRequest {
    /// Target status: scheduled, completed or cancelled.
    pub status: Option<String>,
    /// Completion date, or the new scheduled date.
    pub date: Option<NaiveDate>,
    /// Replacement notes.
    pub notes: Option<String>,
}

/// POST `/requests/{request_id}/volunteers` - Link a volunteer.
async fn assign_volunteer(
    State(state): State<AppState>,
    Path(request_id): Path<i32>,
    Json(payload): Json<AssignVolunteerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = AssignmentRepository::new((*state.db).clone());
    let assignment = repo
        .assign_volunteer(
            request_id,
            AssignVolunteerInput {
                volunteer_id: payload.volunteer_id,
                scheduled_date: payload.scheduled_date,
                notes: payload.notes,
            },
        )
        .await?;

    let status = if assignment.created || assignment.delivery.is_some() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(assignment)))
}

/// DELETE `/requests/{request_id}/volunteers/{volunteer_id}` - Unlink a
/// volunteer and drop their scheduled deliveries.
async fn unassign_volunteer(
    State(state): State<AppState>,
    Path((request_id, volunteer_id)): Path<(i32, i32)>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = AssignmentRepository::new((*state.db).clone());
    repo.unassign_volunteer(request_id, volunteer_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET `/requests/{request_id}/assignments` - List delivery assignments.
async fn list_assignments(
    State(state): State<AppState>,
    Path(request_id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = AssignmentRepository::new((*state.db).clone());
    let assignments = repo.list_for_request(request_id).await?;
    Ok(Json(json!({ "assignments": assignments })))
}

/// PATCH `/delivery-assignments/{assignment_id}` - Complete, cancel or
/// reschedule a delivery.
async fn update_assignment(
    State(state): State<AppState>,
    Path(assignment_id): Path<i32>,
    Json(payload): Json<UpdateAssignmentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let status = payload
        .status
        .map(|s| {
            AssignmentStatus::parse(&s)
                .ok_or_else(|| ApiError::validation(format!("Invalid assignment status: {s}")))
        })
        .transpose()?;

    let repo = AssignmentRepository::new((*state.db).clone());
    let today = chrono::Utc::now().date_naive();
    let assignment = repo
        .update_assignment(
            assignment_id,
            AssignmentChange {
                status,
                date: payload.date,
                notes: payload.notes,
            },
            today,
        )
        .await?;

    Ok(Json(assignment))
}
