//! Volunteer management routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use chrono::{DateTime, FixedOffset};
use hwf_core::volunteer::Availability;
use hwf_db::entities::volunteers;
use hwf_db::repositories::{VolunteerFilter, VolunteerInput, VolunteerRepository};
use hwf_shared::types::PageRequest;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::info;

use crate::routes::IdList;
use crate::{AppState, error::ApiError};

/// Creates the volunteer routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/volunteers", get(list_volunteers).post(create_volunteer))
        .route(
            "/volunteers/{volunteer_id}",
            get(get_volunteer)
                .put(update_volunteer)
                .delete(delete_volunteer),
        )
        .route("/volunteers/{volunteer_id}/skills", put(replace_skills))
}

/// Query parameters for listing volunteers.
#[derive(Debug, Deserialize)]
pub struct ListVolunteersQuery {
    /// Filter by active flag.
    pub active: Option<bool>,
    /// Filter by transportation flag.
    pub has_transportation: Option<bool>,
    /// Only volunteers with this skill.
    pub skill_id: Option<i32>,
}

/// Request body for creating or replacing a volunteer.
#[derive(Debug, Deserialize)]
pub struct VolunteerRequest {
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Email address.
    pub email: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Has a vehicle (default: false).
    pub has_transportation: Option<bool>,
    /// Taking assignments (default: true).
    pub is_active: Option<bool>,
    /// Availability in any accepted JSON shape.
    #[serde(default)]
    pub availability: Value,
    /// Notes.
    pub notes: Option<String>,
}

impl VolunteerRequest {
    fn into_input(self) -> Result<VolunteerInput, ApiError> {
        let availability = match &self.availability {
            Value::Null => None,
            value => Some(Availability::from_value(value)?),
        };
        Ok(VolunteerInput {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            has_transportation: self.has_transportation.unwrap_or(false),
            is_active: self.is_active.unwrap_or(true),
            availability,
            notes: self.notes,
        })
    }
}

/// Response for a volunteer.
#[derive(Debug, Serialize)]
pub struct VolunteerResponse {
    /// Volunteer ID.
    pub id: i32,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Email address.
    pub email: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Has a vehicle.
    pub has_transportation: bool,
    /// Taking assignments.
    pub is_active: bool,
    /// Availability in canonical form, `null` when unset or unreadable.
    pub availability: Value,
    /// Notes.
    pub notes: Option<String>,
    /// Skill ids, present on single-volunteer responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skill_ids: Option<Vec<i32>>,
    /// Creation timestamp.
    pub created_at: DateTime<FixedOffset>,
    /// Last update timestamp.
    pub updated_at: DateTime<FixedOffset>,
}

impl VolunteerResponse {
    fn new(v: volunteers::Model, skill_ids: Option<Vec<i32>>) -> Self {
        let availability = v
            .availability
            .as_deref()
            .and_then(|text| Availability::parse(text).ok())
            .map_or(Value::Null, |a| a.to_value());
        Self {
            id: v.id,
            first_name: v.first_name,
            last_name: v.last_name,
            email: v.email,
            phone: v.phone,
            has_transportation: v.has_transportation,
            is_active: v.is_active,
            availability,
            notes: v.notes,
            skill_ids,
            created_at: v.created_at,
            updated_at: v.updated_at,
        }
    }
}

/// GET `/volunteers` - List volunteers.
async fn list_volunteers(
    State(state): State<AppState>,
    Query(query): Query<ListVolunteersQuery>,
    Query(page): Query<PageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = VolunteerRepository::new((*state.db).clone());
    let filter = VolunteerFilter {
        is_active: query.active,
        has_transportation: query.has_transportation,
        skill_id: query.skill_id,
    };
    let volunteers = repo.list(filter, &page).await?;
    Ok(Json(volunteers.map(|v| VolunteerResponse::new(v, None))))
}

/// POST `/volunteers` - Create a volunteer.
async fn create_volunteer(
    State(state): State<AppState>,
    Json(payload): Json<VolunteerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = payload.into_input()?;
    let repo = VolunteerRepository::new((*state.db).clone());
    let volunteer = repo.create(input).await?;

    info!(volunteer_id = volunteer.id, "Volunteer created");
    Ok((
        StatusCode::CREATED,
        Json(VolunteerResponse::new(volunteer, Some(Vec::new()))),
    ))
}

/// GET `/volunteers/{volunteer_id}` - Get a volunteer with skills.
async fn get_volunteer(
    State(state): State<AppState>,
    Path(volunteer_id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = VolunteerRepository::new((*state.db).clone());
    let details = repo
        .find_by_id(volunteer_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Volunteer not found: {volunteer_id}")))?;
    Ok(Json(VolunteerResponse::new(
        details.volunteer,
        Some(details.skill_ids),
    )))
}

/// PUT `/volunteers/{volunteer_id}` - Replace a volunteer's fields.
async fn update_volunteer(
    State(state): State<AppState>,
    Path(volunteer_id): Path<i32>,
    Json(payload): Json<VolunteerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = payload.into_input()?;
    let repo = VolunteerRepository::new((*state.db).clone());
    let volunteer = repo.update(volunteer_id, input).await?;

    info!(volunteer_id, "Volunteer updated");
    Ok(Json(VolunteerResponse::new(volunteer, None)))
}

/// DELETE `/volunteers/{volunteer_id}` - Delete a volunteer.
async fn delete_volunteer(
    State(state): State<AppState>,
    Path(volunteer_id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = VolunteerRepository::new((*state.db).clone());
    repo.delete(volunteer_id).await?;

    info!(volunteer_id, "Volunteer deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// PUT `/volunteers/{volunteer_id}/skills` - Replace a volunteer's skills.
async fn replace_skills(
    State(state): State<AppState>,
    Path(volunteer_id): Path<i32>,
    Json(payload): Json<IdList>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = VolunteerRepository::new((*state.db).clone());
    let skill_ids = repo.replace_skills(volunteer_id, &payload.ids).await?;

    info!(volunteer_id, count = skill_ids.len(), "Volunteer skills replaced");
    Ok(Json(json!({ "volunteer_id": volunteer_id, "skill_ids": skill_ids })))
}
