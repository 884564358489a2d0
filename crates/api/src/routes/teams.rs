//! Team routes, including member and skill links.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use hwf_db::repositories::{TeamInput, TeamRepository};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::routes::IdList;
use crate::{AppState, error::ApiError};

/// Creates the team routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/teams", get(list_teams).post(create_team))
        .route(
            "/teams/{team_id}",
            get(get_team).put(update_team).delete(delete_team),
        )
        .route("/teams/{team_id}/members", put(replace_members))
        .route("/teams/{team_id}/skills", put(replace_skills))
}

/// Request body for creating or replacing a team.
#[derive(Debug, Deserialize)]
pub struct TeamRequest {
    /// Team name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Volunteer leading the team.
    pub lead_volunteer_id: Option<i32>,
}

impl From<TeamRequest> for TeamInput {
    fn from(req: TeamRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            lead_volunteer_id: req.lead_volunteer_id,
        }
    }
}

/// GET `/teams` - List teams.
async fn list_teams(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let repo = TeamRepository::new((*state.db).clone());
    let teams = repo.list().await?;
    Ok(Json(json!({ "teams": teams })))
}

/// POST `/teams` - Create a team.
async fn create_team(
    State(state): State<AppState>,
    Json(payload): Json<TeamRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = TeamRepository::new((*state.db).clone());
    let team = repo.create(payload.into()).await?;

    info!(team_id = team.id, name = %team.name, "Team created");
    Ok((StatusCode::CREATED, Json(team)))
}

/// GET `/teams/{team_id}` - Get a team with members and skills.
async fn get_team(
    State(state): State<AppState>,
    Path(team_id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = TeamRepository::new((*state.db).clone());
    let team = repo
        .find_by_id(team_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Team not found: {team_id}")))?;
    Ok(Json(team))
}

/// PUT `/teams/{team_id}` - Replace a team's fields.
async fn update_team(
    State(state): State<AppState>,
    Path(team_id): Path<i32>,
    Json(payload): Json<TeamRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = TeamRepository::new((*state.db).clone());
    let team = repo.update(team_id, payload.into()).await?;

    info!(team_id, "Team updated");
    Ok(Json(team))
}

/// DELETE `/teams/{team_id}` - Delete a team.
async fn delete_team(
    State(state): State<AppState>,
    Path(team_id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = TeamRepository::new((*state.db).clone());
    repo.delete(team_id).await?;

    info!(team_id, "Team deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// PUT `/teams/{team_id}/members` - Replace the team's volunteers.
async fn replace_members(
    State(state): State<AppState>,
    Path(team_id): Path<i32>,
    Json(payload): Json<IdList>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = TeamRepository::new((*state.db).clone());
    let member_ids = repo.replace_members(team_id, &payload.ids).await?;

    info!(team_id, count = member_ids.len(), "Team members replaced");
    Ok(Json(json!({ "team_id": team_id, "member_ids": member_ids })))
}

/// PUT `/teams/{team_id}/skills` - Replace the team's skills.
async fn replace_skills(
    State(state): State<AppState>,
    Path(team_id): Path<i32>,
    Json(payload): Json<IdList>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = TeamRepository::new((*state.db).clone());
    let skill_ids = repo.replace_skills(team_id, &payload.ids).await?;

    info!(team_id, count = skill_ids.len(), "Team skills replaced");
    Ok(Json(json!({ "team_id": team_id, "skill_ids": skill_ids })))
}
