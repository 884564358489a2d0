//! Skill routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use hwf_db::repositories::{SkillInput, SkillRepository};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::{AppState, error::ApiError};

/// Creates the skill routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/skills", get(list_skills).post(create_skill))
        .route(
            "/skills/{skill_id}",
            get(get_skill).put(update_skill).delete(delete_skill),
        )
}

/// Request body for creating or replacing a skill.
#[derive(Debug, Deserialize)]
pub struct SkillRequest {
    /// Skill name, unique.
    pub name: String,
    /// Description.
    pub description: Option<String>,
}

impl From<SkillRequest> for SkillInput {
    fn from(req: SkillRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
        }
    }
}

async fn list_skills(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let repo = SkillRepository::new((*state.db).clone());
    let skills = repo.list().await?;
    Ok(Json(json!({ "skills": skills })))
}

async fn create_skill(
    State(state): State<AppState>,
    Json(payload): Json<SkillRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = SkillRepository::new((*state.db).clone());
    let skill = repo.create(payload.into()).await?;

    info!(skill_id = skill.id, name = %skill.name, "Skill created");
    Ok((StatusCode::CREATED, Json(skill)))
}

async fn get_skill(
    State(state): State<AppState>,
    Path(skill_id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = SkillRepository::new((*state.db).clone());
    let skill = repo
        .find_by_id(skill_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Skill not found: {skill_id}")))?;
    Ok(Json(skill))
}

async fn update_skill(
    State(state): State<AppState>,
    Path(skill_id): Path<i32>,
    Json(payload): Json<SkillRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = SkillRepository::new((*state.db).clone());
    let skill = repo.update(skill_id, payload.into()).await?;

    info!(skill_id, "Skill updated");
    Ok(Json(skill))
}

async fn delete_skill(
    State(state): State<AppState>,
    Path(skill_id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = SkillRepository::new((*state.db).clone());
    repo.delete(skill_id).await?;

    info!(skill_id, "Skill deleted");
    Ok(StatusCode::NO_CONTENT)
}
