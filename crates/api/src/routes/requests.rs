//! Donation-delivery request routes.
//!
//! Create and update accept the admin form payload (`RequestForm`) and run
//! the full workflow: request row, team links, items and volunteer link.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use hwf_core::request::{ProductLine, RequestForm, RequestPriority, RequestStatus};
use hwf_db::repositories::{
    RequestFilter, RequestItemRepository, RequestRepository, RequestTeamRepository,
};
use hwf_shared::types::PageRequest;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use crate::{AppState, error::ApiError};

/// Creates the request routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/requests", get(list_requests).post(create_request))
        .route(
            "/requests/{request_id}",
            get(get_request).put(update_request).delete(delete_request),
        )
        .route("/requests/{request_id}/teams", put(assign_teams))
        .route(
            "/requests/{request_id}/items",
            get(list_items).post(add_item).put(replace_items),
        )
}

/// Query parameters for listing requests.
#[derive(Debug, Deserialize)]
pub struct ListRequestsQuery {
    /// Filter by status.
    pub status: Option<String>,
    /// Filter by priority.
    pub priority: Option<String>,
    /// Filter by client.
    pub client_id: Option<i32>,
    /// Filter by linked team.
    pub team_id: Option<i32>,
}

impl ListRequestsQuery {
    fn into_filter(self) -> Result<RequestFilter, ApiError> {
        let status = self
            .status
            .map(|s| {
                RequestStatus::parse(&s)
                    .ok_or_else(|| ApiError::validation(format!("Invalid status: {s}")))
            })
            .transpose()?;
        let priority = self
            .priority
            .map(|p| {
                RequestPriority::parse(&p)
                    .ok_or_else(|| ApiError::validation(format!("Invalid priority: {p}")))
            })
            .transpose()?;

        Ok(RequestFilter {
            status,
            priority,
            client_id: self.client_id,
            team_id: self.team_id,
        })
    }
}

/// Request body for replacing a request's teams.
#[derive(Debug, Deserialize)]
pub struct AssignTeamsRequest {
    /// Teams to link, in order. Duplicates are kept.
    #[serde(alias = "teamIds")]
    pub team_ids: Vec<i32>,
}

/// Request body for replacing a request's items.
#[derive(Debug, Deserialize)]
pub struct ReplaceItemsRequest {
    /// The new product lines.
    pub products: Vec<ProductLine>,
}

/// GET `/requests` - List requests, newest first.
async fn list_requests(
    State(state): State<AppState>,
    Query(query): Query<ListRequestsQuery>,
    Query(page): Query<PageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = query.into_filter()?;
    let repo = RequestRepository::new((*state.db).clone());
    let requests = repo.list_requests(filter, &page).await?;
    Ok(Json(requests))
}

/// POST `/requests` - Create a request with teams, items and volunteer.
async fn create_request(
    State(state): State<AppState>,
    Json(form): Json<RequestForm>,
) -> Result<impl IntoResponse, ApiError> {
    let draft = form.normalize()?;
    let repo = RequestRepository::new((*state.db).clone());
    let saved = repo.create_request(draft).await?;

    let request = &saved.request;
    if !saved.stock_warnings.is_empty() {
        warn!(
            request_id = request.request.id,
            count = saved.stock_warnings.len(),
            "Request saved with stock shortfalls"
        );
    }

    Ok((StatusCode::CREATED, Json(saved)))
}

/// GET `/requests/{request_id}` - Get a request with everything linked.
async fn get_request(
    State(state): State<AppState>,
    Path(request_id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = RequestRepository::new((*state.db).clone());
    let request = repo
        .get_request(request_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Request not found: {request_id}")))?;
    Ok(Json(request))
}

/// PUT `/requests/{request_id}` - Replace a request, its teams and items.
async fn update_request(
    State(state): State<AppState>,
    Path(request_id): Path<i32>,
    Json(form): Json<RequestForm>,
) -> Result<impl IntoResponse, ApiError> {
    let draft = form.normalize()?;
    let repo = RequestRepository::new((*state.db).clone());
    let saved = repo.update_request(request_id, draft).await?;

    Ok(Json(saved))
}

/// DELETE `/requests/{request_id}` - Delete a request and its dependents.
async fn delete_request(
    State(state): State<AppState>,
    Path(request_id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = RequestRepository::new((*state.db).clone());
    repo.delete_request(request_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// PUT `/requests/{request_id}/teams` - Replace the linked teams.
async fn assign_teams(
    State(state): State<AppState>,
    Path(request_id): Path<i32>,
    Json(payload): Json<AssignTeamsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(bad) = payload.team_ids.iter().find(|id| **id <= 0) {
        return Err(ApiError::validation(format!("Invalid team id: {bad}")));
    }

    let repo = RequestTeamRepository::new((*state.db).clone());
    let team_ids = repo.assign_multiple_teams(request_id, &payload.team_ids).await?;

    Ok(Json(json!({ "request_id": request_id, "team_ids": team_ids })))
}

/// GET `/requests/{request_id}/items` - List requested items.
async fn list_items(
    State(state): State<AppState>,
    Path(request_id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = RequestItemRepository::new((*state.db).clone());
    let items = repo.list_request_items(request_id).await?;
    Ok(Json(json!({ "items": items })))
}

/// POST `/requests/{request_id}/items` - Add one product line.
async fn add_item(
    State(state): State<AppState>,
    Path(request_id): Path<i32>,
    Json(line): Json<ProductLine>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = RequestItemRepository::new((*state.db).clone());
    let saved = repo.add_request_item(request_id, line).await?;

    Ok((StatusCode::CREATED, Json(saved)))
}

/// PUT `/requests/{request_id}/items` - Replace all product lines.
async fn replace_items(
    State(state): State<AppState>,
    Path(request_id): Path<i32>,
    Json(payload): Json<ReplaceItemsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = RequestItemRepository::new((*state.db).clone());
    let saved = repo
        .replace_request_items(request_id, payload.products)
        .await?;

    Ok(Json(saved))
}
