//! Client management routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use hwf_db::repositories::{ClientFilter, ClientInput, ClientRepository};
use hwf_shared::types::PageRequest;
use serde::Deserialize;
use tracing::info;

use crate::{AppState, error::ApiError};

/// Creates the client routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/clients", get(list_clients).post(create_client))
        .route(
            "/clients/{client_id}",
            get(get_client).put(update_client).delete(delete_client),
        )
}

/// Query parameters for listing clients.
#[derive(Debug, Deserialize)]
pub struct ListClientsQuery {
    /// Matches first name, last name or email.
    pub q: Option<String>,
}

/// Request body for creating or replacing a client.
#[derive(Debug, Deserialize)]
pub struct ClientRequest {
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Email address.
    pub email: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// City.
    pub city: Option<String>,
    /// Postal code.
    pub postal_code: Option<String>,
    /// Notes.
    pub notes: Option<String>,
}

impl From<ClientRequest> for ClientInput {
    fn from(req: ClientRequest) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            phone: req.phone,
            address: req.address,
            city: req.city,
            postal_code: req.postal_code,
            notes: req.notes,
        }
    }
}

/// GET `/clients` - List clients.
async fn list_clients(
    State(state): State<AppState>,
    Query(query): Query<ListClientsQuery>,
    Query(page): Query<PageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = ClientRepository::new((*state.db).clone());
    let clients = repo
        .list(ClientFilter { search: query.q }, &page)
        .await?;
    Ok(Json(clients))
}

/// POST `/clients` - Create a client.
async fn create_client(
    State(state): State<AppState>,
    Json(payload): Json<ClientRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = ClientRepository::new((*state.db).clone());
    let client = repo.create(payload.into()).await?;

    info!(client_id = client.id, "Client created");
    Ok((StatusCode::CREATED, Json(client)))
}

/// GET `/clients/{client_id}` - Get a client.
async fn get_client(
    State(state): State<AppState>,
    Path(client_id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = ClientRepository::new((*state.db).clone());
    let client = repo
        .find_by_id(client_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Client not found: {client_id}")))?;
    Ok(Json(client))
}

/// PUT `/clients/{client_id}` - Replace a client.
async fn update_client(
    State(state): State<AppState>,
    Path(client_id): Path<i32>,
    Json(payload): Json<ClientRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = ClientRepository::new((*state.db).clone());
    let client = repo.update(client_id, payload.into()).await?;

    info!(client_id, "Client updated");
    Ok(Json(client))
}

/// DELETE `/clients/{client_id}` - Delete a client without requests.
async fn delete_client(
    State(state): State<AppState>,
    Path(client_id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = ClientRepository::new((*state.db).clone());
    repo.delete(client_id).await?;

    info!(client_id, "Client deleted");
    Ok(StatusCode::NO_CONTENT)
}
