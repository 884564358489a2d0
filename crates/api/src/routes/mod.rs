//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod assignments;
pub mod clients;
pub mod health;
pub mod inventory;
pub mod requests;
pub mod skills;
pub mod teams;
pub mod volunteers;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(clients::routes())
        .merge(volunteers::routes())
        .merge(skills::routes())
        .merge(teams::routes())
        .merge(inventory::routes())
        .merge(requests::routes())
        .merge(assignments::routes())
}

/// Request body for endpoints that replace a list of linked ids.
#[derive(Debug, serde::Deserialize)]
pub struct IdList {
    /// The complete new set of ids.
    pub ids: Vec<i32>,
}
