//! HTTP error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use hwf_core::request::DraftError;
use hwf_core::volunteer::AvailabilityError;
use hwf_db::repositories::{
    AssignmentError, ClientError, InventoryError, RequestError, SkillError, TeamError,
    VolunteerError,
};
use hwf_shared::AppError;
use serde_json::json;
use tracing::error;

/// Error returned by handlers.
///
/// Renders as `{"error": "<code>", "message": "<text>"}` with the status of
/// the wrapped [`AppError`].
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// Shorthand for a 404 response.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self(AppError::NotFound(message.into()))
    }

    /// Shorthand for a 400 response.
    pub fn validation(message: impl Into<String>) -> Self {
        Self(AppError::Validation(message.into()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        if err.is_server_error() {
            error!(error = %err, "Request failed");
        }

        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (
            status,
            Json(json!({
                "error": err.error_code(),
                "message": err.public_message(),
            })),
        )
            .into_response()
    }
}

macro_rules! into_api_error {
    ($($source:ty),+ $(,)?) => {
        $(
            impl From<$source> for ApiError {
                fn from(err: $source) -> Self {
                    Self(AppError::from(err))
                }
            }
        )+
    };
}

into_api_error!(
    AppError,
    AssignmentError,
    ClientError,
    InventoryError,
    RequestError,
    SkillError,
    TeamError,
    VolunteerError,
);

impl From<DraftError> for ApiError {
    fn from(err: DraftError) -> Self {
        Self::from(RequestError::from(err))
    }
}

impl From<AvailabilityError> for ApiError {
    fn from(err: AvailabilityError) -> Self {
        Self::validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn render(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_not_found_body() {
        let (status, body) = render(ApiError::from(ClientError::NotFound(7))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");
        assert_eq!(body["message"], "Client not found: 7");
    }

    #[tokio::test]
    async fn test_database_errors_are_hidden() {
        let err = ApiError::from(RequestError::Database(sea_orm::DbErr::Custom(
            "connection reset".into(),
        )));
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "internal_error");
        assert_eq!(body["message"], "An error occurred");
    }

    #[tokio::test]
    async fn test_draft_errors_are_bad_requests() {
        let (status, body) = render(ApiError::from(DraftError::ClientRequired)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_availability_error() {
        let err = ApiError::from(AvailabilityError::UnknownDay("someday".into()));
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Unknown day in availability: someday");
    }
}
