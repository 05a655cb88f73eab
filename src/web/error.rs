use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{error, warn};

use crate::services::roster_service::RosterError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Email is required")]
    MissingEmail,

    // The rejection text carries serde internals; only the log sees it.
    #[error("Invalid request body")]
    InvalidBody(#[from] JsonRejection),

    #[error(transparent)]
    Roster(#[from] RosterError),

    #[error("Internal server error")]
    Database(#[from] sqlx::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingEmail | ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Roster(RosterError::NotFound) => StatusCode::NOT_FOUND,
            ApiError::Roster(
                RosterError::AlreadyRegistered
                | RosterError::ActivityFull
                | RosterError::NotRegistered,
            ) => StatusCode::BAD_REQUEST,
            ApiError::Roster(RosterError::Database(_)) | ApiError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let ApiError::InvalidBody(rejection) = &self {
            warn!(reason = %rejection.body_text(), "rejected request body");
        }

        let detail = if status.is_server_error() {
            // Store errors are logged, never echoed to the client.
            error!(error = %self, "request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(serde_json::json!({ "detail": detail }))).into_response()
    }
}
