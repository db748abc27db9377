//! HTTP error responses.
//!
//! Errors are not exposed: the client gets the status, an error code, and the
//! status' generic reason phrase. The detailed message only goes to the log.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{error, warn};

use pitstop_core::attachment::AttachmentError;
use pitstop_core::storage::StorageError;
use pitstop_shared::AppError;

/// Handler error, rendered as a non-exposing JSON response.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// The HTTP status this error is reported with.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<AttachmentError> for ApiError {
    fn from(err: AttachmentError) -> Self {
        let message = err.to_string();
        let app = match err {
            AttachmentError::NotFound(_) | AttachmentError::TargetNotFound { .. } => {
                AppError::NotFound(message)
            }
            AttachmentError::StorageNotConfigured => AppError::Unavailable(message),
            AttachmentError::Storage(StorageError::FileTooLarge { .. }) => {
                AppError::Validation(message)
            }
            AttachmentError::Storage(_) => AppError::ExternalService(message),
            AttachmentError::Repository(_) => AppError::Database(message),
        };
        Self(app)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            error!(error = %self.0, status = status.as_u16(), "Request failed");
        } else {
            warn!(error = %self.0, status = status.as_u16(), "Request rejected");
        }

        (
            status,
            Json(json!({
                "error": self.0.error_code(),
                "message": status.canonical_reason().unwrap_or("Error"),
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_attachment_error_statuses() {
        let cases = [
            (
                AttachmentError::not_found(Uuid::new_v4()),
                StatusCode::NOT_FOUND,
            ),
            (
                AttachmentError::target_not_found(
                    pitstop_core::attachment::AttachmentTarget::Vehicle,
                    Uuid::new_v4(),
                ),
                StatusCode::NOT_FOUND,
            ),
            (
                AttachmentError::StorageNotConfigured,
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                AttachmentError::Storage(StorageError::file_too_large(20, 10)),
                StatusCode::BAD_REQUEST,
            ),
            (
                AttachmentError::Storage(StorageError::configuration("bad")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AttachmentError::repository("down"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[tokio::test]
    async fn test_response_hides_internal_message() {
        use http_body_util::BodyExt;

        let response =
            ApiError(AppError::Database("password authentication failed".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(!text.contains("password"));

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["error"], "DATABASE_ERROR");
        assert_eq!(value["message"], "Internal Server Error");
    }
}
