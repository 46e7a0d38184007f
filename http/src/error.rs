use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use recitation_application::ApplicationError;
use recitation_domain::DomainError;
use serde_json::json;

#[derive(Debug)]
pub enum HttpError {
    Validation { message: String },
    PayloadTooLarge,
    Internal { message: String },
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            HttpError::Validation { message } => (StatusCode::BAD_REQUEST, message),
            HttpError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "Audio payload too large".to_string(),
            ),
            HttpError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        (
            status,
            Json(json!({
                "error": message,
            })),
        )
            .into_response()
    }
}

impl From<ApplicationError> for HttpError {
    fn from(error: ApplicationError) -> Self {
        match error {
            ApplicationError::Validation(message) => HttpError::Validation { message },
            ApplicationError::Domain(DomainError::Validation { message }) => {
                HttpError::Validation { message }
            }
            // An unreachable or misconfigured transcription backend is the
            // caller-visible 500 case.
            other => HttpError::Internal {
                message: other.to_string(),
            },
        }
    }
}
