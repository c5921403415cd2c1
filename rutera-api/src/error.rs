use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rutera_booking::{BookingError, SelectionError, ValidationError};
use rutera_core::{DirectoryError, SessionError, SubmissionError};
use serde_json::json;

#[derive(Debug)]
pub enum ApiError {
    AuthenticationError(String),
    AuthorizationError(String),
    NotFoundError(String),
    ValidationError(String),
    ConflictError(String),
    ServiceUnavailableError(String),
    Anyhow(anyhow::Error),
}

impl ApiError {
    pub fn session(err: SessionError) -> Self {
        match err {
            SessionError::NotAuthenticated => Self::AuthenticationError(err.to_string()),
        }
    }

    pub fn directory(err: DirectoryError) -> Self {
        match err {
            DirectoryError::NotFound(_) => Self::NotFoundError(err.to_string()),
            DirectoryError::ServiceUnavailable(_) => Self::ServiceUnavailableError(err.to_string()),
        }
    }

    pub fn submission(err: SubmissionError) -> Self {
        match err {
            SubmissionError::NotFound(_) => Self::NotFoundError(err.to_string()),
            SubmissionError::Rejected { .. } => Self::ConflictError(err.to_string()),
            SubmissionError::Unavailable(_) => Self::ServiceUnavailableError(err.to_string()),
        }
    }

    pub fn booking(err: BookingError) -> Self {
        match err {
            BookingError::Selection(SelectionError::SeatUnavailable(_))
            | BookingError::Selection(SelectionError::CapacityExceeded)
            | BookingError::SubmissionInFlight
            | BookingError::AlreadyConfirmed
            | BookingError::Rejected(_) => Self::ConflictError(err.to_string()),
            BookingError::Validation(ValidationError::EmptySelection)
            | BookingError::Validation(ValidationError::IncompletePassenger(_))
            | BookingError::NotValidated => Self::ValidationError(err.to_string()),
            BookingError::ServiceUnavailable(_) => Self::ServiceUnavailableError(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::AuthenticationError(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::AuthorizationError(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::NotFoundError(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::ValidationError(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::ConflictError(msg) => (StatusCode::CONFLICT, msg),
            ApiError::ServiceUnavailableError(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            ApiError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::Anyhow(err.into())
    }
}
