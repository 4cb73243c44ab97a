use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;

use todo_service::{ErrorKind, ServiceError};
use todo_types::Envelope;

use crate::form::{FieldErrors, TITLE_HELP};

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error.";

/// An envelope plus the HTTP status it is sent with.
///
/// Domain failures travel as 200 with an error envelope. Only argument
/// parsing (400) and store failures (500) change the status code.
#[derive(Debug)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub envelope: Envelope,
}

impl ApiResponse {
    pub fn new(status: StatusCode, envelope: Envelope) -> Self {
        Self { status, envelope }
    }

    pub fn success(message: impl Into<String>, data: Value) -> Self {
        Self::new(StatusCode::OK, Envelope::success(message, data))
    }

    pub fn validation(errors: FieldErrors) -> Self {
        Self::new(StatusCode::BAD_REQUEST, Envelope::validation_failure(&errors))
    }

    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            Envelope::error(INTERNAL_ERROR_MESSAGE, Value::Null),
        )
    }
}

impl From<ServiceError> for ApiResponse {
    fn from(e: ServiceError) -> Self {
        match (e.kind(), &e) {
            (_, ServiceError::MissingTitle) => {
                Self::validation(FieldErrors::from([("title".to_string(), TITLE_HELP.to_string())]))
            }
            (ErrorKind::Internal, _) => {
                tracing::warn!(error = %e, "request failed");
                Self::internal()
            }
            _ => Self::new(StatusCode::OK, Envelope::error(e.to_string(), Value::Null)),
        }
    }
}

impl From<serde_json::Error> for ApiResponse {
    fn from(e: serde_json::Error) -> Self {
        tracing::warn!(error = %e, "response serialization failed");
        Self::internal()
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.envelope)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use todo_store::StoreError;
    use todo_types::{Status, TodoId, VALIDATION_FAILURE};

    #[test]
    fn domain_errors_are_200() {
        let r = ApiResponse::from(ServiceError::NotFound(TodoId(2)));
        assert_eq!(r.status, StatusCode::OK);
        assert_eq!(r.envelope.status, Status::Error);
        assert_eq!(r.envelope.message, "No records found with ID 2");
        assert_eq!(r.envelope.data, serde_json::json!([]));

        let r = ApiResponse::from(ServiceError::InvalidId("x".into()));
        assert_eq!(r.status, StatusCode::OK);
        assert_eq!(r.envelope.message, "Must have an integer as the todo ID!");
    }

    #[test]
    fn missing_title_is_validation_failure() {
        let r = ApiResponse::from(ServiceError::MissingTitle);
        assert_eq!(r.status, StatusCode::BAD_REQUEST);
        assert_eq!(r.envelope.message, VALIDATION_FAILURE);
        assert_eq!(r.envelope.data["title"], TITLE_HELP);
    }

    #[test]
    fn store_errors_are_500() {
        let r = ApiResponse::from(ServiceError::Store(StoreError::LockPoisoned));
        assert_eq!(r.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(r.envelope.message, INTERNAL_ERROR_MESSAGE);
    }
}
