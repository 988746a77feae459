//! HTTP rendering of dispatch results.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::{CatalogError, Outcome};

/// Body returned for every rejected request.
pub const INVALID_REQUEST_MESSAGE: &str = "Invalid request.";

/// Body returned when the server itself fails.
pub const SERVER_ERROR_MESSAGE: &str = "Internal server error.";

/// The 400 response shared by every client failure.
pub fn invalid_request() -> Response {
    (StatusCode::BAD_REQUEST, INVALID_REQUEST_MESSAGE).into_response()
}

/// The 500 response.
pub fn server_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR_MESSAGE).into_response()
}

impl IntoResponse for Outcome {
    fn into_response(self) -> Response {
        match self {
            Outcome::Created { kind, .. } => (
                StatusCode::OK,
                format!("{} successfully created.", kind.display_name()),
            )
                .into_response(),
            Outcome::Updated { kind } => (
                StatusCode::OK,
                format!("{} successfully updated.", kind.display_name()),
            )
                .into_response(),
            Outcome::Deleted { kind } => {
                (StatusCode::OK, format!("{} deleted.", kind.display_name())).into_response()
            }
            Outcome::Found(record) => Json(record).into_response(),
            Outcome::Listed(records) => Json(records).into_response(),
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        if self.is_client_error() {
            invalid_request()
        } else {
            server_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AudioKind, DataStoreError};

    #[test]
    fn confirmations_use_display_names() {
        let response = Outcome::Created {
            kind: AudioKind::Audiobook,
            id: 3,
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let response = Outcome::Deleted {
            kind: AudioKind::Podcast,
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn errors_map_to_status() {
        assert_eq!(
            CatalogError::NotFound.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            CatalogError::UnknownKind("x".to_string())
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            CatalogError::Internal(DataStoreError::Internal("disk".to_string()))
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
