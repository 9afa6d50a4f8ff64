//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::DomainError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// The request carried no role claim.
    MissingRole,
    /// Bad request from the client (malformed payload, not a domain error).
    BadRequest(String),
    /// Domain logic error.
    Domain(DomainError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::MissingRole => (
                StatusCode::UNAUTHORIZED,
                "missing role claim".to_string(),
            ),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Domain(err) => domain_error_to_response(err),
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn domain_error_to_response(err: DomainError) -> (StatusCode, String) {
    match &err {
        // A malformed role claim is an authentication problem, a known
        // role without the required permission is an authorization one.
        DomainError::InvalidRole(_) => (StatusCode::UNAUTHORIZED, err.to_string()),
        DomainError::NotEnoughRights { .. } => (StatusCode::FORBIDDEN, err.to_string()),

        DomainError::InvalidCity(_)
        | DomainError::InvalidProductType(_)
        | DomainError::InvalidReceptionStatus(_)
        | DomainError::InvalidPage
        | DomainError::InvalidPageSize
        | DomainError::InvalidDateRange
        | DomainError::InvalidStartDate => (StatusCode::BAD_REQUEST, err.to_string()),

        DomainError::PickupPointNotFound
        | DomainError::DuplicatePickupPoint
        | DomainError::OpenReceptionAlreadyExists
        | DomainError::NoOpenReception
        | DomainError::NoProductsInReception => (StatusCode::BAD_REQUEST, err.to_string()),

        DomainError::Unexpected => {
            tracing::error!("internal server error surfaced to client");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".to_string(),
            )
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}
