pub mod health;
pub mod metrics;
pub mod product;
pub mod pvz;
pub mod reception;

use axum::http::HeaderMap;

use crate::error::ApiError;

/// Header carrying the caller's resolved role claim.
///
/// Credential verification happens upstream; by the time a request reaches
/// this service the opaque credential has been exchanged for a bare role
/// string. The claim is passed through to the domain as-is, so unknown
/// values surface as `InvalidRole` rather than being rejected here.
pub(crate) const ROLE_HEADER: &str = "x-user-role";

pub(crate) fn role_claim(headers: &HeaderMap) -> Result<&str, ApiError> {
    headers
        .get(ROLE_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or(ApiError::MissingRole)
}
