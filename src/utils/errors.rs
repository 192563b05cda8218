use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::authz::{Authorization, AuthorizationError};
use crate::rpc::client::UpstreamError;

/// Errors surfaced at the HTTP boundary of the portal.
///
/// Each variant maps to exactly one status code; none of them are fatal to
/// the process.
#[derive(Error, Debug)]
pub enum PortalError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("method not found: {0}")]
    MethodUnknown(String),

    /// Not a failure of the portal: the caller must obtain approval first.
    #[error("approval required for {}", .0.method)]
    ApprovalRequired(Authorization),

    #[error("forbidden: {0}")]
    AuthorizationInvalid(AuthorizationError),

    #[error("authorization {0} not found")]
    AuthorizationNotFound(String),

    #[error("conflict: {0}")]
    InvalidTransition(AuthorizationError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl PortalError {
    pub fn status(&self) -> StatusCode {
        match self {
            PortalError::BadRequest(_) => StatusCode::BAD_REQUEST,
            PortalError::MethodUnknown(_) => StatusCode::NOT_FOUND,
            PortalError::ApprovalRequired(_) => StatusCode::PAYMENT_REQUIRED,
            PortalError::AuthorizationInvalid(_) => StatusCode::FORBIDDEN,
            PortalError::AuthorizationNotFound(_) => StatusCode::NOT_FOUND,
            PortalError::InvalidTransition(_) => StatusCode::CONFLICT,
            PortalError::Upstream(UpstreamError::Rpc { .. } | UpstreamError::RpcUnshaped(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            PortalError::Upstream(UpstreamError::Status { status, .. }) => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            PortalError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

/// Store errors as seen by the operator-facing endpoints.
impl From<AuthorizationError> for PortalError {
    fn from(err: AuthorizationError) -> Self {
        match err {
            AuthorizationError::NotFound(id) => PortalError::AuthorizationNotFound(id),
            other => PortalError::InvalidTransition(other),
        }
    }
}

impl IntoResponse for PortalError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            PortalError::ApprovalRequired(auth) => (status, Json(auth)).into_response(),
            // relay the daemon's own condition untouched
            PortalError::Upstream(UpstreamError::Rpc { code, message }) => {
                (status, Json(json!({ "error": { "code": code, "message": message } }))).into_response()
            }
            PortalError::Upstream(UpstreamError::RpcUnshaped(err)) => {
                (status, Json(json!({ "error": err }))).into_response()
            }
            PortalError::Upstream(UpstreamError::Status { body, .. }) => {
                let message = if body.is_empty() {
                    status.canonical_reason().unwrap_or("daemon error").to_string()
                } else {
                    body
                };
                (status, Json(json!({ "error": message }))).into_response()
            }
            other => (status, Json(json!({ "error": other.to_string() }))).into_response(),
        }
    }
}

/// Convenience alias
pub type Result<T> = std::result::Result<T, PortalError>;
