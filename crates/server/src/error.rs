//! HTTP error mapping.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use domain::{FailureClass, GatewayError};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// Message shown to visitors when a collaborator fails.
const UPSTREAM_MESSAGE: &str = "Unable to load data from the issue tracker";

/// Message shown for faults in Glasspane's own records.
const INTERNAL_MESSAGE: &str = "Internal error";

/// Errors returned by handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// The request body could not be decoded.
    #[error("{0}")]
    BadRequest(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Result type alias for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = match self {
            ApiError::BadRequest(message) => {
                let body = json!({
                    "success": false,
                    "error": message,
                    "kind": FailureClass::Validation,
                });
                return (StatusCode::BAD_REQUEST, Json(body)).into_response();
            }
            ApiError::Gateway(err) => err,
        };

        let status = match &err {
            GatewayError::NotFound | GatewayError::FormNotFound => StatusCode::NOT_FOUND,
            GatewayError::Expired => StatusCode::GONE,
            GatewayError::PasswordRequired
            | GatewayError::InvalidPassword
            | GatewayError::Unauthorized => StatusCode::UNAUTHORIZED,
            GatewayError::Validation { .. } => StatusCode::BAD_REQUEST,
            GatewayError::SubmissionFailed { .. } | GatewayError::UpstreamUnavailable { .. } => {
                StatusCode::BAD_GATEWAY
            }
            GatewayError::StoreIntegrity { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Only rejections of the visitor's own input carry their message out.
        let message = match &err {
            GatewayError::SubmissionFailed { message } => {
                warn!(error = %message, "submission rejected upstream");
                message.clone()
            }
            GatewayError::UpstreamUnavailable { reason } => {
                error!(%reason, "upstream unavailable");
                UPSTREAM_MESSAGE.to_string()
            }
            GatewayError::StoreIntegrity { detail } => {
                error!(%detail, "store integrity fault");
                INTERNAL_MESSAGE.to_string()
            }
            other => other.to_string(),
        };

        let class = err.class();
        let mut body = json!({ "error": message, "kind": class });
        if class != FailureClass::Access {
            body["success"] = json!(false);
        }
        if err.requires_password() {
            body["requiresPassword"] = json!(true);
        }
        (status, Json(body)).into_response()
    }
}
