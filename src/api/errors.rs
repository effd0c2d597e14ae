//! Gateway error responses
//!
//! Errors never carry backend detail to the client; the response is a bare
//! status (plus a diagnostic header for admin outages) with the standard
//! CORS headers so browser callers can still read it.

use super::responses::{gateway_response, TEXT_PLAIN};
use crate::storage::StorageError;
use crate::upstream::AdminError;
use axum::body::Body;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Diagnostic header set on admin outages.
pub const X_ERROR: &str = "x-error";

/// Gateway request failures
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Not Found")]
    NotFound,

    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("403 Forbidden")]
    Forbidden,

    #[error("401 Unauthorized")]
    Unauthorized,

    #[error("Failed to fetch from admin")]
    AdminUnavailable,
}

impl GatewayError {
    /// Get the HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::NotFound => StatusCode::NOT_FOUND,
            GatewayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            GatewayError::Forbidden => StatusCode::FORBIDDEN,
            GatewayError::Unauthorized => StatusCode::UNAUTHORIZED,
            GatewayError::AdminUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            GatewayError::Forbidden | GatewayError::Unauthorized => {
                gateway_response(status, Body::from(self.to_string()), Some(TEXT_PLAIN))
            }
            GatewayError::AdminUnavailable => {
                let mut response = gateway_response(status, Body::empty(), None);
                response.headers_mut().insert(
                    X_ERROR,
                    HeaderValue::from_static("Failed to fetch from admin"),
                );
                response
            }
            GatewayError::NotFound | GatewayError::MethodNotAllowed => {
                gateway_response(status, Body::empty(), None)
            }
        }
    }
}

impl From<StorageError> for GatewayError {
    fn from(_: StorageError) -> Self {
        GatewayError::NotFound
    }
}

impl From<AdminError> for GatewayError {
    fn from(_: AdminError) -> Self {
        GatewayError::AdminUnavailable
    }
}
