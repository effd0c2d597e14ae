//! Fixed answers for well-known crawler and browser paths.

use crate::api::responses::robots;
use crate::api::GatewayError;
use axum::response::Response;

/// Browsers probe for a favicon; there is none.
pub async fn favicon() -> GatewayError {
    GatewayError::NotFound
}

/// GET /robots.txt
pub async fn robots_txt() -> Response {
    robots()
}
