//! Direct reads from object storage.

use super::AppState;
use crate::api::responses::gateway_response;
use crate::api::GatewayError;
use crate::path_rules::{PathRules, StorageRules};
use axum::body::Body;
use axum::http::StatusCode;
use axum::response::Response;
use tracing::{debug, instrument};

/// GET an object from the org's content bucket. Any storage failure is a 404.
#[instrument(skip(state))]
pub async fn get_from_storage(state: &AppState, raw_path: &str) -> Result<Response, GatewayError> {
    let ctx = StorageRules {
        bucket: &state.bucket_name,
    }
    .address(raw_path);
    let bucket = ctx.content_bucket();

    let object = state
        .storage
        .get_object(&bucket, ctx.key())
        .await
        .map_err(|e| {
            debug!("storage miss for {}/{}: {}", bucket, ctx.key(), e);
            GatewayError::from(e)
        })?;

    Ok(gateway_response(
        StatusCode::OK,
        Body::from(object.body),
        object.content_type.as_deref(),
    ))
}
