//! Proxy to the admin source service.

use super::AppState;
use crate::api::responses::relay;
use crate::api::GatewayError;
use crate::auth::{extract_bearer, query_token};
use crate::path_rules::{AdminRules, PathRules};
use crate::upstream::source_url;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, HeaderValue};
use axum::response::Response;
use tracing::{error, info};

/// Fetch the canonical source document and relay the answer as-is.
///
/// Only the resolved bearer is forwarded; no other inbound header reaches
/// the admin service.
pub async fn get_from_admin(
    state: &AppState,
    path: &str,
    query: Option<&str>,
    headers: &HeaderMap,
) -> Result<Response, GatewayError> {
    let canonical = AdminRules {
        policy: &state.access,
    }
    .address(path);
    let url = source_url(&state.admin_url, &canonical);

    let mut outbound = HeaderMap::new();
    if let Some(bearer) = extract_bearer(headers, query_token(query).as_deref()) {
        match HeaderValue::from_str(&bearer) {
            Ok(value) => {
                outbound.insert(AUTHORIZATION, value);
            }
            Err(_) => info!("dropping unencodable bearer credential"),
        }
    }

    info!("-> get from admin {}", url);
    let upstream = state.admin.fetch(&url, outbound).await.map_err(|e| {
        error!("admin fetch failed for {}: {}", url, e);
        GatewayError::from(e)
    })?;
    info!("<- admin responded with: {}", upstream.status.as_u16());

    Ok(relay(upstream))
}
