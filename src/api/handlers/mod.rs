//! Gateway request handlers
//!
//! Split into submodules by backend:
//! - `storage`: direct object reads
//! - `admin`: source proxy to the admin service
//! - `cookie`: auth cookie mint endpoint
//! - `status`: favicon and robots.txt

mod admin;
mod cookie;
mod status;
mod storage;

use super::errors::GatewayError;
use super::responses::gateway_response;
use crate::access::{AccessPolicy, AccessRequest, Route};
use crate::auth::OriginPolicy;
use crate::canonical::remove_dot_segments;
use crate::config::{Config, ConfigError};
use crate::storage::ObjectStore;
use crate::upstream::AdminBackend;
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderName, Method, StatusCode, Uri};
use axum::response::Response;
use std::sync::Arc;
use tracing::debug;

pub use admin::get_from_admin;
pub use cookie::cookie_response;
pub use status::{favicon, robots_txt};
pub use storage::get_from_storage;

/// Application state shared across handlers
pub struct AppState {
    /// Informational shared bucket name; reads go to `<org>-content`
    pub bucket_name: String,
    pub admin_url: String,
    pub client_ip_header: HeaderName,
    pub access: AccessPolicy,
    pub origins: OriginPolicy,
    pub storage: Arc<dyn ObjectStore>,
    pub admin: Arc<dyn AdminBackend>,
}

impl AppState {
    pub fn new(
        config: &Config,
        storage: Arc<dyn ObjectStore>,
        admin: Arc<dyn AdminBackend>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            bucket_name: config.bucket_name.clone(),
            admin_url: config.admin_url.clone(),
            client_ip_header: config.client_ip_header_name()?,
            access: config.access_policy(),
            origins: config.origin_policy(),
            storage,
            admin,
        })
    }
}

/// Entry point for every `/<org>/<site>/...` request.
///
/// Dot segments are resolved once here; routing and both backends only ever
/// see the normalized path.
pub async fn dispatch(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Response, GatewayError> {
    let path = remove_dot_segments(uri.path());
    let caller_ip = headers
        .get(&state.client_ip_header)
        .and_then(|v| v.to_str().ok());
    let route = state.access.decide(&AccessRequest::new(&path, caller_ip));
    debug!("{} {} routed to {}", method, path, route.label());

    match route {
        Route::NotFound => Err(GatewayError::NotFound),
        Route::Cookie => Ok(cookie_response(&method, &headers, &state.origins)),
        _ if method == Method::OPTIONS => {
            Ok(gateway_response(StatusCode::OK, Body::empty(), None))
        }
        _ if method != Method::GET => Err(GatewayError::MethodNotAllowed),
        Route::Storage => get_from_storage(&state, &path).await,
        Route::Admin => get_from_admin(&state, &path, uri.query(), &headers).await,
    }
}
