//! Auth cookie mint endpoint (`/<org>/<site>/.gimme_cookie`).

use super::GatewayError;
use crate::api::responses::{gateway_response, TEXT_PLAIN};
use crate::auth::{mint_cookie, OriginPolicy};
use axum::body::Body;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, AUTHORIZATION, CONTENT_TYPE, ORIGIN, SET_COOKIE,
};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::{debug, warn};

/// Answer a cookie mint request.
///
/// The origin check runs first and fails closed, before the method is even
/// looked at.
pub fn cookie_response(method: &Method, headers: &HeaderMap, origins: &OriginPolicy) -> Response {
    let origin = headers.get(ORIGIN).and_then(|v| v.to_str().ok());
    let Some(origin) = origin.filter(|o| origins.is_trusted(Some(*o))) else {
        warn!(origin = ?origin, "cookie mint from untrusted origin");
        return GatewayError::Forbidden.into_response();
    };

    if *method == Method::OPTIONS {
        return credentialed(origin, Body::empty());
    }
    if *method != Method::GET {
        return GatewayError::MethodNotAllowed.into_response();
    }

    let cookie = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(mint_cookie)
        .and_then(|c| HeaderValue::from_str(&c).ok());

    match cookie {
        Some(cookie) => {
            debug!(origin, "auth cookie minted");
            let mut response = credentialed(origin, Body::from("cookie set"));
            response.headers_mut().insert(SET_COOKIE, cookie);
            response
        }
        None => GatewayError::Unauthorized.into_response(),
    }
}

/// 200 with CORS headers scoped to the calling origin, credentials allowed.
fn credentialed(origin: &str, body: Body) -> Response {
    let mut response = gateway_response(StatusCode::OK, body, Some(TEXT_PLAIN));
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(origin) {
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, value);
    }
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, OPTIONS"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Authorization, Content-Type"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(TEXT_PLAIN));
    response
}
