//! Response builders shared by every handler.

use crate::upstream::AdminResponse;
use axum::body::Body;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    CONTENT_DISPOSITION, CONTENT_TYPE,
};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::Response;

pub const TEXT_PLAIN: &str = "text/plain";
pub const SVG_CONTENT_TYPE: &str = "image/svg+xml";

const ROBOTS_BODY: &str = "User-agent: *\nDisallow: /";

/// Headers that describe one hop and must not be relayed.
const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Standard CORS headers for public reads.
pub fn apply_cors(headers: &mut HeaderMap) {
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, OPTIONS"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("authorization"),
    );
}

/// Whether a content type names SVG, ignoring parameters and case.
pub fn is_svg(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case(SVG_CONTENT_TYPE))
}

/// Force SVGs to download so script inside them never runs on this origin.
fn apply_svg_disposition(headers: &mut HeaderMap) {
    let svg = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(is_svg);
    if svg {
        headers.insert(CONTENT_DISPOSITION, HeaderValue::from_static("attachment"));
    }
}

/// Build a response with CORS and the SVG download rule applied.
pub fn gateway_response(status: StatusCode, body: Body, content_type: Option<&str>) -> Response {
    let mut response = Response::new(body);
    *response.status_mut() = status;

    let headers = response.headers_mut();
    if let Some(value) = content_type.and_then(|ct| HeaderValue::from_str(ct).ok()) {
        headers.insert(CONTENT_TYPE, value);
    }
    apply_cors(headers);
    apply_svg_disposition(headers);
    response
}

/// Crawlers are turned away from the whole gateway.
pub fn robots() -> Response {
    gateway_response(
        StatusCode::OK,
        Body::from(ROBOTS_BODY),
        Some("text/plain;charset=UTF-8"),
    )
}

/// Relay an admin answer: its status, body and end-to-end headers.
pub fn relay(upstream: AdminResponse) -> Response {
    let mut response = Response::new(Body::from(upstream.body));
    *response.status_mut() = upstream.status;

    let headers = response.headers_mut();
    for (name, value) in upstream.headers.iter() {
        if !is_hop_by_hop(name) {
            headers.append(name.clone(), value.clone());
        }
    }
    apply_cors(headers);
    apply_svg_disposition(headers);
    response
}

fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP.contains(&name.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn test_is_svg() {
        assert!(is_svg("image/svg+xml"));
        assert!(is_svg("image/svg+xml; charset=utf-8"));
        assert!(is_svg("IMAGE/SVG+XML"));
        assert!(!is_svg("image/png"));
        assert!(!is_svg("text/html"));
        assert!(!is_svg(""));
    }

    #[test]
    fn test_svg_gets_attachment_disposition() {
        let response = gateway_response(StatusCode::OK, Body::empty(), Some("image/svg+xml"));
        assert_eq!(response.headers().get(CONTENT_DISPOSITION).unwrap(), "attachment");

        let response = gateway_response(StatusCode::OK, Body::empty(), Some("image/png"));
        assert!(response.headers().get(CONTENT_DISPOSITION).is_none());
    }

    #[test]
    fn test_cors_headers() {
        let response = gateway_response(StatusCode::NOT_FOUND, Body::empty(), None);
        let headers = response.headers();
        assert_eq!(headers.get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), "*");
        assert_eq!(headers.get(ACCESS_CONTROL_ALLOW_METHODS).unwrap(), "GET, OPTIONS");
        assert_eq!(headers.get(ACCESS_CONTROL_ALLOW_HEADERS).unwrap(), "authorization");
        assert!(headers.get(CONTENT_TYPE).is_none());
    }

    #[test]
    fn test_relay_strips_hop_by_hop_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/html"));
        headers.insert("connection", HeaderValue::from_static("keep-alive"));
        headers.insert("transfer-encoding", HeaderValue::from_static("chunked"));
        headers.insert("etag", HeaderValue::from_static("\"abc\""));

        let response = relay(AdminResponse {
            status: StatusCode::CREATED,
            headers,
            body: Bytes::from_static(b"<html></html>"),
        });

        assert_eq!(response.status(), StatusCode::CREATED);
        let headers = response.headers();
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "text/html");
        assert_eq!(headers.get("etag").unwrap(), "\"abc\"");
        assert!(headers.get("connection").is_none());
        assert!(headers.get("transfer-encoding").is_none());
        assert_eq!(headers.get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), "*");
    }

    #[test]
    fn test_relayed_svg_is_downloaded() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("image/svg+xml"));
        let response = relay(AdminResponse {
            status: StatusCode::OK,
            headers,
            body: Bytes::from_static(b"<svg/>"),
        });
        assert_eq!(response.headers().get(CONTENT_DISPOSITION).unwrap(), "attachment");
    }
}
