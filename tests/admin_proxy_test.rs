//! Admin proxy tests: canonical URL, credential forwarding and relaying.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{assert_cors, body_string, MockAdmin, MockStore, TestGateway};

fn gateway(admin: MockAdmin) -> TestGateway {
    TestGateway::with_allow_list(MockStore::default(), admin)
}

fn ok_admin() -> MockAdmin {
    MockAdmin::answering(StatusCode::OK, &[("content-type", "text/html")], "<html></html>")
}

#[tokio::test]
async fn test_fetches_canonical_source_url() {
    let gw = gateway(ok_admin());
    gw.get("/Org/Site/My_Page").await;

    let calls = gw.admin.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "https://admin.da.live/source/org/site/mypage.html");
}

#[tokio::test]
async fn test_folder_request_maps_to_index() {
    let gw = gateway(ok_admin());
    gw.get("/org/site/docs/").await;
    assert_eq!(
        gw.admin.calls()[0].0,
        "https://admin.da.live/source/org/site/docs/index.html"
    );
}

#[tokio::test]
async fn test_cookie_token_wins() {
    let gw = gateway(ok_admin());
    let request = Request::get("/org/site/page?token=from-query")
        .header("cookie", "theme=dark; auth_token=from-cookie")
        .header("authorization", "Bearer from-header")
        .body(Body::empty())
        .unwrap();
    gw.send(request).await;

    let (url, headers) = &gw.admin.calls()[0];
    assert_eq!(url, "https://admin.da.live/source/org/site/page.html");
    assert_eq!(headers.get("authorization").unwrap(), "Bearer from-cookie");
}

#[tokio::test]
async fn test_authorization_header_passed_through() {
    let gw = gateway(ok_admin());
    let request = Request::get("/org/site/page?token=from-query")
        .header("authorization", "Bearer from-header")
        .body(Body::empty())
        .unwrap();
    gw.send(request).await;
    assert_eq!(
        gw.admin.calls()[0].1.get("authorization").unwrap(),
        "Bearer from-header"
    );
}

#[tokio::test]
async fn test_query_token_wrapped_as_bearer() {
    let gw = gateway(ok_admin());
    gw.get("/org/site/page?token=from-query").await;
    assert_eq!(
        gw.admin.calls()[0].1.get("authorization").unwrap(),
        "Bearer from-query"
    );
}

#[tokio::test]
async fn test_no_credentials_no_header() {
    let gw = gateway(ok_admin());
    let request = Request::get("/org/site/page")
        .header("x-custom", "not forwarded")
        .body(Body::empty())
        .unwrap();
    gw.send(request).await;
    let headers = &gw.admin.calls()[0].1;
    assert!(headers.get("authorization").is_none());
    assert!(headers.get("x-custom").is_none());
}

#[tokio::test]
async fn test_admin_status_and_headers_relayed() {
    let admin = MockAdmin::answering(
        StatusCode::UNAUTHORIZED,
        &[("content-type", "application/json"), ("x-request-id", "abc")],
        "{\"error\":\"unauthorized\"}",
    );
    let gw = gateway(admin);
    let response = gw.get("/org/site/page").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers().get("content-type").unwrap(), "application/json");
    assert_eq!(response.headers().get("x-request-id").unwrap(), "abc");
    assert_cors(&response);
    assert_eq!(body_string(response).await, "{\"error\":\"unauthorized\"}");
}

#[tokio::test]
async fn test_admin_svg_is_an_attachment() {
    let admin = MockAdmin::answering(
        StatusCode::OK,
        &[("content-type", "image/svg+xml; charset=utf-8")],
        "<svg/>",
    );
    let gw = gateway(admin);
    let response = gw.get("/org/site/drawing.svg.html").await;
    assert_eq!(response.headers().get("content-disposition").unwrap(), "attachment");
}

#[tokio::test]
async fn test_admin_transport_failure_is_503() {
    let gw = gateway(MockAdmin::unreachable());
    let response = gw.get("/org/site/page").await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        response.headers().get("x-error").unwrap(),
        "Failed to fetch from admin"
    );
    assert_cors(&response);
    assert!(body_string(response).await.is_empty());
    assert_eq!(gw.admin.calls().len(), 1);
}

#[tokio::test]
async fn test_dot_segments_resolved_before_canonicalizing() {
    let gw = gateway(ok_admin());
    gw.get("/org/site/drafts/../page?token=t").await;
    let (url, headers) = &gw.admin.calls()[0];
    assert_eq!(url, "https://admin.da.live/source/org/site/page.html");
    assert_eq!(headers.get("authorization").unwrap(), "Bearer t");
}
