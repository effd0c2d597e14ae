//! Shared test infrastructure for integration tests
//!
//! Provides an in-process gateway wired to mock storage and admin backends
//! that record every call they receive.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use bytes::Bytes;
use edge_gateway::api::{router, AppState};
use edge_gateway::config::Config;
use edge_gateway::storage::{ObjectStore, StorageError, StoredObject};
use edge_gateway::upstream::{AdminBackend, AdminError, AdminResponse};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

/// Egress address of the publish pipeline, trusted by default.
pub const TRUSTED_IP: &str = "3.227.118.73";

/// In-memory object store keyed by (bucket, key)
#[derive(Default)]
pub struct MockStore {
    objects: Mutex<HashMap<(String, String), StoredObject>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl MockStore {
    pub fn put(&self, bucket: &str, key: &str, body: &'static str, content_type: Option<&str>) {
        self.objects.lock().unwrap().insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                body: Bytes::from_static(body.as_bytes()),
                content_type: content_type.map(str::to_string),
            },
        );
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for MockStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<StoredObject, StorageError> {
        self.calls
            .lock()
            .unwrap()
            .push((bucket.to_string(), key.to_string()));
        self.objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| StorageError::NotFound(format!("{}/{}", bucket, key)))
    }
}

/// Admin service stand-in. Answers every fetch with the configured response,
/// or a transport failure when none is set.
#[derive(Default)]
pub struct MockAdmin {
    response: Mutex<Option<AdminResponse>>,
    calls: Mutex<Vec<(String, HeaderMap)>>,
}

impl MockAdmin {
    pub fn answering(status: StatusCode, headers: &[(&'static str, &'static str)], body: &'static str) -> Self {
        let mut map = HeaderMap::new();
        for (name, value) in headers {
            map.append(*name, value.parse().unwrap());
        }
        Self {
            response: Mutex::new(Some(AdminResponse {
                status,
                headers: map,
                body: Bytes::from_static(body.as_bytes()),
            })),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn unreachable() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<(String, HeaderMap)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AdminBackend for MockAdmin {
    async fn fetch(&self, url: &str, headers: HeaderMap) -> Result<AdminResponse, AdminError> {
        self.calls.lock().unwrap().push((url.to_string(), headers));
        self.response
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| AdminError::Transport("connection refused".to_string()))
    }
}

/// A gateway router plus handles on its backends
pub struct TestGateway {
    pub app: Router,
    pub store: Arc<MockStore>,
    pub admin: Arc<MockAdmin>,
}

impl TestGateway {
    pub fn new(config: Config, store: MockStore, admin: MockAdmin) -> Self {
        let store = Arc::new(store);
        let admin = Arc::new(admin);
        let state = AppState::new(&config, store.clone(), admin.clone()).unwrap();
        Self {
            app: router(Arc::new(state)),
            store,
            admin,
        }
    }

    /// Default configuration with `org1` allow-listed for storage reads
    pub fn with_allow_list(store: MockStore, admin: MockAdmin) -> Self {
        let config = Config {
            admin_excepted_orgs: vec!["org1".to_string()],
            ..Config::default()
        };
        Self::new(config, store, admin)
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.app.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, path: &str) -> Response {
        self.send(Request::get(path).body(Body::empty()).unwrap()).await
    }
}

pub async fn body_string(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Assert the standard public CORS headers are present
pub fn assert_cors(response: &Response) {
    let headers = response.headers();
    assert_eq!(headers.get("access-control-allow-origin").unwrap(), "*");
    assert_eq!(headers.get("access-control-allow-methods").unwrap(), "GET, OPTIONS");
    assert_eq!(headers.get("access-control-allow-headers").unwrap(), "authorization");
}
