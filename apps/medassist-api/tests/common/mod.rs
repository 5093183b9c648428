//! Shared helpers for router-level tests

#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use medassist_api::{
    config::Config,
    routes::{default_mounts, Mount},
    store::DocumentBackend,
    Application,
};
use medassist_domain::{
    crm::CrmError, ports::CrmForwarder, storage::MemoryDocumentStore, ReceptionRecord,
};
use serde_json::Value;
use tower::ServiceExt;

pub const FRONTEND: &str = "https://app.example.com";
pub const SECRET: &str = "test-secret-test-secret-test-secret-42";

pub fn config_with(overrides: &[(&str, &str)]) -> Config {
    let overrides: Vec<(String, String)> = overrides
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    Config::from_lookup(move |key: &str| {
        if let Some((_, value)) = overrides.iter().find(|(k, _)| k == key) {
            return Some(value.clone());
        }
        match key {
            "FRONTEND_URLS" => Some(FRONTEND.to_string()),
            "SECRET_KEY" => Some(SECRET.to_string()),
            "DOCUMENT_STORE" => Some("memory".to_string()),
            "CRM_BACKOFF_MS" => Some("1".to_string()),
            _ => None,
        }
    })
    .unwrap()
}

pub fn test_config() -> Config {
    config_with(&[])
}

/// Forwarder remembering every record it was given
#[derive(Clone, Default)]
pub struct RecordingForwarder {
    records: Arc<Mutex<Vec<ReceptionRecord>>>,
}

impl RecordingForwarder {
    pub fn records(&self) -> Vec<ReceptionRecord> {
        self.records.lock().unwrap().clone()
    }
}

impl CrmForwarder for RecordingForwarder {
    async fn push(&self, record: &ReceptionRecord) -> Result<(), CrmError> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

/// Forwarder whose CRM is always down
#[derive(Clone, Default)]
pub struct FailingForwarder {
    calls: Arc<AtomicUsize>,
}

impl FailingForwarder {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CrmForwarder for FailingForwarder {
    async fn push(&self, _record: &ReceptionRecord) -> Result<(), CrmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(CrmError::rejected(503, "Kommo is down"))
    }
}

pub struct TestApp {
    pub app: Application,
    pub store: MemoryDocumentStore,
    pub router: Router,
}

pub async fn spawn_app_with<F>(config: Config, forwarder: F, mounts: Vec<Mount>) -> TestApp
where
    F: CrmForwarder + 'static,
{
    let store = MemoryDocumentStore::new();
    let app = Application::build(&config, DocumentBackend::from(store.clone()), forwarder, mounts)
        .await
        .unwrap_or_else(|err| panic!("application failed to build: {err}"));
    let router = app.router();

    TestApp { app, store, router }
}

pub async fn spawn_app<F: CrmForwarder + 'static>(forwarder: F) -> TestApp {
    spawn_app_with(test_config(), forwarder, default_mounts()).await
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub async fn send(router: &Router, request: Request<Body>) -> TestResponse {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    TestResponse {
        status,
        headers,
        body,
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn reception_body(user_id: &str, name: &str) -> Value {
    serde_json::json!({
        "user_id": user_id,
        "name": name,
        "phone": "+34 600 123 456",
        "reason": "Question about my invoice"
    })
}

/// Assert the uniform error envelope and return its detail
pub fn assert_envelope(response: &TestResponse, status: StatusCode, kind: &str) -> String {
    assert_eq!(response.status, status, "body: {}", response.body);
    assert_eq!(response.body["success"], Value::Bool(false));
    assert_eq!(response.body["error"]["type"], kind);
    assert_eq!(response.body["error"]["status_code"], status.as_u16());
    response.body["error"]["detail"]
        .as_str()
        .unwrap_or_default()
        .to_string()
}
