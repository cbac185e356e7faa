//! In-process stand-in for the Qase REST API
//!
//! Serves `/v1/suite/{code}` and `/v1/case/{code}` on an ephemeral port,
//! records every created case and can be told to fail requests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use qase_bulk::api::QaseClient;

pub const TOKEN: &str = "test-token";
pub const PROJECT: &str = "DEMO";

/// Titles containing this are refused with a 422
pub const REJECT_MARKER: &str = "[reject]";

#[derive(Default)]
pub struct FakeQase {
    pub suites: Mutex<Vec<Value>>,
    pub cases: Mutex<Vec<Value>>,
    /// Requests to the case endpoint, including rejected ones
    pub case_requests: AtomicUsize,
    /// Answer this many case requests with 429 before accepting
    pub rate_limit_first: AtomicUsize,
    /// `Retry-After` seconds sent with each 429
    pub retry_after_secs: AtomicUsize,
    /// Answer every case request with this status
    pub fail_cases_with: Mutex<Option<StatusCode>>,
}

impl FakeQase {
    pub fn with_suites(count: usize) -> Self {
        let suites = (1..=count)
            .map(|i| {
                json!({
                    "id": i,
                    "title": format!("Suite {}", i),
                    "description": null,
                    "parent_id": null,
                    "cases_count": i % 4,
                })
            })
            .collect();
        Self {
            suites: Mutex::new(suites),
            ..Default::default()
        }
    }

    pub fn created_cases(&self) -> Vec<Value> {
        self.cases.lock().unwrap().clone()
    }
}

pub struct TestServer {
    pub base_url: String,
    pub state: Arc<FakeQase>,
}

impl TestServer {
    pub async fn start(state: FakeQase) -> Self {
        let state = Arc::new(state);
        let app = Router::new()
            .route("/v1/suite/:code", get(list_suites).post(create_suite))
            .route("/v1/case/:code", post(create_case))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}/v1", addr),
            state,
        }
    }

    /// Client with fast retries, authenticated with `token`
    pub fn client_with_token(&self, token: &str) -> QaseClient {
        QaseClient::new(&self.base_url, token, PROJECT, Duration::from_secs(5))
            .unwrap()
            .with_retry_config(3, Duration::from_millis(10))
    }

    pub fn client(&self) -> QaseClient {
        self.client_with_token(TOKEN)
    }
}

fn ok(result: Value) -> Response {
    Json(json!({ "status": true, "result": result })).into_response()
}

fn fail(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({ "status": false, "errorMessage": message })),
    )
        .into_response()
}

fn check_request(headers: &HeaderMap, code: &str) -> Option<Response> {
    let token = headers.get("Token").and_then(|v| v.to_str().ok());
    if token != Some(TOKEN) {
        return Some(fail(StatusCode::UNAUTHORIZED, "Unauthenticated."));
    }
    if code != PROJECT {
        return Some(fail(StatusCode::NOT_FOUND, "Project not found"));
    }
    None
}

async fn list_suites(
    State(state): State<Arc<FakeQase>>,
    Path(code): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    if let Some(rejection) = check_request(&headers, &code) {
        return rejection;
    }

    let limit: usize = query.get("limit").and_then(|v| v.parse().ok()).unwrap_or(10);
    let offset: usize = query.get("offset").and_then(|v| v.parse().ok()).unwrap_or(0);

    let suites = state.suites.lock().unwrap();
    let page: Vec<Value> = suites.iter().skip(offset).take(limit).cloned().collect();
    ok(json!({
        "total": suites.len(),
        "filtered": suites.len(),
        "count": page.len(),
        "entities": page,
    }))
}

async fn create_suite(
    State(state): State<Arc<FakeQase>>,
    Path(code): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Some(rejection) = check_request(&headers, &code) {
        return rejection;
    }

    let mut suites = state.suites.lock().unwrap();
    let id = suites.len() + 1;
    suites.push(json!({
        "id": id,
        "title": body["title"],
        "description": body.get("description").cloned().unwrap_or(Value::Null),
        "parent_id": null,
        "cases_count": 0,
    }));
    ok(json!({ "id": id }))
}

async fn create_case(
    State(state): State<Arc<FakeQase>>,
    Path(code): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.case_requests.fetch_add(1, Ordering::SeqCst);

    if let Some(rejection) = check_request(&headers, &code) {
        return rejection;
    }

    let throttled = state
        .rate_limit_first
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok();
    if throttled {
        let retry_after = state.retry_after_secs.load(Ordering::SeqCst).to_string();
        return (
            StatusCode::TOO_MANY_REQUESTS,
            [("Retry-After", retry_after)],
            "Too Many Requests",
        )
            .into_response();
    }

    if let Some(status) = *state.fail_cases_with.lock().unwrap() {
        return fail(status, "Internal error");
    }

    if body["title"].as_str().is_some_and(|t| t.contains(REJECT_MARKER)) {
        return fail(StatusCode::UNPROCESSABLE_ENTITY, "Title is invalid");
    }

    let mut cases = state.cases.lock().unwrap();
    cases.push(body);
    ok(json!({ "id": cases.len() }))
}
