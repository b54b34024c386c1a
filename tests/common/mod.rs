// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Bytes;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::{extract::State, Json, Router};
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use weight_dashboard::config::Config;
use weight_dashboard::routes::create_router;
use weight_dashboard::services::Session;
use weight_dashboard::AppState;

/// Canned answer for one backend route.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: Value,
    pub delay: Duration,
}

impl Reply {
    pub fn ok(body: Value) -> Self {
        Self::status(200, body)
    }

    pub fn status(status: u16, body: Value) -> Self {
        Self {
            status,
            body,
            delay: Duration::ZERO,
        }
    }

    #[allow(dead_code)]
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// One request as seen by the mock backend.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct RecordedRequest {
    pub method: Method,
    /// Route with the `/api/` prefix removed, e.g. `daily-entries`
    pub route: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

impl RecordedRequest {
    /// First value of a query parameter.
    #[allow(dead_code)]
    pub fn param(&self, key: &str) -> Option<String> {
        self.query.as_deref()?.split('&').find_map(|pair| {
            let (k, v) = pair.split_once('=')?;
            (k == key).then(|| v.to_string())
        })
    }
}

#[derive(Default)]
struct Behavior {
    defaults: HashMap<String, Reply>,
    queued: HashMap<String, VecDeque<Reply>>,
}

#[derive(Clone)]
struct MockState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    behavior: Arc<Mutex<Behavior>>,
}

/// In-process stand-in for the weight-tracker backend.
pub struct MockBackend {
    pub origin: String,
    state: MockState,
}

#[allow(dead_code)]
impl MockBackend {
    pub async fn start() -> Self {
        let mut behavior = Behavior::default();
        for (route, reply) in [
            ("daily-entries", Reply::ok(json!([]))),
            (
                "weekly-aggregates",
                Reply::ok(json!({"weekly_data": [], "goal": "maintain"})),
            ),
            ("summary", Reply::ok(json!({"metrics": null}))),
            ("latest-entry", Reply::ok(Value::Null)),
            (
                "sync-data",
                Reply::ok(json!({"status": "no_new_data", "message": "No new data"})),
            ),
            ("daily-entry", Reply::ok(json!({}))),
        ] {
            behavior.defaults.insert(route.to_string(), reply);
        }

        let state = MockState {
            requests: Arc::new(Mutex::new(Vec::new())),
            behavior: Arc::new(Mutex::new(behavior)),
        };

        let app = Router::new()
            .fallback(handle)
            .with_state(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend");
        let addr = listener.local_addr().expect("mock backend address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock backend");
        });

        Self {
            origin: format!("http://{}", addr),
            state,
        }
    }

    /// Answer every future call to `route` with `reply`.
    pub fn set_reply(&self, route: &str, reply: Reply) {
        self.state
            .behavior
            .lock()
            .unwrap()
            .defaults
            .insert(route.to_string(), reply);
    }

    /// Answer the next call to `route` with `reply`, then fall back.
    pub fn push_reply(&self, route: &str, reply: Reply) {
        self.state
            .behavior
            .lock()
            .unwrap()
            .queued
            .entry(route.to_string())
            .or_default()
            .push_back(reply);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, route: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.route == route)
            .collect()
    }
}

async fn handle(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> axum::response::Response {
    let route = uri
        .path()
        .trim_start_matches('/')
        .trim_start_matches("api/")
        .to_string();

    state.requests.lock().unwrap().push(RecordedRequest {
        method,
        route: route.clone(),
        query: uri.query().map(str::to_string),
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_slice(&body).ok(),
    });

    let reply = {
        let mut behavior = state.behavior.lock().unwrap();
        let queued = behavior
            .queued
            .get_mut(&route)
            .and_then(|queue| queue.pop_front());
        queued.or_else(|| behavior.defaults.get(&route).cloned())
    };

    let Some(reply) = reply else {
        return (StatusCode::NOT_FOUND, Json(json!({"detail": "Not Found"}))).into_response();
    };
    if !reply.delay.is_zero() {
        tokio::time::sleep(reply.delay).await;
    }
    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(reply.body)).into_response()
}

/// A provider-style JWT for `sub`. Unsigned content is all the client reads.
#[allow(dead_code)]
pub fn provider_token(sub: &str) -> String {
    use jsonwebtoken::{encode, EncodingKey, Header};

    encode(
        &Header::default(),
        &json!({"sub": sub, "email": format!("{}@example.com", sub), "exp": 4102444800u64}),
        &EncodingKey::from_secret(b"provider-secret"),
    )
    .expect("encode provider token")
}

/// Dashboard wired to a fresh mock backend and a throwaway storage dir.
pub struct TestApp {
    pub state: Arc<AppState>,
    pub backend: MockBackend,
    pub storage_dir: tempfile::TempDir,
}

#[allow(dead_code)]
impl TestApp {
    pub fn router(&self) -> Router {
        create_router(self.state.clone())
    }

    pub fn sign_in(&self, sub: &str) {
        let session = Session::from_access_token(&provider_token(sub)).expect("valid token");
        self.state.session.sign_in(session);
    }
}

/// Unresolved session; nothing has been fetched.
#[allow(dead_code)]
pub async fn test_app() -> TestApp {
    let backend = MockBackend::start().await;
    let storage_dir = tempfile::tempdir().expect("tempdir");

    let mut config = Config::test_default();
    config.api_base_url = backend.origin.clone();
    config.storage_path = storage_dir.path().join("storage.json");
    config.toast_ttl = Duration::from_secs(60);
    config.session_wait = Duration::from_millis(300);

    let state = Arc::new(AppState::new(config).expect("app state"));
    TestApp {
        state,
        backend,
        storage_dir,
    }
}

/// Test app with user `user-1` signed in.
#[allow(dead_code)]
pub async fn signed_in_app() -> TestApp {
    let app = test_app().await;
    app.sign_in("user-1");
    app
}

/// Poll `condition` until it holds or two seconds pass.
#[allow(dead_code)]
pub async fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}
