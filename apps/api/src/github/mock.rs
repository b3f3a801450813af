//! In-process fake of the GitHub REST API for tests.
//!
//! Responses are keyed by path, or by `path?page=N` for paginated endpoints.
//! Every request path is recorded so tests can assert what was (not) fetched.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{json, Value};

use crate::github::{FetchSettings, GitHubClient};

#[derive(Clone)]
enum MockResponse {
    Json(Value),
    Status(u16),
    Delayed(Duration, Value),
}

#[derive(Clone, Default)]
struct MockState {
    responses: Arc<HashMap<String, MockResponse>>,
    requests: Arc<Mutex<Vec<String>>>,
}

#[derive(Default)]
pub struct MockGitHub {
    responses: HashMap<String, MockResponse>,
    settings: FetchSettings,
}

/// Handle kept by the test to inspect recorded requests.
pub struct MockHandle {
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockHandle {
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn was_requested(&self, path: &str) -> bool {
        self.requests().iter().any(|p| p == path)
    }
}

impl MockGitHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn json(mut self, path: &str, body: Value) -> Self {
        self.responses.insert(path.to_string(), MockResponse::Json(body));
        self
    }

    pub fn page(mut self, path: &str, page: u32, body: Value) -> Self {
        self.responses
            .insert(format!("{path}?page={page}"), MockResponse::Json(body));
        self
    }

    pub fn status(mut self, path: &str, status: u16) -> Self {
        self.responses
            .insert(path.to_string(), MockResponse::Status(status));
        self
    }

    pub fn delayed(mut self, path: &str, delay: Duration, body: Value) -> Self {
        self.responses
            .insert(path.to_string(), MockResponse::Delayed(delay, body));
        self
    }

    /// Serves a repository file through the contents endpoint.
    pub fn file(self, owner: &str, repo: &str, path: &str, text: &str) -> Self {
        let route = format!("/repos/{owner}/{repo}/contents/{path}");
        self.json(&route, content_body(text))
    }

    pub fn settings(mut self, settings: FetchSettings) -> Self {
        self.settings = settings;
        self
    }

    pub async fn serve(self) -> (GitHubClient, MockHandle) {
        let state = MockState {
            responses: Arc::new(self.responses),
            requests: Arc::new(Mutex::new(Vec::new())),
        };
        let handle = MockHandle {
            requests: state.requests.clone(),
        };
        let app = Router::new().fallback(respond).with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = GitHubClient::new(format!("http://{addr}"), self.settings).unwrap();
        (client, handle)
    }
}

/// A contents-endpoint payload: base64 wrapped at 60 columns, as GitHub does.
pub fn content_body(text: &str) -> Value {
    let encoded = STANDARD.encode(text.as_bytes());
    let wrapped: Vec<String> = encoded
        .as_bytes()
        .chunks(60)
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect();
    json!({
        "type": "file",
        "encoding": "base64",
        "size": text.len(),
        "content": wrapped.join("\n"),
    })
}

async fn respond(State(state): State<MockState>, uri: Uri) -> Response {
    let path = uri.path().to_string();
    let page = uri
        .query()
        .and_then(|q| q.split('&').find_map(|kv| kv.strip_prefix("page=")))
        .unwrap_or("1")
        .to_string();
    state.requests.lock().unwrap().push(path.clone());

    let response = state
        .responses
        .get(&format!("{path}?page={page}"))
        .or_else(|| state.responses.get(&path))
        .cloned();

    match response {
        None => StatusCode::NOT_FOUND.into_response(),
        Some(MockResponse::Json(body)) => Json(body).into_response(),
        Some(MockResponse::Status(code)) => StatusCode::from_u16(code).unwrap().into_response(),
        Some(MockResponse::Delayed(delay, body)) => {
            tokio::time::sleep(delay).await;
            Json(body).into_response()
        }
    }
}
