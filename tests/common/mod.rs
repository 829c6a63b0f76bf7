use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use tempfile::TempDir;
use tower::ServiceExt;

use quickchat::error::{QuickchatError, Result};
use quickchat::gateway::CompletionGateway;
use quickchat::http::{build_router, AppState};
use quickchat::providers::Provider;
use quickchat::storage::HistoryStore;

/// What the stub provider does when asked for a completion
#[allow(dead_code)]
#[derive(Clone)]
pub enum Behavior {
    Reply(String),
    Delayed(Duration, String),
    Fail,
    Panic,
}

/// Provider double that records every prompt it receives
pub struct StubProvider {
    behavior: Behavior,
    prompts: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl StubProvider {
    pub fn new(behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn replying(text: &str) -> Arc<Self> {
        Self::new(Behavior::Reply(text.to_string()))
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for StubProvider {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.behavior {
            Behavior::Reply(text) => Ok(text.clone()),
            Behavior::Delayed(delay, text) => {
                tokio::time::sleep(*delay).await;
                Ok(text.clone())
            }
            Behavior::Fail => Err(QuickchatError::Provider("service unavailable".into()).into()),
            Behavior::Panic => panic!("provider exploded"),
        }
    }

    fn model(&self) -> String {
        "stub".to_string()
    }
}

/// Router wired to a temp history file and the given provider
pub struct TestApp {
    pub router: Router,
    pub history_path: PathBuf,
    _dir: TempDir,
}

#[allow(dead_code)]
impl TestApp {
    pub fn new(provider: Arc<StubProvider>) -> Self {
        let dir = TempDir::new().expect("failed to create tempdir");
        let history_path = dir.path().join("chat_history.json");
        let state = AppState::new(
            HistoryStore::new(&history_path),
            CompletionGateway::new(provider),
        );
        Self {
            router: build_router(state),
            history_path,
            _dir: dir,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("request failed")
    }

    pub async fn get_json(&self, uri: &str) -> (u16, serde_json::Value) {
        let response = self
            .send(Request::get(uri).body(Body::empty()).unwrap())
            .await;
        let status = response.status().as_u16();
        (status, body_json(response).await)
    }

    pub async fn post_json(&self, uri: &str, body: serde_json::Value) -> (u16, serde_json::Value) {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = self.send(request).await;
        let status = response.status().as_u16();
        (status, body_json(response).await)
    }

    pub async fn post_form(&self, uri: &str, body: &str) -> Response<Body> {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Raw contents of the history document on disk
    pub fn history_on_disk(&self) -> serde_json::Value {
        let raw = std::fs::read_to_string(&self.history_path).expect("history file missing");
        serde_json::from_str(&raw).expect("history file is not JSON")
    }
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse JSON")
}
