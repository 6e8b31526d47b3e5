#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

use mathtutor_api::{
    config::Config,
    create_router,
    services::{
        llm_client::{LlmClient, LlmError},
        plot_executor::{PlotError, PlotExecutor},
        record_store::InMemoryRecordStore,
        seed, AppState,
    },
};

/// LLM double returning a canned reply and remembering the prompts it saw.
pub struct FakeLlm {
    reply: Result<Value, u16>,
    pub prompts: Mutex<Vec<(String, String)>>,
}

impl FakeLlm {
    pub fn replying(reply: Value) -> Self {
        Self {
            reply: Ok(reply),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            reply: Err(status),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn last_user_prompt(&self) -> Option<String> {
        self.prompts
            .lock()
            .unwrap()
            .last()
            .map(|(_, user)| user.clone())
    }
}

#[async_trait]
impl LlmClient for FakeLlm {
    async fn call(&self, system_prompt: &str, user_prompt: &str) -> Result<Value, LlmError> {
        self.prompts
            .lock()
            .unwrap()
            .push((system_prompt.to_string(), user_prompt.to_string()));
        match &self.reply {
            Ok(value) => Ok(value.clone()),
            Err(status) => Err(LlmError::Status {
                status: *status,
                body: "provider error".to_string(),
            }),
        }
    }
}

/// Sandbox double: echoes the code back, or fails when built with `down()`.
pub struct FakePlotter {
    available: bool,
}

impl FakePlotter {
    pub fn up() -> Self {
        Self { available: true }
    }

    pub fn down() -> Self {
        Self { available: false }
    }
}

#[async_trait]
impl PlotExecutor for FakePlotter {
    async fn execute(&self, code: &str) -> Result<Value, PlotError> {
        if !self.available {
            return Err(PlotError::Status {
                status: 503,
                body: "sandbox offline".to_string(),
            });
        }
        Ok(serde_json::json!({
            "success": true,
            "image": "iVBORw0KGgo=",
            "code": code,
        }))
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryRecordStore>,
    pub llm: Arc<FakeLlm>,
}

impl TestApp {
    pub fn new(llm: FakeLlm, plotter: FakePlotter) -> Self {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();

        let store = Arc::new(InMemoryRecordStore::new());
        let llm = Arc::new(llm);
        let state = AppState::from_parts(
            Config::default(),
            store.clone(),
            llm.clone(),
            Arc::new(plotter),
        );

        Self {
            router: create_router(Arc::new(state)),
            store,
            llm,
        }
    }

    /// Empty log, LLM answering `{"success": true}`.
    pub fn empty() -> Self {
        Self::new(
            FakeLlm::replying(serde_json::json!({ "success": true })),
            FakePlotter::up(),
        )
    }

    /// Log preloaded with the sample attempts.
    pub async fn seeded() -> Self {
        let app = Self::empty();
        seed::seed_if_empty(app.store.as_ref())
            .await
            .expect("seed sample data");
        app
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
        )
        .await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, json)
    }
}
