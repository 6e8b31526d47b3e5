use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use crate::config::SandboxConfig;

#[derive(Debug, thiserror::Error)]
pub enum PlotError {
    #[error("Plot sandbox request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Plot sandbox returned status {status}: {body}")]
    Status { status: u16, body: String },
}

/// Runs plotting code in an isolated sandbox.
#[async_trait]
pub trait PlotExecutor: Send + Sync {
    async fn execute(&self, code: &str) -> Result<Value, PlotError>;
}

/// HTTP client for the sandbox service (`POST {url}/execute`).
pub struct SandboxPlotExecutor {
    http_client: Client,
    url: String,
}

impl SandboxPlotExecutor {
    pub fn new(config: &SandboxConfig) -> Result<Self, PlotError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http_client,
            url: config.url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl PlotExecutor for SandboxPlotExecutor {
    async fn execute(&self, code: &str) -> Result<Value, PlotError> {
        let response = self
            .http_client
            .post(format!("{}/execute", self.url))
            .json(&json!({ "code": code }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PlotError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}
