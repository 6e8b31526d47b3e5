use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use crate::config::LlmConfig;
use crate::utils::retry::{retry_async_when, RetryConfig};

const PROXY_ENV_KEYS: [&str; 4] = ["OPENAI_PROXY", "HTTPS_PROXY", "HTTP_PROXY", "ALL_PROXY"];

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("LLM API key is not configured")]
    MissingApiKey,
    #[error("LLM request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("LLM provider returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("LLM response is malformed: {0}")]
    InvalidResponse(String),
}

impl LlmError {
    /// Timeouts, connection failures, rate limiting and provider 5xx.
    pub fn is_transient(&self) -> bool {
        match self {
            LlmError::Transport(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            LlmError::Status { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS.as_u16() || *status >= 500
            }
            LlmError::MissingApiKey | LlmError::InvalidResponse(_) => false,
        }
    }
}

/// Prompt in, structured JSON out.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn call(&self, system_prompt: &str, user_prompt: &str) -> Result<Value, LlmError>;
}

/// OpenAI-compatible chat completions client.
pub struct OpenAiClient {
    http_client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    retry: RetryConfig,
}

impl OpenAiClient {
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let mut builder = Client::builder().timeout(Duration::from_secs(config.timeout_secs));
        if let Some(proxy) = proxy_from_env(|key| std::env::var(key).ok()) {
            tracing::info!("Routing LLM requests through proxy");
            builder = builder.proxy(reqwest::Proxy::all(&proxy)?);
        }

        Ok(Self {
            http_client: builder.build()?,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            retry: RetryConfig::with_attempts(config.max_attempts as usize),
        })
    }

    async fn complete(&self, api_key: &str, body: &Value) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: Value = response.json().await?;
        payload["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| LlmError::InvalidResponse("missing choices[0].message.content".into()))
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn call(&self, system_prompt: &str, user_prompt: &str) -> Result<Value, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": user_prompt },
            ],
            "response_format": { "type": "json_object" },
            "temperature": 0.3,
        });

        let content = retry_async_when(
            self.retry.clone(),
            LlmError::is_transient,
            || self.complete(api_key, &body),
        )
        .await
        .map_err(|e| {
            tracing::error!(error = %e, model = %self.model, "LLM call failed");
            e
        })?;

        Ok(parse_content(&content))
    }
}

/// First non-empty proxy variable, in priority order.
pub fn proxy_from_env<F>(lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    PROXY_ENV_KEYS
        .iter()
        .filter_map(|key| lookup(key))
        .find(|value| !value.trim().is_empty())
}

/// Parses model output as JSON. A surrounding markdown code fence is removed
/// first. Unparseable output is wrapped as `{success: false, error, raw}`.
pub fn parse_content(content: &str) -> Value {
    let stripped = strip_code_fence(content);
    match serde_json::from_str::<Value>(stripped) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "LLM output is not valid JSON");
            json!({
                "success": false,
                "error": format!("Failed to parse model output as JSON: {}", e),
                "raw": content,
            })
        }
    }
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // drop the language tag line
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}
