use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose, Engine as _};
use serde_json::json;
use std::sync::Arc;

use crate::metrics;
use crate::services::{record_store::RecordStoreError, tutor_service::TutorError, AppState};

pub mod daily;
pub mod memory;
pub mod plot;
pub mod statistics;
pub mod tutor;

pub const SERVICE_NAME: &str = "mathtutor-api";

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    /// Upstream model provider failed.
    BadGateway(String),
    Unavailable(String),
    Internal(String),
}

impl From<RecordStoreError> for ApiError {
    fn from(err: RecordStoreError) -> Self {
        match err {
            RecordStoreError::Unavailable(_) => ApiError::Unavailable(err.to_string()),
            RecordStoreError::Corrupt(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<RecordStoreError>() {
            Ok(store_err) => store_err.into(),
            Err(err) => ApiError::Internal(format!("{:#}", err)),
        }
    }
}

impl From<TutorError> for ApiError {
    fn from(err: TutorError) -> Self {
        match err {
            TutorError::Llm(e) => ApiError::BadGateway(e.to_string()),
            TutorError::Store(e) => e.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ApiError::BadGateway(message) => (StatusCode::BAD_GATEWAY, message),
            ApiError::Unavailable(message) => (StatusCode::SERVICE_UNAVAILABLE, message),
            ApiError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), %detail, "Request failed");
        }
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

pub async fn root() -> impl IntoResponse {
    Json(json!({
        "message": "Math Tutor API Server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound("Not Found".to_string())
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let store_health = check_record_store(&state).await;
    let healthy = store_health.get("status").and_then(|v| v.as_str()) == Some("healthy");

    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(json!({
            "status": if healthy { "healthy" } else { "degraded" },
            "service": SERVICE_NAME,
            "version": env!("CARGO_PKG_VERSION"),
            "dependencies": { "record_store": store_health }
        })),
    )
}

async fn check_record_store(state: &AppState) -> serde_json::Map<String, serde_json::Value> {
    let mut result = serde_json::Map::new();
    result.insert("backend".to_string(), json!(state.records.backend_name()));

    match tokio::time::timeout(std::time::Duration::from_secs(1), state.records.ping()).await {
        Ok(Ok(())) => {
            result.insert("status".to_string(), json!("healthy"));
        }
        Ok(Err(e)) => {
            result.insert("status".to_string(), json!("unhealthy"));
            result.insert("error".to_string(), json!(e.to_string()));
        }
        Err(_) => {
            result.insert("status".to_string(), json!("unhealthy"));
            result.insert("error".to_string(), json!("Record store timeout after 1s"));
        }
    }

    result
}

pub async fn metrics_handler() -> impl IntoResponse {
    match metrics::render_metrics() {
        Ok(metrics_text) => (StatusCode::OK, metrics_text),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to render metrics: {}", e),
        ),
    }
}

/// Protects /metrics with HTTP Basic Auth against `METRICS_AUTH` (`user:password`)
pub async fn metrics_auth_middleware(
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let expected = std::env::var("METRICS_AUTH").unwrap_or_else(|_| "admin:changeme".to_string());
    if !basic_credentials_match(auth_header, &expected) {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(next.run(request).await)
}

fn basic_credentials_match(auth_header: &str, expected: &str) -> bool {
    let Some(encoded) = auth_header.strip_prefix("Basic ") else {
        return false;
    };
    general_purpose::STANDARD
        .decode(encoded.trim())
        .ok()
        .and_then(|decoded| String::from_utf8(decoded).ok())
        .is_some_and(|credentials| credentials == expected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_auth_header_is_decoded() {
        let header = format!("Basic {}", general_purpose::STANDARD.encode("admin:secret"));
        assert!(basic_credentials_match(&header, "admin:secret"));
        assert!(!basic_credentials_match(&header, "admin:other"));
        assert!(!basic_credentials_match("Bearer abc", "admin:secret"));
        assert!(!basic_credentials_match("Basic !!!", "admin:secret"));
    }

    #[test]
    fn store_errors_map_to_status_codes() {
        let response =
            ApiError::from(RecordStoreError::Unavailable("down".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = ApiError::from(anyhow::Error::new(RecordStoreError::Corrupt(
            "bad".to_string(),
        )))
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
