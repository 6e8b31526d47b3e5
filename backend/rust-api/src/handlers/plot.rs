use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use super::ApiError;
use crate::{
    extractors::ValidatedJson,
    metrics::PLOT_EXECUTIONS_TOTAL,
    models::tutor::{PlotExecuteRequest, PlotGenerateRequest},
    services::AppState,
};

/// POST /plot/execute - sandbox failures are reported in the body, not the status
pub async fn execute_plot(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<PlotExecuteRequest>,
) -> Json<Value> {
    match state.plotter.execute(&req.code).await {
        Ok(result) => {
            let status = if result.get("success").and_then(Value::as_bool) == Some(false) {
                "failed"
            } else {
                "success"
            };
            PLOT_EXECUTIONS_TOTAL.with_label_values(&[status]).inc();
            Json(result)
        }
        Err(e) => {
            PLOT_EXECUTIONS_TOTAL.with_label_values(&["error"]).inc();
            tracing::warn!(error = %e, "Plot execution failed");
            Json(json!({ "success": false, "error": e.to_string() }))
        }
    }
}

/// POST /plot/generate
pub async fn generate_plot_code(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<PlotGenerateRequest>,
) -> Result<Json<Value>, ApiError> {
    let result = state.tutor().generate_plot_code(&req.description).await?;
    Ok(Json(result))
}
