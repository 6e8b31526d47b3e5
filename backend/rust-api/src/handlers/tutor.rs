use axum::{extract::State, Json};
use serde_json::Value;
use std::sync::Arc;

use super::ApiError;
use crate::{
    extractors::ValidatedJson,
    models::tutor::{GenerateRequest, SolveRequest},
    services::AppState,
};

/// POST /solve
pub async fn solve_problem(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<SolveRequest>,
) -> Result<Json<Value>, ApiError> {
    let result = state.tutor().solve(&req.question).await?;
    Ok(Json(result))
}

/// POST /generate
pub async fn generate_question(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<GenerateRequest>,
) -> Result<Json<Value>, ApiError> {
    tracing::info!(
        difficulty = %req.difficulty_level,
        problem_type = %req.problem_type,
        "Generating practice question"
    );
    let result = state.tutor().generate(&req).await?;
    Ok(Json(result))
}
