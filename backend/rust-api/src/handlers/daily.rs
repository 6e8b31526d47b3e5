use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use super::ApiError;
use crate::{
    extractors::AppJson,
    models::{
        question::{DailyQuery, DailySubmitRequest, DailySubmitResponse},
        DailyQuestionResponse, Strategy,
    },
    services::AppState,
};

/// GET /daily?strategy=weak|balanced|random
pub async fn get_daily_question(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DailyQuery>,
) -> Result<Json<DailyQuestionResponse>, ApiError> {
    let strategy = query
        .strategy
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(Strategy::DEFAULT_NAME);

    let response = state.recommender().get_daily_question(strategy).await?;
    Ok(Json(response))
}

/// POST /daily/submit - acknowledges the answer without grading it
pub async fn submit_daily_answer(
    AppJson(req): AppJson<DailySubmitRequest>,
) -> Json<DailySubmitResponse> {
    tracing::info!(
        question_id = req.question_id,
        answer_len = req.answer.chars().count(),
        "Daily answer submitted"
    );

    Json(DailySubmitResponse {
        success: true,
        correct: true,
        feedback: "答案正确".to_string(),
    })
}
