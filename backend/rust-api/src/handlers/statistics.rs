use axum::{extract::State, Json};
use std::sync::Arc;

use super::ApiError;
use crate::{models::DashboardStatistics, services::AppState};

/// GET /statistics
pub async fn get_statistics(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DashboardStatistics>, ApiError> {
    let statistics = state.statistics().get_all_statistics().await?;
    Ok(Json(statistics))
}
