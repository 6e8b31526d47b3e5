use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use super::ApiError;
use crate::{
    models::{statistics::MemoryResponse, Difficulty, RecordFilter},
    services::{mastery, AppState},
};

#[derive(Debug, Deserialize)]
pub struct MemoryQuery {
    pub tag: Option<String>,
    pub difficulty: Option<String>,
}

impl MemoryQuery {
    fn into_filter(self) -> Result<RecordFilter, ApiError> {
        let tag = self
            .tag
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        let difficulty = match self.difficulty.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<Difficulty>().map_err(ApiError::BadRequest)?),
        };
        Ok(RecordFilter { tag, difficulty })
    }
}

/// GET /memory - filtered attempt log plus mastery summary of the whole log
pub async fn get_memory(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MemoryQuery>,
) -> Result<Json<MemoryResponse>, ApiError> {
    let filter = query.into_filter()?;

    let all_records = state.records.get_records(&RecordFilter::all()).await?;
    let summary = mastery::classify(&all_records).summary();

    let records = if filter == RecordFilter::all() {
        all_records
    } else {
        state.records.get_records(&filter).await?
    };

    Ok(Json(MemoryResponse { summary, records }))
}
