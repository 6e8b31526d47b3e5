use serde::{Deserialize, Serialize};

use super::record::AttemptRecord;

/// Aggregate attached to record listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsSummary {
    pub total: usize,
    pub success_rate: f64,
    pub weak_points: Vec<String>,
    pub mastered_points: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryResponse {
    #[serde(flatten)]
    pub summary: StatisticsSummary,
    pub records: Vec<AttemptRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyEntry {
    pub day: String,
    pub solved: u32,
    pub generated: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSlice {
    pub name: String,
    pub value: usize,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressPoint {
    pub month: String,
    pub rate: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningSummary {
    pub success_rate: f64,
    pub weekly_count: usize,
    pub mastered_topics: usize,
    pub streak_days: u32,
}

/// Everything the statistics dashboard renders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStatistics {
    pub weekly_data: Vec<WeeklyEntry>,
    pub knowledge_data: Vec<ChartSlice>,
    pub difficulty_data: Vec<ChartSlice>,
    pub progress_data: Vec<ProgressPoint>,
    #[serde(flatten)]
    pub summary: LearningSummary,
}
