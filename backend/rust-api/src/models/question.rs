use serde::{Deserialize, Serialize};

use super::record::Difficulty;

/// Entry of the static daily question pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolQuestion {
    pub question: String,
    pub tags: Vec<String>,
    pub difficulty: Difficulty,
    pub answer: String,
    pub hint: String,
}

impl PoolQuestion {
    pub fn shares_tag_with(&self, tags: &[String]) -> bool {
        self.tags.iter().any(|tag| tags.contains(tag))
    }
}

/// How strongly the daily pick leans toward weak topics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Always restrict to weak-topic questions when any match.
    Weak,
    /// Weak-topic questions 70% of the time, whole pool otherwise.
    Balanced,
    /// Uniform over the whole pool.
    Random,
}

impl Strategy {
    pub const DEFAULT_NAME: &'static str = "balanced";

    /// Unknown names fall back to [`Strategy::Random`].
    pub fn parse(value: &str) -> Self {
        match value {
            "weak" => Strategy::Weak,
            "balanced" => Strategy::Balanced,
            _ => Strategy::Random,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub date: String,
    pub completed: bool,
    pub success: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyQuestionResponse {
    pub date: String,
    pub question: String,
    pub tags: Vec<String>,
    pub difficulty: Difficulty,
    pub source: String,
    pub strategy: String,
    pub answer: String,
    pub hint: String,
    pub streak: u32,
    pub total_completed: usize,
    pub success_rate: f64,
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Deserialize)]
pub struct DailyQuery {
    pub strategy: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DailySubmitRequest {
    #[serde(rename = "questionId")]
    pub question_id: i64,
    pub answer: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DailySubmitResponse {
    pub success: bool,
    pub correct: bool,
    pub feedback: String,
}
