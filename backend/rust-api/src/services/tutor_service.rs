use std::sync::Arc;

use serde_json::Value;

use super::{
    llm_client::{LlmClient, LlmError},
    prompts,
    record_store::{RecordStore, RecordStoreError},
};
use crate::metrics::{track_llm_call, SOLVE_OUTCOMES_TOTAL};
use crate::models::{tutor::GenerateRequest, Difficulty, NewAttemptRecord};

/// Tag given to attempts logged from free-form solve requests.
pub const SOLVE_RECORD_TAG: &str = "综合";
const UNKNOWN_TIME_USED: &str = "未知";

#[derive(Debug, thiserror::Error)]
pub enum TutorError {
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error(transparent)]
    Store(#[from] RecordStoreError),
}

pub struct TutorService {
    llm: Arc<dyn LlmClient>,
    records: Arc<dyn RecordStore>,
}

impl TutorService {
    pub fn new(llm: Arc<dyn LlmClient>, records: Arc<dyn RecordStore>) -> Self {
        Self { llm, records }
    }

    /// Asks the model for a worked solution. A successful solution is logged
    /// as an attempt; the model output is returned unchanged.
    pub async fn solve(&self, question: &str) -> Result<Value, TutorError> {
        let user_prompt = prompts::solve_user_prompt(question);
        let result = match track_llm_call(
            "solve",
            self.llm.call(prompts::SOLVE_SYSTEM_PROMPT, &user_prompt),
        )
        .await
        {
            Ok(result) => result,
            Err(e) => {
                SOLVE_OUTCOMES_TOTAL.with_label_values(&["error"]).inc();
                return Err(e.into());
            }
        };

        if result.get("success").and_then(Value::as_bool) != Some(true) {
            SOLVE_OUTCOMES_TOTAL.with_label_values(&["unsolved"]).inc();
            tracing::info!("Model could not solve the question, nothing recorded");
            return Ok(result);
        }

        let id = self.records.add_record(attempt_from_solution(question, &result)).await?;
        SOLVE_OUTCOMES_TOTAL.with_label_values(&["solved"]).inc();
        tracing::info!(record_id = id, "Solved question recorded");
        Ok(result)
    }

    pub async fn generate(&self, request: &GenerateRequest) -> Result<Value, TutorError> {
        let user_prompt = prompts::generate_user_prompt(request);
        let result = track_llm_call(
            "generate",
            self.llm.call(prompts::GENERATE_SYSTEM_PROMPT, &user_prompt),
        )
        .await?;
        Ok(result)
    }

    pub async fn generate_plot_code(&self, description: &str) -> Result<Value, TutorError> {
        let user_prompt = prompts::plot_user_prompt(description);
        let result = track_llm_call(
            "plot",
            self.llm
                .call(prompts::PLOT_GENERATE_SYSTEM_PROMPT, &user_prompt),
        )
        .await?;
        Ok(result)
    }
}

/// Attempt draft for a successful solve: fixed tag and difficulty, step count
/// and time taken from `statistics` when the model reports them.
pub fn attempt_from_solution(question: &str, result: &Value) -> NewAttemptRecord {
    let statistics = result.get("statistics");
    let steps = statistics
        .and_then(|s| s.get("total_steps"))
        .and_then(Value::as_u64)
        .map(|n| u32::try_from(n).unwrap_or(u32::MAX))
        .unwrap_or(0);
    let time_used = statistics
        .and_then(|s| s.get("time_used"))
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN_TIME_USED)
        .to_string();

    NewAttemptRecord {
        question: question.to_string(),
        answer: result
            .get("answer")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        tags: vec![SOLVE_RECORD_TAG.to_string()],
        difficulty: Difficulty::Medium,
        success: true,
        steps,
        time_used: Some(time_used),
    }
}
