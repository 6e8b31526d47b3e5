use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct SolveRequest {
    #[validate(
        length(min = 1, max = 4000),
        custom(function = "not_blank")
    )]
    pub question: String,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct GenerateRequest {
    #[serde(default = "default_difficulty_level")]
    #[validate(length(min = 1, max = 32))]
    pub difficulty_level: String,
    #[serde(default = "default_problem_type")]
    #[validate(length(min = 1, max = 64))]
    pub problem_type: String,
    #[serde(default)]
    #[validate(length(max = 16))]
    pub topic_keywords: Vec<String>,
    #[serde(default)]
    #[validate(length(max = 4000))]
    pub requirements: String,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct PlotExecuteRequest {
    #[validate(length(min = 1, max = 20000), custom(function = "not_blank"))]
    pub code: String,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct PlotGenerateRequest {
    #[validate(
        length(min = 1, max = 4000),
        custom(function = "not_blank")
    )]
    pub description: String,
}

fn default_difficulty_level() -> String {
    "中等".to_string()
}

fn default_problem_type() -> String {
    "函数".to_string()
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}
