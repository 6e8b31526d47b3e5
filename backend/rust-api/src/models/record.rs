use std::{fmt, str::FromStr};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::utils::time::timestamp_format;

/// Difficulty of a question or attempt. Serialized as the localized label the
/// frontend renders; the English names are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    #[serde(rename = "简单", alias = "easy")]
    Easy,
    #[default]
    #[serde(rename = "中等", alias = "medium")]
    Medium,
    #[serde(rename = "困难", alias = "hard")]
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn localized(&self) -> &'static str {
        match self {
            Difficulty::Easy => "简单",
            Difficulty::Medium => "中等",
            Difficulty::Hard => "困难",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Difficulty::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(trimmed) || d.localized() == trimmed)
            .ok_or_else(|| format!("Unknown difficulty: {}", value))
    }
}

/// One logged solve attempt. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub tags: Vec<String>,
    pub difficulty: Difficulty,
    pub success: bool,
    pub steps: u32,
    #[serde(with = "timestamp_format")]
    pub timestamp: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_used: Option<String>,
}

impl AttemptRecord {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Attempt as submitted to the record log: id and timestamp are issued by
/// the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAttemptRecord {
    pub question: String,
    pub answer: String,
    pub tags: Vec<String>,
    #[serde(default)]
    pub difficulty: Difficulty,
    pub success: bool,
    #[serde(default)]
    pub steps: u32,
    #[serde(default)]
    pub time_used: Option<String>,
}

impl NewAttemptRecord {
    pub fn into_record(self, id: i64, timestamp: NaiveDateTime) -> AttemptRecord {
        AttemptRecord {
            id,
            question: self.question,
            answer: self.answer,
            tags: self.tags,
            difficulty: self.difficulty,
            success: self.success,
            steps: self.steps,
            timestamp,
            time_used: self.time_used,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub tag: Option<String>,
    pub difficulty: Option<Difficulty>,
}

impl RecordFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn matches(&self, record: &AttemptRecord) -> bool {
        if let Some(tag) = &self.tag {
            if !record.has_tag(tag) {
                return false;
            }
        }
        if let Some(difficulty) = self.difficulty {
            if record.difficulty != difficulty {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn difficulty_accepts_localized_labels() {
        let parsed: Difficulty = serde_json::from_value(json!("困难")).unwrap();
        assert_eq!(parsed, Difficulty::Hard);
        let parsed: Difficulty = serde_json::from_value(json!("easy")).unwrap();
        assert_eq!(parsed, Difficulty::Easy);
        assert_eq!("中等".parse::<Difficulty>().unwrap(), Difficulty::Medium);
        assert_eq!("EASY".parse::<Difficulty>().unwrap(), Difficulty::Easy);
        assert!("extreme".parse::<Difficulty>().is_err());
    }

    #[test]
    fn record_serializes_timestamp_with_second_resolution() {
        let timestamp =
            NaiveDateTime::parse_from_str("2025-01-20 14:30:25", "%Y-%m-%d %H:%M:%S").unwrap();
        let record = NewAttemptRecord {
            question: "q".into(),
            answer: "a".into(),
            tags: vec!["函数".into()],
            difficulty: Difficulty::Medium,
            success: true,
            steps: 8,
            time_used: None,
        }
        .into_record(1, timestamp);

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["timestamp"], "2025-01-20 14:30:25");
        assert_eq!(value["difficulty"], "中等");
        assert!(value.get("time_used").is_none());

        let back: AttemptRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn difficulty_serializes_as_localized_label() {
        let labels: Vec<serde_json::Value> = Difficulty::ALL
            .iter()
            .map(|d| serde_json::to_value(d).unwrap())
            .collect();
        assert_eq!(labels, vec![json!("简单"), json!("中等"), json!("困难")]);
    }

    #[test]
    fn filter_requires_both_tag_and_difficulty() {
        let timestamp =
            NaiveDateTime::parse_from_str("2025-01-20 14:30:25", "%Y-%m-%d %H:%M:%S").unwrap();
        let record = NewAttemptRecord {
            question: "q".into(),
            answer: "a".into(),
            tags: vec!["数列".into(), "裂项求和".into()],
            difficulty: Difficulty::Hard,
            success: false,
            steps: 3,
            time_used: None,
        }
        .into_record(7, timestamp);

        assert!(RecordFilter::all().matches(&record));
        assert!(RecordFilter {
            tag: Some("裂项求和".into()),
            difficulty: Some(Difficulty::Hard),
        }
        .matches(&record));
        assert!(!RecordFilter {
            tag: Some("数列".into()),
            difficulty: Some(Difficulty::Easy),
        }
        .matches(&record));
        assert!(!RecordFilter {
            tag: Some("函数".into()),
            difficulty: None,
        }
        .matches(&record));
    }
}
