use std::collections::HashMap;

use serde::Serialize;

use crate::models::{AttemptRecord, StatisticsSummary};

/// Tags with fewer attempts than this are never classified.
pub const MIN_ATTEMPTS: u32 = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TagStat {
    pub attempts: u32,
    pub successes: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mastery {
    /// Success rate in `[0, 0.6)`.
    Weak,
    /// Success rate in `[0.6, 0.8)`.
    Neutral,
    /// Success rate in `[0.8, 1.0]`.
    Mastered,
    /// Fewer than [`MIN_ATTEMPTS`] attempts.
    Insufficient,
}

impl TagStat {
    pub fn rate(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            f64::from(self.successes) / f64::from(self.attempts)
        }
    }

    pub fn classify(&self) -> Mastery {
        if self.attempts < MIN_ATTEMPTS {
            return Mastery::Insufficient;
        }
        // Integer comparison keeps the 0.6 and 0.8 boundaries exact.
        let successes = u64::from(self.successes);
        let attempts = u64::from(self.attempts);
        if successes * 5 < attempts * 3 {
            Mastery::Weak
        } else if successes * 5 >= attempts * 4 {
            Mastery::Mastered
        } else {
            Mastery::Neutral
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MasteryReport {
    pub total: usize,
    pub success_rate: f64,
    pub weak: Vec<String>,
    pub mastered: Vec<String>,
    /// Per-tag counters in first-seen order.
    pub tags: Vec<(String, TagStat)>,
}

impl MasteryReport {
    pub fn summary(&self) -> StatisticsSummary {
        StatisticsSummary {
            total: self.total,
            success_rate: self.success_rate,
            weak_points: self.weak.clone(),
            mastered_points: self.mastered.clone(),
        }
    }
}

/// Per-tag attempt and success counts. A record counts once for each of its
/// tags; output keeps the order in which tags first appear.
pub fn tag_statistics(records: &[AttemptRecord]) -> Vec<(String, TagStat)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut stats: Vec<(String, TagStat)> = Vec::new();

    for record in records {
        for tag in &record.tags {
            let slot = *index.entry(tag.as_str()).or_insert_with(|| {
                stats.push((tag.clone(), TagStat::default()));
                stats.len() - 1
            });
            let stat = &mut stats[slot].1;
            stat.attempts += 1;
            if record.success {
                stat.successes += 1;
            }
        }
    }

    stats
}

/// Classifies every tag of `records` as weak, mastered or neither.
pub fn classify(records: &[AttemptRecord]) -> MasteryReport {
    let total = records.len();
    let successes = records.iter().filter(|r| r.success).count();
    let success_rate = if total == 0 {
        0.0
    } else {
        successes as f64 / total as f64
    };

    let tags = tag_statistics(records);
    let mut weak = Vec::new();
    let mut mastered = Vec::new();
    for (tag, stat) in &tags {
        match stat.classify() {
            Mastery::Weak => weak.push(tag.clone()),
            Mastery::Mastered => mastered.push(tag.clone()),
            Mastery::Neutral | Mastery::Insufficient => {}
        }
    }

    MasteryReport {
        total,
        success_rate,
        weak,
        mastered,
        tags,
    }
}
