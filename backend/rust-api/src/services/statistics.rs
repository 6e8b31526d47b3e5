use std::{collections::HashSet, sync::Arc};

use anyhow::{Context, Result};
use chrono::{Days, NaiveDate, NaiveDateTime, TimeDelta};

use super::{mastery, record_store::RecordStore};
use crate::models::{
    AttemptRecord, ChartSlice, DashboardStatistics, Difficulty, LearningSummary, ProgressPoint,
    RecordFilter, WeeklyEntry,
};
use crate::utils::time::now_seconds;

const WEEKDAYS: [&str; 7] = ["周一", "周二", "周三", "周四", "周五", "周六", "周日"];
const MONTHS: [&str; 5] = ["1月", "2月", "3月", "4月", "5月"];
const KNOWLEDGE_PALETTE: [&str; 6] = [
    "#3b82f6", "#8b5cf6", "#10b981", "#f59e0b", "#ef4444", "#6b7280",
];
const KNOWLEDGE_TOP_N: usize = 6;
const OTHER_LABEL: &str = "其他";
const PROGRESS_BASE_RATE: u32 = 65;

/// Placeholder weekly activity; not derived from the record log.
pub fn weekly_data() -> Vec<WeeklyEntry> {
    WEEKDAYS
        .iter()
        .enumerate()
        .map(|(i, day)| {
            let i = i as u32;
            WeeklyEntry {
                day: day.to_string(),
                solved: 3 + (i * 2) % 5,
                generated: 1 + (i * 3) % 4,
            }
        })
        .collect()
}

/// Tag occurrence counts, largest first. Ties keep first-seen order. Tags past
/// the sixth are folded into a single grey slice.
pub fn knowledge_data(records: &[AttemptRecord]) -> Vec<ChartSlice> {
    let mut counts: Vec<(String, usize)> = mastery::tag_statistics(records)
        .into_iter()
        .map(|(tag, stat)| (tag, stat.attempts as usize))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    let mut slices: Vec<ChartSlice> = counts
        .iter()
        .take(KNOWLEDGE_TOP_N)
        .enumerate()
        .map(|(i, (tag, count))| ChartSlice {
            name: tag.clone(),
            value: *count,
            color: KNOWLEDGE_PALETTE[i % KNOWLEDGE_PALETTE.len()].to_string(),
        })
        .collect();

    if counts.len() > KNOWLEDGE_TOP_N {
        let other: usize = counts[KNOWLEDGE_TOP_N..].iter().map(|(_, c)| c).sum();
        slices.push(ChartSlice {
            name: OTHER_LABEL.to_string(),
            value: other,
            color: KNOWLEDGE_PALETTE[KNOWLEDGE_PALETTE.len() - 1].to_string(),
        });
    }

    slices
}

pub fn difficulty_data(records: &[AttemptRecord]) -> Vec<ChartSlice> {
    Difficulty::ALL
        .into_iter()
        .map(|difficulty| ChartSlice {
            name: difficulty.localized().to_string(),
            value: records
                .iter()
                .filter(|r| r.difficulty == difficulty)
                .count(),
            color: difficulty_color(difficulty).to_string(),
        })
        .collect()
}

fn difficulty_color(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Easy => "#10b981",
        Difficulty::Medium => "#f59e0b",
        Difficulty::Hard => "#ef4444",
    }
}

/// Placeholder monthly success-rate curve.
pub fn progress_data() -> Vec<ProgressPoint> {
    MONTHS
        .iter()
        .enumerate()
        .map(|(i, month)| {
            let i = i as u32;
            ProgressPoint {
                month: month.to_string(),
                rate: PROGRESS_BASE_RATE + i * 2 + i % 3,
            }
        })
        .collect()
}

/// Number of consecutive calendar days with at least one attempt. The run must
/// end today or yesterday, otherwise the streak is broken.
pub fn consecutive_day_streak(active_days: &HashSet<NaiveDate>, today: NaiveDate) -> u32 {
    let start = if active_days.contains(&today) {
        Some(today)
    } else {
        today
            .checked_sub_days(Days::new(1))
            .filter(|yesterday| active_days.contains(yesterday))
    };

    let mut streak = 0;
    let mut cursor = start;
    while let Some(day) = cursor.filter(|d| active_days.contains(d)) {
        streak += 1;
        cursor = day.checked_sub_days(Days::new(1));
    }
    streak
}

pub fn summary(records: &[AttemptRecord], now: NaiveDateTime) -> LearningSummary {
    let report = mastery::classify(records);
    let week_ago = now - TimeDelta::days(7);
    let active_days: HashSet<NaiveDate> = records.iter().map(|r| r.timestamp.date()).collect();

    LearningSummary {
        success_rate: report.success_rate,
        weekly_count: records.iter().filter(|r| r.timestamp >= week_ago).count(),
        mastered_topics: report.mastered.len(),
        streak_days: consecutive_day_streak(&active_days, now.date()),
    }
}

pub fn aggregate(records: &[AttemptRecord], now: NaiveDateTime) -> DashboardStatistics {
    DashboardStatistics {
        weekly_data: weekly_data(),
        knowledge_data: knowledge_data(records),
        difficulty_data: difficulty_data(records),
        progress_data: progress_data(),
        summary: summary(records, now),
    }
}

pub struct StatisticsService {
    records: Arc<dyn RecordStore>,
}

impl StatisticsService {
    pub fn new(records: Arc<dyn RecordStore>) -> Self {
        Self { records }
    }

    pub async fn get_all_statistics(&self) -> Result<DashboardStatistics> {
        let records = self
            .records
            .get_records(&RecordFilter::all())
            .await
            .context("Failed to load attempt records")?;

        tracing::debug!(records = records.len(), "Computing dashboard statistics");
        Ok(aggregate(&records, now_seconds()))
    }
}
