use std::{collections::HashSet, sync::Arc};

use anyhow::{Context, Result};
use chrono::{Days, NaiveDate};
use rand::{seq::IndexedRandom, Rng};

use super::{mastery, record_store::RecordStore, statistics::consecutive_day_streak};
use crate::metrics::DAILY_QUESTIONS_SERVED_TOTAL;
use crate::models::{
    AttemptRecord, DailyQuestionResponse, HistoryEntry, PoolQuestion, RecordFilter, Strategy,
};
use crate::utils::time::{format_date, today};

/// Chance that the balanced strategy restricts the draw to weak topics.
pub const BALANCED_WEAK_PROBABILITY: f64 = 0.7;
pub const HISTORY_DAYS: usize = 7;
pub const RECOMMENDATION_SOURCE: &str = "系统推荐";

#[derive(Debug, Clone, Copy)]
pub struct Selection<'a> {
    pub question: &'a PoolQuestion,
    /// Drawn from the weak-topic subset rather than the whole pool.
    pub weak_match: bool,
}

/// Picks one pool entry according to `strategy`. `None` only for an empty
/// pool.
pub fn select<'a, R>(
    pool: &'a [PoolQuestion],
    weak_tags: &[String],
    strategy: Strategy,
    rng: &mut R,
) -> Option<Selection<'a>>
where
    R: Rng + ?Sized,
{
    let restrict_to_weak = match strategy {
        Strategy::Weak => !weak_tags.is_empty(),
        Strategy::Balanced => {
            !weak_tags.is_empty() && rng.random::<f64>() < BALANCED_WEAK_PROBABILITY
        }
        Strategy::Random => false,
    };

    if restrict_to_weak {
        let candidates: Vec<&PoolQuestion> = pool
            .iter()
            .filter(|q| q.shares_tag_with(weak_tags))
            .collect();
        if let Some(question) = candidates.choose(rng).copied() {
            return Some(Selection {
                question,
                weak_match: true,
            });
        }
    }

    pool.choose(rng).map(|question| Selection {
        question,
        weak_match: false,
    })
}

/// Seven slots, most recent first. Slot `i` shows the `i`-th most recent
/// attempt; slots without an attempt are dated `today - (i + 1)` days and
/// marked not completed.
pub fn build_history(recent_first: &[AttemptRecord], today: NaiveDate) -> Vec<HistoryEntry> {
    (0..HISTORY_DAYS)
        .map(|i| match recent_first.get(i) {
            Some(record) => HistoryEntry {
                date: format_date(record.timestamp.date()),
                completed: true,
                success: record.success,
            },
            None => HistoryEntry {
                date: today
                    .checked_sub_days(Days::new(i as u64 + 1))
                    .map(format_date)
                    .unwrap_or_default(),
                completed: false,
                success: false,
            },
        })
        .collect()
}

/// Share of successes among the (at most seven) most recent attempts.
pub fn recent_success_rate(recent_first: &[AttemptRecord]) -> f64 {
    let recent = &recent_first[..recent_first.len().min(HISTORY_DAYS)];
    if recent.is_empty() {
        return 0.0;
    }
    let successes = recent.iter().filter(|r| r.success).count();
    successes as f64 / recent.len() as f64
}

pub struct DailyRecommender {
    records: Arc<dyn RecordStore>,
    pool: Arc<[PoolQuestion]>,
}

impl DailyRecommender {
    pub fn new(records: Arc<dyn RecordStore>, pool: Arc<[PoolQuestion]>) -> Self {
        Self { records, pool }
    }

    pub async fn get_daily_question(&self, strategy_name: &str) -> Result<DailyQuestionResponse> {
        let records = self
            .records
            .get_records(&RecordFilter::all())
            .await
            .context("Failed to load attempt records")?;

        let mut rng = rand::rng();
        self.compose(&records, strategy_name, today(), &mut rng)
    }

    /// Builds the daily view from a snapshot of the record log (most recent
    /// first).
    pub fn compose<R>(
        &self,
        records: &[AttemptRecord],
        strategy_name: &str,
        today: NaiveDate,
        rng: &mut R,
    ) -> Result<DailyQuestionResponse>
    where
        R: Rng + ?Sized,
    {
        let strategy = Strategy::parse(strategy_name);
        let report = mastery::classify(records);

        let selection = select(&self.pool, &report.weak, strategy, rng)
            .context("Daily question pool is empty")?;
        let question = selection.question;

        DAILY_QUESTIONS_SERVED_TOTAL
            .with_label_values(&[
                strategy_label(strategy),
                if selection.weak_match { "true" } else { "false" },
            ])
            .inc();
        tracing::info!(
            strategy = strategy_name,
            weak_tags = report.weak.len(),
            weak_match = selection.weak_match,
            "Daily question selected"
        );

        let dates: HashSet<NaiveDate> = records.iter().map(|r| r.timestamp.date()).collect();

        Ok(DailyQuestionResponse {
            date: format_date(today),
            question: question.question.clone(),
            tags: question.tags.clone(),
            difficulty: question.difficulty,
            source: RECOMMENDATION_SOURCE.to_string(),
            strategy: strategy_name.to_string(),
            answer: question.answer.clone(),
            hint: question.hint.clone(),
            streak: consecutive_day_streak(&dates, today),
            total_completed: records.len(),
            success_rate: recent_success_rate(records),
            history: build_history(records, today),
        })
    }
}

fn strategy_label(strategy: Strategy) -> &'static str {
    match strategy {
        Strategy::Weak => "weak",
        Strategy::Balanced => "balanced",
        Strategy::Random => "random",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Difficulty, NewAttemptRecord};
    use crate::services::{question_pool::default_pool, record_store::InMemoryRecordStore};
    use chrono::NaiveDateTime;
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::HashMap;

    fn weak(tags: &[&str]) -> Vec<String> {
        tags.iter().map(|t| t.to_string()).collect()
    }

    fn record_at(id: i64, timestamp: &str, success: bool) -> AttemptRecord {
        NewAttemptRecord {
            question: format!("q{}", id),
            answer: String::new(),
            tags: vec!["数列".to_string()],
            difficulty: Difficulty::Medium,
            success,
            steps: 2,
            time_used: None,
        }
        .into_record(
            id,
            NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M:%S").unwrap(),
        )
    }

    fn date(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
    }

    fn recommender() -> DailyRecommender {
        DailyRecommender::new(
            Arc::new(InMemoryRecordStore::new()),
            default_pool().into(),
        )
    }

    #[test]
    fn weak_strategy_only_returns_matching_entries() {
        let pool = default_pool();
        let weak_tags = weak(&["数列"]);
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen: HashMap<&str, usize> = HashMap::new();

        for _ in 0..1000 {
            let selection = select(&pool, &weak_tags, Strategy::Weak, &mut rng).unwrap();
            assert!(selection.weak_match);
            assert!(selection.question.shares_tag_with(&weak_tags));
            *seen.entry(selection.question.question.as_str()).or_default() += 1;
        }

        // both sequence questions are drawn
        assert_eq!(seen.len(), 2);
        assert!(seen.values().all(|&count| count > 300));
    }

    #[test]
    fn weak_strategy_without_match_uses_whole_pool() {
        let pool = default_pool();
        let weak_tags = weak(&["复数"]);
        let mut rng = StdRng::seed_from_u64(1);
        let mut seen = HashSet::new();

        for _ in 0..500 {
            let selection = select(&pool, &weak_tags, Strategy::Weak, &mut rng).unwrap();
            assert!(!selection.weak_match);
            seen.insert(selection.question.question.clone());
        }
        assert_eq!(seen.len(), pool.len());
    }

    #[test]
    fn balanced_strategy_leans_toward_weak_topics() {
        let pool = default_pool();
        let weak_tags = weak(&["数列"]);
        let mut rng = StdRng::seed_from_u64(2024);
        let trials = 10_000;

        let hits = (0..trials)
            .filter(|_| {
                select(&pool, &weak_tags, Strategy::Balanced, &mut rng)
                    .unwrap()
                    .question
                    .shares_tag_with(&weak_tags)
            })
            .count();

        // 0.7 from the weak branch plus 0.3 * 2/7 from the uniform branch
        let expected = 0.7 + 0.3 * (2.0 / 7.0);
        let observed = hits as f64 / trials as f64;
        let std_err = (expected * (1.0 - expected) / trials as f64).sqrt();
        assert!(
            (observed - expected).abs() < 3.0 * std_err,
            "observed {} expected {}",
            observed,
            expected
        );
    }

    #[test]
    fn balanced_branch_probability_is_seventy_percent() {
        let pool = default_pool();
        let weak_tags = weak(&["数列"]);
        let mut rng = StdRng::seed_from_u64(99);
        let trials = 10_000;

        let restricted = (0..trials)
            .filter(|_| {
                select(&pool, &weak_tags, Strategy::Balanced, &mut rng)
                    .unwrap()
                    .weak_match
            })
            .count();

        let observed = restricted as f64 / trials as f64;
        let std_err = (0.7_f64 * 0.3 / trials as f64).sqrt();
        assert!((observed - 0.7).abs() < 3.0 * std_err);
    }

    #[test]
    fn balanced_without_weak_tags_is_uniform() {
        let pool = default_pool();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let selection = select(&pool, &[], Strategy::Balanced, &mut rng).unwrap();
            assert!(!selection.weak_match);
        }
    }

    #[test]
    fn unknown_strategy_ignores_weak_tags() {
        let pool = default_pool();
        let weak_tags = weak(&["数列"]);
        let mut rng = StdRng::seed_from_u64(5);
        let mut seen = HashSet::new();
        for _ in 0..500 {
            let selection = select(&pool, &weak_tags, Strategy::Random, &mut rng).unwrap();
            assert!(!selection.weak_match);
            seen.insert(selection.question.question.clone());
        }
        assert_eq!(seen.len(), pool.len());
    }

    #[test]
    fn empty_pool_selects_nothing() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(select(&[], &weak(&["数列"]), Strategy::Weak, &mut rng).is_none());
    }

    #[test]
    fn history_always_has_seven_slots() {
        let today = date("2025-01-20");
        for count in [0usize, 3, 50] {
            let records: Vec<AttemptRecord> = (0..count)
                .map(|i| record_at((count - i) as i64, "2025-01-19 08:00:00", i % 2 == 0))
                .collect();
            let history = build_history(&records, today);
            assert_eq!(history.len(), HISTORY_DAYS);
            let completed = history.iter().filter(|h| h.completed).count();
            assert_eq!(completed, count.min(HISTORY_DAYS));
        }
    }

    #[test]
    fn history_pads_older_slots_backward_from_today() {
        let today = date("2025-01-20");
        let records = vec![
            record_at(3, "2025-01-20 09:00:00", true),
            record_at(2, "2025-01-18 09:00:00", false),
            record_at(1, "2025-01-17 09:00:00", true),
        ];

        let history = build_history(&records, today);
        let dates: Vec<&str> = history.iter().map(|h| h.date.as_str()).collect();
        assert_eq!(
            dates,
            vec![
                "2025-01-20",
                "2025-01-18",
                "2025-01-17",
                "2025-01-16",
                "2025-01-15",
                "2025-01-14",
                "2025-01-13",
            ]
        );
        assert!(history[0].completed && history[0].success);
        assert!(history[1].completed && !history[1].success);
        assert!(history[3..].iter().all(|h| !h.completed && !h.success));
    }

    #[test]
    fn recent_success_rate_looks_at_seven_records() {
        assert_eq!(recent_success_rate(&[]), 0.0);

        let mut records: Vec<AttemptRecord> = (0..7)
            .map(|i| record_at(20 - i, "2025-01-20 09:00:00", i < 5))
            .collect();
        records.extend((0..5).map(|i| record_at(10 - i, "2025-01-10 09:00:00", false)));

        let rate = recent_success_rate(&records);
        assert!((rate - 5.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn compose_with_empty_log_returns_defaults() {
        let mut rng = StdRng::seed_from_u64(11);
        let response = recommender()
            .compose(&[], "balanced", date("2025-01-20"), &mut rng)
            .unwrap();

        assert_eq!(response.date, "2025-01-20");
        assert_eq!(response.total_completed, 0);
        assert_eq!(response.success_rate, 0.0);
        assert_eq!(response.streak, 0);
        assert_eq!(response.source, RECOMMENDATION_SOURCE);
        assert_eq!(response.strategy, "balanced");
        assert_eq!(response.history.len(), HISTORY_DAYS);
        assert!(response.history.iter().all(|h| !h.completed));
        assert!(!response.answer.is_empty());
        assert!(!response.hint.is_empty());
    }

    #[test]
    fn compose_targets_weak_topic_for_weak_strategy() {
        let records = vec![
            record_at(4, "2025-01-20 09:00:00", false),
            record_at(3, "2025-01-19 09:00:00", false),
            record_at(2, "2025-01-18 09:00:00", true),
        ];
        let mut rng = StdRng::seed_from_u64(8);
        let recommender = recommender();

        for _ in 0..50 {
            let response = recommender
                .compose(&records, "weak", date("2025-01-20"), &mut rng)
                .unwrap();
            assert!(response.tags.iter().any(|t| t == "数列"));
            assert_eq!(response.total_completed, 3);
            assert_eq!(response.streak, 3);
        }
    }

    #[tokio::test]
    async fn get_daily_question_reads_from_store() {
        let store = Arc::new(InMemoryRecordStore::new());
        let recommender = DailyRecommender::new(store.clone(), default_pool().into());
        let response = recommender.get_daily_question("nonsense").await.unwrap();

        assert_eq!(response.strategy, "nonsense");
        assert_eq!(response.total_completed, 0);
        assert_eq!(response.history.len(), HISTORY_DAYS);
    }
}
