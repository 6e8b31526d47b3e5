pub mod question;
pub mod record;
pub mod statistics;
pub mod tutor;

pub use question::{DailyQuestionResponse, HistoryEntry, PoolQuestion, Strategy};
pub use record::{AttemptRecord, Difficulty, NewAttemptRecord, RecordFilter};
pub use statistics::{
    ChartSlice, DashboardStatistics, LearningSummary, ProgressPoint, StatisticsSummary,
    WeeklyEntry,
};
