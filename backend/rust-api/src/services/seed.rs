use anyhow::{Context, Result};
use chrono::NaiveDateTime;

use super::record_store::RecordStore;
use crate::models::{AttemptRecord, Difficulty};
use crate::utils::time::TIMESTAMP_FORMAT;

/// Demo attempt log loaded into an empty store at start-up.
pub fn sample_records() -> Vec<AttemptRecord> {
    vec![
        sample(
            1,
            "求函数 f(x) = x³ - 3x + 1 在区间 [-2, 2] 上的最大值和最小值",
            "最大值为 3，最小值为 -1",
            &["函数", "导数"],
            Difficulty::Medium,
            true,
            8,
            "2025-01-20 14:30:25",
            "45秒",
        ),
        sample(
            2,
            "已知等比数列前4项和为4，前8项和为68，求公比",
            "公比 q = 2",
            &["数列"],
            Difficulty::Easy,
            true,
            6,
            "2025-01-20 13:15:10",
            "32秒",
        ),
        sample(
            3,
            "证明：在正方体中，异面直线所成角的范围",
            "解题失败",
            &["立体几何"],
            Difficulty::Hard,
            false,
            12,
            "2025-01-20 11:45:33",
            "120秒",
        ),
        sample(
            4,
            "已知 sin(α) = 3/5，α ∈ (π/2, π)，求 cos(α) 的值",
            "cos(α) = -4/5",
            &["三角函数"],
            Difficulty::Easy,
            true,
            4,
            "2025-01-20 10:20:15",
            "18秒",
        ),
        sample(
            5,
            "求不等式 |x-1| + |x+2| < 5 的解集",
            "解集为 (-3, 2)",
            &["不等式"],
            Difficulty::Medium,
            true,
            7,
            "2025-01-19 16:45:20",
            "38秒",
        ),
        sample(
            6,
            "求椭圆 x²/16 + y²/9 = 1 的焦点坐标",
            "焦点坐标为 (±√7, 0)",
            &["解析几何"],
            Difficulty::Easy,
            true,
            3,
            "2025-01-19 15:30:45",
            "15秒",
        ),
        sample(
            7,
            "已知向量 a=(1,2)，b=(3,4)，求 a·b 和 |a+b|",
            "a·b = 11，|a+b| = √29",
            &["向量"],
            Difficulty::Easy,
            true,
            5,
            "2025-01-19 14:10:30",
            "22秒",
        ),
        sample(
            8,
            "求复数 z = (1+i)/(1-i) 的模和辐角主值",
            "解题失败",
            &["复数"],
            Difficulty::Medium,
            false,
            6,
            "2025-01-19 12:55:18",
            "55秒",
        ),
        sample(
            9,
            "求函数 f(x) = e^x - x 的单调区间",
            "在 (-∞, 0) 上单调递减，在 (0, +∞) 上单调递增",
            &["函数", "导数"],
            Difficulty::Medium,
            true,
            6,
            "2025-01-19 11:20:40",
            "35秒",
        ),
        sample(
            10,
            "已知数列 {an} 满足 a1=1，an+1=2an+1，求通项公式",
            "an = 2^n - 1",
            &["数列"],
            Difficulty::Medium,
            true,
            8,
            "2025-01-19 10:05:25",
            "42秒",
        ),
        sample(
            11,
            "证明：对于任意正实数 a, b，有 (a+b)/2 ≥ √(ab)",
            "证明成功（均值不等式）",
            &["不等式"],
            Difficulty::Easy,
            true,
            5,
            "2025-01-18 16:30:15",
            "28秒",
        ),
        sample(
            12,
            "求三棱锥 P-ABC 的体积，已知底面积为 S，高为 h",
            "V = (1/3)Sh",
            &["立体几何"],
            Difficulty::Easy,
            true,
            3,
            "2025-01-18 15:15:50",
            "12秒",
        ),
        sample(
            13,
            "求概率：从5个红球和3个白球中随机取2个，恰好1红1白的概率",
            "P = 15/28",
            &["概率统计"],
            Difficulty::Medium,
            true,
            6,
            "2025-01-18 14:20:35",
            "30秒",
        ),
        sample(
            14,
            "求双曲线 x²/4 - y²/9 = 1 的渐近线方程",
            "y = ±(3/2)x",
            &["解析几何"],
            Difficulty::Easy,
            true,
            4,
            "2025-01-18 13:10:20",
            "20秒",
        ),
        sample(
            15,
            "求三角形面积，已知两边 a=3, b=4，夹角 C=60°",
            "S = 3√3",
            &["三角函数"],
            Difficulty::Easy,
            true,
            3,
            "2025-01-18 11:45:10",
            "15秒",
        ),
        sample(
            16,
            "求极限 lim(x→0) (sin x)/x",
            "极限值为 1",
            &["函数", "极限"],
            Difficulty::Medium,
            true,
            5,
            "2025-01-17 16:55:30",
            "25秒",
        ),
        sample(
            17,
            "求矩阵 [[1,2],[3,4]] 的行列式",
            "det = -2",
            &["线性代数"],
            Difficulty::Easy,
            true,
            2,
            "2025-01-17 15:30:45",
            "10秒",
        ),
        sample(
            18,
            "求抛物线 y² = 4x 的焦点和准线",
            "焦点 (1, 0)，准线 x = -1",
            &["解析几何"],
            Difficulty::Easy,
            true,
            3,
            "2025-01-17 14:15:20",
            "18秒",
        ),
        sample(
            19,
            "求二项式 (x+y)^5 展开式中 x²y³ 的系数",
            "系数为 10",
            &["组合数学"],
            Difficulty::Medium,
            true,
            4,
            "2025-01-17 13:20:15",
            "22秒",
        ),
        sample(
            20,
            "求函数 f(x) = x³ - 3x² + 2 的拐点",
            "拐点为 (1, 0)",
            &["函数", "导数"],
            Difficulty::Medium,
            true,
            7,
            "2025-01-17 11:50:40",
            "40秒",
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn sample(
    id: i64,
    question: &str,
    answer: &str,
    tags: &[&str],
    difficulty: Difficulty,
    success: bool,
    steps: u32,
    timestamp: &str,
    time_used: &str,
) -> AttemptRecord {
    AttemptRecord {
        id,
        question: question.to_string(),
        answer: answer.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        difficulty,
        success,
        steps,
        timestamp: NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT)
            .unwrap_or_default(),
        time_used: Some(time_used.to_string()),
    }
}

/// Imports the sample log when the store holds no records yet.
///
/// Returns the number of imported records.
pub async fn seed_if_empty(store: &dyn RecordStore) -> Result<usize> {
    let existing = store
        .count()
        .await
        .context("Failed to count attempt records")?;
    if existing > 0 {
        tracing::debug!(existing, "Record store already populated, skipping sample data");
        return Ok(0);
    }

    let imported = store
        .import_records(sample_records())
        .await
        .context("Failed to import sample attempt records")?;
    tracing::info!(imported, backend = store.backend_name(), "Sample attempt records imported");
    Ok(imported)
}
