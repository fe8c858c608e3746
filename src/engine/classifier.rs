// ==========================================
// 钢厂质检缺陷复发分析 - 趋势分类器
// ==========================================
// 决策表（自上而下，首个命中即返回）:
// 1) 无有效时间戳              → 数据不足
// 2) 批次 >= 2 且 周数 >= 2    → 复发（Critical 严重度为"复发-严重"，否则"复发-高频"）
// 3) 批次 == 1                 → 孤立事件
// 4) 其他（多批次单周等）      → 数据不足
// 红线: 单一维度（仅多批次 / 仅多周）不得提升为复发
// ==========================================

use crate::domain::types::TrendClassification;
use crate::engine::aggregator::DefectGroupStats;

/// 复发判定: 最少影响批次数
pub const MIN_RECURRING_LOTS: usize = 2;
/// 复发判定: 最少出现周数
pub const MIN_RECURRING_WEEKS: usize = 2;
/// 严重度字面值
pub const CRITICAL_SEVERITY: &str = "Critical";

/// 是否同时满足批次与周两个维度的复发阈值
pub fn meets_recurring_threshold(lot_count: usize, week_count: usize) -> bool {
    lot_count >= MIN_RECURRING_LOTS && week_count >= MIN_RECURRING_WEEKS
}

// ==========================================
// TrendClassifier - 趋势分类器
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct TrendClassifier;

impl TrendClassifier {
    pub fn new() -> Self {
        Self
    }

    /// 对分组统计进行分类
    pub fn classify(&self, stats: &DefectGroupStats) -> TrendClassification {
        let has_time_range = stats.first_detected.is_some() && stats.last_detected.is_some();

        self.classify_counts(
            &stats.severity,
            stats.impacted_lot_count(),
            stats.weeks_with_defects(),
            has_time_range,
        )
    }

    /// 决策表本体
    pub fn classify_counts(
        &self,
        severity: &str,
        lot_count: usize,
        week_count: usize,
        has_time_range: bool,
    ) -> TrendClassification {
        if !has_time_range {
            return TrendClassification::InsufficientData;
        }

        if meets_recurring_threshold(lot_count, week_count) {
            if severity == CRITICAL_SEVERITY {
                TrendClassification::RecurringCritical
            } else {
                TrendClassification::RecurringHighFrequency
            }
        } else if lot_count == 1 {
            TrendClassification::IsolatedIncident
        } else {
            TrendClassification::InsufficientData
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_table() {
        let c = TrendClassifier::new();
        assert_eq!(
            c.classify_counts("Critical", 2, 2, true),
            TrendClassification::RecurringCritical
        );
        assert_eq!(
            c.classify_counts("Major", 3, 5, true),
            TrendClassification::RecurringHighFrequency
        );
        assert_eq!(
            c.classify_counts("Critical", 1, 4, true),
            TrendClassification::IsolatedIncident
        );
        // 多批次单周：不得提升为复发
        assert_eq!(
            c.classify_counts("Critical", 5, 1, true),
            TrendClassification::InsufficientData
        );
        // 无有效时间范围优先于其他规则
        assert_eq!(
            c.classify_counts("Critical", 3, 3, false),
            TrendClassification::InsufficientData
        );
        assert_eq!(
            c.classify_counts("Minor", 0, 0, true),
            TrendClassification::InsufficientData
        );
    }

    #[test]
    fn test_critical_is_case_sensitive() {
        let c = TrendClassifier::new();
        assert_eq!(
            c.classify_counts("critical", 2, 2, true),
            TrendClassification::RecurringHighFrequency
        );
    }
}
