// ==========================================
// 钢厂质检缺陷复发分析 - 趋势排序引擎
// ==========================================
// 职责: 分类完成后对汇总行做确定性排序
// 排序键:
// 1) 分类档位升序（复发-严重 < 复发-高频 < 孤立事件 < 数据不足）
// 2) impacted_lot_count 降序
// 3) last_detected 降序（最近优先，缺失排后）
// 4) total_defects 降序
// 全键相同时保持输入顺序（稳定排序）
// ==========================================

use crate::domain::trend::DefectTrendSummary;
use std::cmp::Ordering;

// ==========================================
// TrendRanker - 趋势排序引擎
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct TrendRanker;

impl TrendRanker {
    pub fn new() -> Self {
        Self
    }

    /// 排序汇总行（Vec::sort_by 为稳定排序）
    pub fn rank(&self, mut summaries: Vec<DefectTrendSummary>) -> Vec<DefectTrendSummary> {
        summaries.sort_by(|a, b| self.compare(a, b));
        summaries
    }

    /// 比较两行的优先级
    ///
    /// # 返回
    /// Ordering::Less 表示 a 优先于 b
    pub fn compare(&self, a: &DefectTrendSummary, b: &DefectTrendSummary) -> Ordering {
        // 1. 分类档位（升序）
        let tier_a = a.trend_classification.priority_tier();
        let tier_b = b.trend_classification.priority_tier();
        match tier_a.cmp(&tier_b) {
            Ordering::Equal => {}
            other => return other,
        }

        // 2. 影响批次数（降序）
        match b.impacted_lot_count.cmp(&a.impacted_lot_count) {
            Ordering::Equal => {}
            other => return other,
        }

        // 3. 最近检出时间（降序，None 视为最早）
        match b.last_detected.cmp(&a.last_detected) {
            Ordering::Equal => {}
            other => return other,
        }

        // 4. 缺陷总数（降序）
        b.total_defects.cmp(&a.total_defects)
    }
}
