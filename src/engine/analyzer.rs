// ==========================================
// 钢厂质检缺陷复发分析 - 复发缺陷分析器
// ==========================================
// 数据流:
//   原始事件 → 归一化 → 聚合 → 分类 → 排序 → 汇总行
//   原始事件 + 缺陷代码 → 归一化 → 缺失周检测 → 下钻
// 红线: 纯函数，无 I/O，不读取环境配置（过滤开关由调用方显式传入）
// ==========================================

use crate::domain::inspection::{InspectionEvent, RawEventFrame};
use crate::domain::trend::{DefectDrillDown, DefectTrendSummary};
use crate::engine::aggregator::{DefectAggregator, DefectGroupStats};
use crate::engine::classifier::TrendClassifier;
use crate::engine::drilldown::DrillDownBuilder;
use crate::engine::error::ValidationResult;
use crate::engine::missing_week::MissingWeekDetector;
use crate::engine::normalizer::EventNormalizer;
use crate::engine::ranker::TrendRanker;
use std::collections::BTreeSet;

// ==========================================
// RecurringDefectAnalyzer - 复发缺陷分析器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct RecurringDefectAnalyzer {
    normalizer: EventNormalizer,
    aggregator: DefectAggregator,
    classifier: TrendClassifier,
    detector: MissingWeekDetector,
    ranker: TrendRanker,
    drilldown: DrillDownBuilder,
}

impl RecurringDefectAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定下钻说明文案语言
    pub fn with_locale(locale: &str) -> Self {
        Self {
            drilldown: DrillDownBuilder::with_locale(locale),
            ..Self::default()
        }
    }

    // ==========================================
    // 列表视图
    // ==========================================

    /// 分类并排序（无有效事件时返回空列表）
    pub fn classify(&self, events: &[InspectionEvent]) -> Vec<DefectTrendSummary> {
        let summaries: Vec<DefectTrendSummary> = self
            .aggregator
            .aggregate(events)
            .into_iter()
            .map(|stats| self.summarize(stats))
            .collect();

        let ranked = self.ranker.rank(summaries);
        tracing::debug!(rows = ranked.len(), "defect trends classified");
        ranked
    }

    /// 从原始集合分类（结构缺列时报错）
    pub fn classify_frame(&self, frame: &RawEventFrame) -> ValidationResult<Vec<DefectTrendSummary>> {
        let events = self.normalizer.normalize(frame)?;
        Ok(self.classify(&events))
    }

    /// 仅保留复发类（保持输入顺序）
    pub fn filter_recurring(&self, summaries: &[DefectTrendSummary]) -> Vec<DefectTrendSummary> {
        summaries
            .iter()
            .filter(|s| s.is_recurring())
            .cloned()
            .collect()
    }

    /// 按开关过滤
    pub fn apply_recurring_filter(
        &self,
        summaries: Vec<DefectTrendSummary>,
        recurring_only: bool,
    ) -> Vec<DefectTrendSummary> {
        if recurring_only {
            summaries.into_iter().filter(|s| s.is_recurring()).collect()
        } else {
            summaries
        }
    }

    /// 汇总中出现的缺陷代码（去重、升序），供下钻选择
    pub fn defect_codes(&self, summaries: &[DefectTrendSummary]) -> Vec<String> {
        summaries
            .iter()
            .map(|s| s.defect_code.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    // ==========================================
    // 下钻
    // ==========================================

    pub fn drill_down(&self, events: &[InspectionEvent], defect_code: &str) -> DefectDrillDown {
        self.drilldown.build(events, defect_code)
    }

    pub fn drill_down_frame(
        &self,
        frame: &RawEventFrame,
        defect_code: &str,
    ) -> ValidationResult<DefectDrillDown> {
        let events = self.normalizer.normalize(frame)?;
        Ok(self.drill_down(&events, defect_code))
    }

    // ==========================================
    // 内部方法
    // ==========================================

    fn summarize(&self, stats: DefectGroupStats) -> DefectTrendSummary {
        let trend_classification = self.classifier.classify(&stats);
        let missing_periods = self.detector.detect(&stats.timestamps);

        DefectTrendSummary {
            impacted_lot_count: stats.impacted_lot_count(),
            weeks_with_defects: stats.weeks_with_defects(),
            first_detected: stats.first_detected,
            last_detected: stats.last_detected,
            total_defects: stats.total_defects,
            days_span: stats.days_span(),
            trend_classification,
            missing_periods,
            defect_code: stats.defect_code,
            severity: stats.severity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::TrendClassification;

    fn frame_without_events() -> RawEventFrame {
        RawEventFrame::new(
            ["defect_id", "severity", "normalized_lot_id", "inspection_timestamp", "qty_defects"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
        )
    }

    #[test]
    fn test_classify_frame_empty_is_ok() {
        let analyzer = RecurringDefectAnalyzer::new();
        let summaries = analyzer.classify_frame(&frame_without_events()).unwrap();
        assert!(summaries.is_empty());
        assert_eq!(DefectTrendSummary::FIELD_NAMES.len(), 10);
    }

    #[test]
    fn test_classify_frame_missing_columns() {
        let analyzer = RecurringDefectAnalyzer::new();
        let frame = RawEventFrame::new(vec!["notes".to_string()]);
        let err = analyzer.classify_frame(&frame).unwrap_err();
        assert_eq!(err.missing_columns().len(), 5);
    }

    #[test]
    fn test_apply_recurring_filter_toggle() {
        let analyzer = RecurringDefectAnalyzer::new();
        let row = |class| DefectTrendSummary {
            defect_code: "X".to_string(),
            severity: "Major".to_string(),
            impacted_lot_count: 1,
            weeks_with_defects: 1,
            first_detected: None,
            last_detected: None,
            total_defects: 1,
            days_span: None,
            trend_classification: class,
            missing_periods: Vec::new(),
        };
        let rows = vec![
            row(TrendClassification::IsolatedIncident),
            row(TrendClassification::RecurringHighFrequency),
        ];
        assert_eq!(analyzer.apply_recurring_filter(rows.clone(), false).len(), 2);
        let only = analyzer.apply_recurring_filter(rows, true);
        assert_eq!(only.len(), 1);
        assert!(only[0].is_recurring());
    }
}
