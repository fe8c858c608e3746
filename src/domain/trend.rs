// ==========================================
// 钢厂质检缺陷复发分析 - 趋势汇总与下钻模型
// ==========================================
// 所有实体均为派生快照，每次调用重新计算，不落库
// ==========================================

use crate::domain::inspection::InspectionEvent;
use crate::domain::types::TrendClassification;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// DefectTrendSummary - 缺陷趋势汇总行
// ==========================================
/// 每个 (defect_code, severity) 组合一行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefectTrendSummary {
    pub defect_code: String,
    pub severity: String,
    pub impacted_lot_count: usize,
    pub weeks_with_defects: usize,
    /// 无有效时间戳时为 None
    pub first_detected: Option<NaiveDateTime>,
    pub last_detected: Option<NaiveDateTime>,
    pub total_defects: u64,
    /// last_detected - first_detected（整天）
    pub days_span: Option<i64>,
    pub trend_classification: TrendClassification,
    /// 缺失周标签（YYYY-Www，时间升序）
    pub missing_periods: Vec<String>,
}

impl DefectTrendSummary {
    /// 列表视图固定字段集（空结果同样适用）
    pub const FIELD_NAMES: [&'static str; 10] = [
        "defect_code",
        "severity",
        "impacted_lot_count",
        "weeks_with_defects",
        "first_detected",
        "last_detected",
        "total_defects",
        "days_span",
        "trend_classification",
        "missing_periods",
    ];

    pub fn is_recurring(&self) -> bool {
        self.trend_classification.is_recurring()
    }
}

// ==========================================
// DefectDrillDown - 单缺陷代码下钻结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefectDrillDown {
    pub defect_code: String,
    /// 有效事件明细（最新在前，同时间按 lot_id 升序）
    pub records: Vec<InspectionEvent>,
    pub message: String,
    pub missing_weeks: Vec<String>,
    pub distinct_lot_count: usize,
    pub distinct_week_count: usize,
}

impl DefectDrillDown {
    pub fn has_gaps(&self) -> bool {
        !self.missing_weeks.is_empty()
    }
}
