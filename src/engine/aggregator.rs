// ==========================================
// 钢厂质检缺陷复发分析 - 缺陷分组聚合
// ==========================================
// 职责: 过滤有效事件，按 (defect_code, severity) 分组并累计统计
// 分组顺序: 按键字典序（与输入行顺序无关）
// ==========================================

use crate::domain::inspection::InspectionEvent;
use crate::domain::types::IsoWeek;
use chrono::NaiveDateTime;
use std::collections::{BTreeMap, BTreeSet};

/// 分组键
pub type GroupKey = (String, String);

// ==========================================
// DefectGroupStats - 单个分组的累计统计
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefectGroupStats {
    pub defect_code: String,
    pub severity: String,
    /// 去重批次（空批次号不计入）
    pub lots: BTreeSet<String>,
    /// 去重 ISO 周（仅有效时间戳）
    pub weeks: BTreeSet<IsoWeek>,
    /// 原始时间戳（含无法解析的 None），供缺失周检测使用
    pub timestamps: Vec<Option<NaiveDateTime>>,
    pub first_detected: Option<NaiveDateTime>,
    pub last_detected: Option<NaiveDateTime>,
    pub total_defects: u64,
}

impl DefectGroupStats {
    fn new(defect_code: String, severity: String) -> Self {
        Self {
            defect_code,
            severity,
            lots: BTreeSet::new(),
            weeks: BTreeSet::new(),
            timestamps: Vec::new(),
            first_detected: None,
            last_detected: None,
            total_defects: 0,
        }
    }

    fn accumulate(&mut self, event: &InspectionEvent) {
        if !event.lot_id.is_empty() {
            self.lots.insert(event.lot_id.clone());
        }

        if let Some(ts) = event.inspected_at {
            self.weeks.insert(IsoWeek::from_datetime(ts));
            self.first_detected = Some(self.first_detected.map_or(ts, |cur| cur.min(ts)));
            self.last_detected = Some(self.last_detected.map_or(ts, |cur| cur.max(ts)));
        }

        self.timestamps.push(event.inspected_at);
        self.total_defects += u64::from(event.qty_defects);
    }

    pub fn impacted_lot_count(&self) -> usize {
        self.lots.len()
    }

    pub fn weeks_with_defects(&self) -> usize {
        self.weeks.len()
    }

    /// last_detected - first_detected（整天，向零取整）
    pub fn days_span(&self) -> Option<i64> {
        match (self.first_detected, self.last_detected) {
            (Some(first), Some(last)) => Some((last - first).num_days()),
            _ => None,
        }
    }
}

// ==========================================
// DefectAggregator - 分组聚合器
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct DefectAggregator;

impl DefectAggregator {
    pub fn new() -> Self {
        Self
    }

    /// 有效事件子集
    pub fn qualifying<'a>(&self, events: &'a [InspectionEvent]) -> Vec<&'a InspectionEvent> {
        events.iter().filter(|e| e.is_qualifying()).collect()
    }

    /// 分组聚合；无有效事件时返回空列表
    pub fn aggregate(&self, events: &[InspectionEvent]) -> Vec<DefectGroupStats> {
        let mut groups: BTreeMap<GroupKey, DefectGroupStats> = BTreeMap::new();

        for event in self.qualifying(events) {
            let (code, severity) = match (&event.defect_code, &event.severity) {
                (Some(code), Some(severity)) => (code, severity),
                _ => continue,
            };

            groups
                .entry((code.clone(), severity.clone()))
                .or_insert_with(|| DefectGroupStats::new(code.clone(), severity.clone()))
                .accumulate(event);
        }

        tracing::debug!(
            input_events = events.len(),
            groups = groups.len(),
            "defect groups aggregated"
        );

        groups.into_values().collect()
    }
}
