// ==========================================
// 钢厂质检缺陷复发分析 - 缺失周检测
// ==========================================
// 输入: 一组时间戳（单个分组或单个缺陷代码）
// 输出: 首末观测周之间（含两端）缺少事件的 ISO 周标签
// ==========================================

use crate::domain::types::IsoWeek;
use chrono::NaiveDateTime;
use std::collections::BTreeSet;

// ==========================================
// MissingWeekDetector - 缺失周检测器
// ==========================================
// 无状态引擎
#[derive(Debug, Clone, Copy, Default)]
pub struct MissingWeekDetector;

impl MissingWeekDetector {
    pub fn new() -> Self {
        Self
    }

    /// 已观测的 ISO 周（去重、升序），忽略无法解析的时间戳
    pub fn observed_weeks<'a, I>(&self, timestamps: I) -> BTreeSet<IsoWeek>
    where
        I: IntoIterator<Item = &'a Option<NaiveDateTime>>,
    {
        timestamps
            .into_iter()
            .filter_map(|ts| ts.map(IsoWeek::from_datetime))
            .collect()
    }

    /// 首末观测周之间的完整连续周序列（步长 7 天）
    pub fn full_range(&self, observed: &BTreeSet<IsoWeek>) -> Vec<IsoWeek> {
        let (first, last) = match (observed.first(), observed.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return Vec::new(),
        };

        let mut weeks = Vec::new();
        let mut cursor = Some(first);
        // 到达 NaiveDate 上界时 succ 返回 None，循环终止
        while let Some(week) = cursor.filter(|w| *w <= last) {
            weeks.push(week);
            cursor = week.succ();
        }
        weeks
    }

    /// 缺失周（按时间顺序）
    pub fn missing_weeks(&self, observed: &BTreeSet<IsoWeek>) -> Vec<IsoWeek> {
        self.full_range(observed)
            .into_iter()
            .filter(|week| !observed.contains(week))
            .collect()
    }

    /// 缺失周标签（YYYY-Www）
    pub fn detect<'a, I>(&self, timestamps: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a Option<NaiveDateTime>>,
    {
        let observed = self.observed_weeks(timestamps);
        self.missing_weeks(&observed)
            .iter()
            .map(IsoWeek::label)
            .collect()
    }
}
