// ==========================================
// 钢厂质检缺陷复发分析 - 领域类型定义
// ==========================================
// 趋势分类: 封闭枚举 + 显式优先级表
// ISO 周: 周一为起点
// ==========================================

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 趋势分类 (Trend Classification)
// ==========================================
// 序列化格式: 面向操作员的展示文案
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrendClassification {
    #[serde(rename = "Recurring - Critical")]
    RecurringCritical, // 复发-严重
    #[serde(rename = "Recurring - High Frequency")]
    RecurringHighFrequency, // 复发-高频
    #[serde(rename = "Isolated Incident")]
    IsolatedIncident, // 孤立事件
    #[serde(rename = "Insufficient Data")]
    InsufficientData, // 数据不足
}

impl TrendClassification {
    /// 全部分类，按优先级从高到低
    pub const ALL: [TrendClassification; 4] = [
        TrendClassification::RecurringCritical,
        TrendClassification::RecurringHighFrequency,
        TrendClassification::IsolatedIncident,
        TrendClassification::InsufficientData,
    ];

    /// 排序档位（越小越优先）
    pub fn priority_tier(&self) -> u8 {
        match self {
            TrendClassification::RecurringCritical => 0,
            TrendClassification::RecurringHighFrequency => 1,
            TrendClassification::IsolatedIncident => 2,
            TrendClassification::InsufficientData => 3,
        }
    }

    /// 是否属于复发类
    pub fn is_recurring(&self) -> bool {
        matches!(
            self,
            TrendClassification::RecurringCritical | TrendClassification::RecurringHighFrequency
        )
    }

    /// 展示文案
    pub fn label(&self) -> &'static str {
        match self {
            TrendClassification::RecurringCritical => "Recurring - Critical",
            TrendClassification::RecurringHighFrequency => "Recurring - High Frequency",
            TrendClassification::IsolatedIncident => "Isolated Incident",
            TrendClassification::InsufficientData => "Insufficient Data",
        }
    }

    /// 从展示文案解析（未知文案返回 None）
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.label() == label.trim())
    }
}

impl fmt::Display for TrendClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ==========================================
// ISO 周 (ISO Week)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IsoWeek {
    /// 周一日期
    pub week_start: NaiveDate,
}

impl IsoWeek {
    /// 由任意日期得到所在 ISO 周
    ///
    /// 日期范围下界附近无法回退到周一时，以该日期本身为起点
    pub fn from_date(date: NaiveDate) -> Self {
        let offset = date.weekday().num_days_from_monday() as i64;
        Self {
            week_start: date
                .checked_sub_signed(Duration::days(offset))
                .unwrap_or(date),
        }
    }

    pub fn from_datetime(ts: NaiveDateTime) -> Self {
        Self::from_date(ts.date())
    }

    /// ISO 年（跨年周按 ISO 规则归属）
    pub fn iso_year(&self) -> i32 {
        self.week_start.iso_week().year()
    }

    /// ISO 周序号 (1..=53)
    pub fn iso_week(&self) -> u32 {
        self.week_start.iso_week().week()
    }

    /// 下一周（超出 NaiveDate 范围返回 None）
    pub fn succ(&self) -> Option<Self> {
        self.week_start
            .checked_add_signed(Duration::days(7))
            .map(|week_start| Self { week_start })
    }

    /// 周标签: YYYY-Www（周序号两位补零）
    pub fn label(&self) -> String {
        format!("{}-W{:02}", self.iso_year(), self.iso_week())
    }
}

impl fmt::Display for IsoWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_tiers_are_ordered() {
        let tiers: Vec<u8> = TrendClassification::ALL
            .iter()
            .map(|c| c.priority_tier())
            .collect();
        assert_eq!(tiers, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_label_roundtrip_and_serde() {
        for c in TrendClassification::ALL {
            assert_eq!(TrendClassification::from_label(c.label()), Some(c));
        }
        assert_eq!(TrendClassification::from_label("Something Else"), None);
        let json = serde_json::to_string(&TrendClassification::RecurringCritical).unwrap();
        assert_eq!(json, "\"Recurring - Critical\"");
    }

    #[test]
    fn test_iso_week_label_zero_padded() {
        let week = IsoWeek::from_date(NaiveDate::from_ymd_opt(2026, 1, 15).unwrap());
        assert_eq!(week.week_start, NaiveDate::from_ymd_opt(2026, 1, 12).unwrap());
        assert_eq!(week.label(), "2026-W03");
    }

    #[test]
    fn test_iso_week_year_boundary() {
        // 2026-01-01 是周四，所在周从 2025-12-29 开始，属于 2026-W01
        let week = IsoWeek::from_date(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        assert_eq!(week.week_start, NaiveDate::from_ymd_opt(2025, 12, 29).unwrap());
        assert_eq!(week.label(), "2026-W01");

        // 2027-01-01 是周五，属于 2026-W53
        let week = IsoWeek::from_date(NaiveDate::from_ymd_opt(2027, 1, 1).unwrap());
        assert_eq!(week.label(), "2026-W53");
    }

    #[test]
    fn test_succ_stops_at_date_range_end() {
        let week = IsoWeek::from_date(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        assert_eq!(
            week.succ().map(|w| w.week_start),
            NaiveDate::from_ymd_opt(2026, 1, 5)
        );

        let last = IsoWeek::from_date(NaiveDate::MAX);
        assert_eq!(last.succ(), None);
    }
}
