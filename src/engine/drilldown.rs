// ==========================================
// 钢厂质检缺陷复发分析 - 缺陷下钻构建器
// ==========================================
// 职责: 单个缺陷代码的明细行 + 可解释说明 + 缺失周
// 约束: 阈值与分类器完全一致，列表与下钻结论不得互相矛盾
// 说明文案选择（首个命中）:
// 1) 无有效事件
// 2) 批次 < 2 或 周数 < 2 → 数据不足
// 3) 存在缺失周           → 复发 + 缺失周列表
// 4) 否则                 → 复发 + 周覆盖连续
// ==========================================

use crate::domain::inspection::InspectionEvent;
use crate::domain::trend::DefectDrillDown;
use crate::engine::classifier::{meets_recurring_threshold, MIN_RECURRING_LOTS, MIN_RECURRING_WEEKS};
use crate::engine::missing_week::MissingWeekDetector;
use crate::i18n::DEFAULT_LOCALE;
use std::cmp::Ordering;
use std::collections::BTreeSet;

// ==========================================
// DrillDownBuilder - 下钻构建器
// ==========================================
#[derive(Debug, Clone)]
pub struct DrillDownBuilder {
    locale: String,
    detector: MissingWeekDetector,
}

impl Default for DrillDownBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DrillDownBuilder {
    /// 使用默认语言（en）
    pub fn new() -> Self {
        Self::with_locale(DEFAULT_LOCALE)
    }

    /// 指定说明文案语言（"en" / "zh-CN"）
    pub fn with_locale(locale: &str) -> Self {
        Self {
            locale: locale.to_string(),
            detector: MissingWeekDetector::new(),
        }
    }

    /// 构建下钻结果
    pub fn build(&self, events: &[InspectionEvent], defect_code: &str) -> DefectDrillDown {
        let mut records: Vec<InspectionEvent> = events
            .iter()
            .filter(|e| e.qualifies_for(defect_code))
            .cloned()
            .collect();
        records.sort_by(compare_detail_rows);

        let distinct_lot_count = records
            .iter()
            .filter(|e| !e.lot_id.is_empty())
            .map(|e| e.lot_id.as_str())
            .collect::<BTreeSet<_>>()
            .len();

        let observed = self
            .detector
            .observed_weeks(records.iter().map(|e| &e.inspected_at));
        let distinct_week_count = observed.len();
        let missing_weeks: Vec<String> = self
            .detector
            .missing_weeks(&observed)
            .iter()
            .map(|w| w.label())
            .collect();

        let message = self.select_message(
            defect_code,
            records.len(),
            distinct_lot_count,
            distinct_week_count,
            &missing_weeks,
        );

        tracing::debug!(
            defect_code,
            records = records.len(),
            distinct_lot_count,
            distinct_week_count,
            missing_weeks = missing_weeks.len(),
            "defect drill-down built"
        );

        DefectDrillDown {
            defect_code: defect_code.to_string(),
            records,
            message,
            missing_weeks,
            distinct_lot_count,
            distinct_week_count,
        }
    }

    fn select_message(
        &self,
        defect_code: &str,
        record_count: usize,
        lots: usize,
        weeks: usize,
        missing_weeks: &[String],
    ) -> String {
        let locale = self.locale.as_str();

        if record_count == 0 {
            return rust_i18n::t!("drilldown.no_events", locale = locale, code = defect_code)
                .to_string();
        }

        if !meets_recurring_threshold(lots, weeks) {
            return rust_i18n::t!(
                "drilldown.insufficient_data",
                locale = locale,
                code = defect_code,
                min_lots = MIN_RECURRING_LOTS,
                min_weeks = MIN_RECURRING_WEEKS,
                lots = lots,
                weeks = weeks
            )
            .to_string();
        }

        if !missing_weeks.is_empty() {
            return rust_i18n::t!(
                "drilldown.recurring_with_gaps",
                locale = locale,
                weeks = missing_weeks.join(", ")
            )
            .to_string();
        }

        rust_i18n::t!("drilldown.recurring_continuous", locale = locale).to_string()
    }
}

/// 明细排序: inspected_at 降序（无法解析的排最后），再按 lot_id 升序
fn compare_detail_rows(a: &InspectionEvent, b: &InspectionEvent) -> Ordering {
    match (a.inspected_at, b.inspected_at) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| a.lot_id.cmp(&b.lot_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn event(code: &str, lot: &str, y: i32, m: u32, d: u32, qty: u32) -> InspectionEvent {
        InspectionEvent {
            defect_code: Some(code.to_string()),
            severity: Some("Major".to_string()),
            lot_id: lot.to_string(),
            inspected_at: NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(9, 0, 0),
            qty_checked: 20,
            qty_defects: qty,
            disposition: None,
            notes: None,
            inspector_name: None,
        }
    }

    #[test]
    fn test_unknown_code_message() {
        let detail = DrillDownBuilder::new().build(&[event("WELD", "LOT-1", 2026, 1, 1, 1)], "XYZ");
        assert!(detail.records.is_empty());
        assert!(detail.missing_weeks.is_empty());
        assert!(detail.message.to_lowercase().contains("no defect events"));
        assert!(detail.message.contains("XYZ"));
    }

    #[test]
    fn test_single_lot_is_insufficient() {
        let events = vec![
            event("BURR", "LOT-3", 2026, 1, 1, 1),
            event("BURR", "LOT-3", 2026, 1, 20, 2),
        ];
        let detail = DrillDownBuilder::new().build(&events, "BURR");
        assert_eq!(detail.records.len(), 2);
        assert_eq!(detail.distinct_lot_count, 1);
        assert!(detail.message.contains("Insufficient data"));
        assert!(detail.message.contains("2 distinct lots"));
    }

    #[test]
    fn test_continuous_coverage_message() {
        let events = vec![
            event("SCALE", "LOT-1", 2026, 1, 5, 1),
            event("SCALE", "LOT-2", 2026, 1, 12, 1),
        ];
        let detail = DrillDownBuilder::new().build(&events, "SCALE");
        assert!(detail.missing_weeks.is_empty());
        assert_eq!(
            detail.message,
            "Recurring signal detected with continuous weekly coverage in observed range."
        );
    }

    #[test]
    fn test_rows_sorted_recent_first_then_lot() {
        let mut undated = event("PIT", "LOT-0", 2026, 1, 1, 1);
        undated.inspected_at = None;
        let events = vec![
            undated,
            event("PIT", "LOT-B", 2026, 1, 9, 1),
            event("PIT", "LOT-A", 2026, 1, 9, 1),
            event("PIT", "LOT-C", 2026, 1, 20, 1),
            event("PIT", "LOT-Z", 2026, 1, 21, 0),
        ];
        let detail = DrillDownBuilder::new().build(&events, "PIT");
        let lots: Vec<&str> = detail.records.iter().map(|e| e.lot_id.as_str()).collect();
        assert_eq!(lots, vec!["LOT-C", "LOT-A", "LOT-B", "LOT-0"]);
    }

    #[test]
    fn test_zh_cn_locale_message() {
        let detail = DrillDownBuilder::with_locale("zh-CN").build(&[], "WELD");
        assert!(detail.message.contains("WELD"));
        assert!(!detail.message.to_lowercase().contains("no defect events"));
    }
}
