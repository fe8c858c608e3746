// ==========================================
// 钢厂质检缺陷复发分析 - 缺陷趋势分析 API
// ==========================================
// 职责: 趋势列表、缺陷下钻、缺陷代码列表
// 数据流: 网关读取原始集合 → 分析器 → 结构化结果
// ==========================================

use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::trend::{DefectDrillDown, DefectTrendSummary};
use crate::engine::analyzer::RecurringDefectAnalyzer;
use crate::engine::gateway::InspectionEventGateway;
use crate::perf::PerfGuard;

// ==========================================
// DefectAnalysisApi - 缺陷趋势分析 API
// ==========================================

/// 缺陷趋势分析API
///
/// 职责：
/// 1. 趋势列表（可选仅复发）
/// 2. 单缺陷下钻（明细 + 缺失周 + 说明）
/// 3. 缺陷代码列表（下钻选择）
pub struct DefectAnalysisApi {
    gateway: Arc<dyn InspectionEventGateway>,
    analyzer: RecurringDefectAnalyzer,
}

impl DefectAnalysisApi {
    /// 创建新的DefectAnalysisApi实例（说明文案使用默认语言）
    pub fn new(gateway: Arc<dyn InspectionEventGateway>) -> Self {
        Self {
            gateway,
            analyzer: RecurringDefectAnalyzer::new(),
        }
    }

    /// 指定说明文案语言
    pub fn with_locale(gateway: Arc<dyn InspectionEventGateway>, locale: &str) -> Self {
        Self {
            gateway,
            analyzer: RecurringDefectAnalyzer::with_locale(locale),
        }
    }

    /// 查询缺陷趋势列表
    ///
    /// # 参数
    /// - recurring_only: 仅保留 "Recurring - *" 分类
    ///
    /// # 返回
    /// - Ok(Vec<DefectTrendSummary>): 已排序的趋势汇总
    /// - Err(ApiError): 数据源读取失败或输入缺列
    pub fn get_defect_trend_list(&self, recurring_only: bool) -> ApiResult<Vec<DefectTrendSummary>> {
        let _perf = PerfGuard::new("api.get_defect_trend_list");

        let frame = self.gateway.fetch_inspection_events()?;
        let summaries = self.analyzer.classify_frame(&frame)?;
        let total = summaries.len();
        let result = self.analyzer.apply_recurring_filter(summaries, recurring_only);

        tracing::info!(total, shown = result.len(), recurring_only, "defect trend list built");
        Ok(result)
    }

    /// 查询单个缺陷代码的下钻
    ///
    /// # 参数
    /// - defect_code: 缺陷代码（前后空白会被去除）
    ///
    /// # 返回
    /// - Ok(DefectDrillDown): 无匹配事件时返回空明细 + 说明
    /// - Err(ApiError::InvalidInput): 缺陷代码为空
    pub fn get_defect_drilldown(&self, defect_code: &str) -> ApiResult<DefectDrillDown> {
        let code = defect_code.trim();
        if code.is_empty() {
            return Err(ApiError::InvalidInput("缺陷代码不能为空".to_string()));
        }

        let _perf = PerfGuard::new("api.get_defect_drilldown");

        let frame = self.gateway.fetch_events_for_defect(code)?;
        let detail = self.analyzer.drill_down_frame(&frame, code)?;

        tracing::info!(
            defect_code = code,
            records = detail.records.len(),
            missing_weeks = detail.missing_weeks.len(),
            "defect drill-down built"
        );
        Ok(detail)
    }

    /// 查询可下钻的缺陷代码（去重、升序）
    pub fn list_defect_codes(&self) -> ApiResult<Vec<String>> {
        let frame = self.gateway.fetch_inspection_events()?;
        let summaries = self.analyzer.classify_frame(&frame)?;
        Ok(self.analyzer.defect_codes(&summaries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::inspection::RawEventFrame;
    use crate::repository::error::{RepositoryError, RepositoryResult};

    struct StaticGateway {
        frame: RawEventFrame,
    }

    impl InspectionEventGateway for StaticGateway {
        fn fetch_inspection_events(&self) -> RepositoryResult<RawEventFrame> {
            Ok(self.frame.clone())
        }
    }

    struct FailingGateway;

    impl InspectionEventGateway for FailingGateway {
        fn fetch_inspection_events(&self) -> RepositoryResult<RawEventFrame> {
            Err(RepositoryError::DatabaseConnectionError("offline".to_string()))
        }
    }

    const COLUMNS: [&str; 5] = ["defect_code", "severity", "lot_id", "inspected_at", "qty_defects"];

    fn frame(rows: &[[&str; 5]]) -> RawEventFrame {
        let mut frame = RawEventFrame::new(COLUMNS.iter().map(|c| c.to_string()).collect());
        for row in rows {
            frame.push_row(COLUMNS.iter().copied().zip(row.iter().copied()));
        }
        frame
    }

    fn api(rows: &[[&str; 5]]) -> DefectAnalysisApi {
        DefectAnalysisApi::new(Arc::new(StaticGateway { frame: frame(rows) }))
    }

    #[test]
    fn test_trend_list_respects_recurring_filter() {
        let api = api(&[
            ["WELD", "Critical", "LOT-1", "2026-01-01 08:00:00", "2"],
            ["WELD", "Critical", "LOT-2", "2026-01-15 08:00:00", "1"],
            ["BURR", "Major", "LOT-3", "2026-01-08 08:00:00", "1"],
        ]);

        let all = api.get_defect_trend_list(false).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].defect_code, "WELD");

        let recurring = api.get_defect_trend_list(true).unwrap();
        assert_eq!(recurring.len(), 1);
        assert!(recurring[0].is_recurring());
    }

    #[test]
    fn test_blank_defect_code_rejected() {
        let api = api(&[]);
        let err = api.get_defect_drilldown("   ").unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }

    #[test]
    fn test_drilldown_trims_code() {
        let api = api(&[
            ["WELD", "Critical", "LOT-1", "2026-01-01 08:00:00", "2"],
            ["WELD", "Critical", "LOT-2", "2026-01-15 08:00:00", "1"],
        ]);
        let detail = api.get_defect_drilldown(" WELD ").unwrap();
        assert_eq!(detail.defect_code, "WELD");
        assert_eq!(detail.records.len(), 2);
        assert_eq!(detail.missing_weeks, vec!["2026-W02".to_string()]);
    }

    #[test]
    fn test_missing_columns_surface_as_validation_error() {
        let mut frame = RawEventFrame::new(vec!["defect_code".to_string()]);
        frame.push_row([("defect_code", "WELD")]);
        let api = DefectAnalysisApi::new(Arc::new(StaticGateway { frame }));

        let err = api.get_defect_trend_list(false).unwrap_err();
        assert!(matches!(err, ApiError::ValidationError(ref m) if m.contains("severity")));
    }

    #[test]
    fn test_gateway_error_propagates() {
        let api = DefectAnalysisApi::new(Arc::new(FailingGateway));
        assert!(matches!(
            api.list_defect_codes(),
            Err(ApiError::DatabaseConnectionError(_))
        ));
    }

    #[test]
    fn test_list_defect_codes_sorted() {
        let api = api(&[
            ["SCALE", "Major", "LOT-1", "2026-01-05 08:00:00", "1"],
            ["BURR", "Major", "LOT-3", "2026-01-08 08:00:00", "1"],
            ["POR", "Minor", "LOT-4", "2026-01-08 08:00:00", "0"],
        ]);
        assert_eq!(api.list_defect_codes().unwrap(), vec!["BURR", "SCALE"]);
    }
}
