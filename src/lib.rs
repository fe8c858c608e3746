// ==========================================
// 钢厂质检缺陷复发分析 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 质量决策支持（分析结论须可解释，人工最终判定）
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "en");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 分类 / 缺失周 / 排序 / 下钻
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 运行期配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 性能观测
pub mod perf;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 文本呈现 - 表格/CSV
pub mod presentation;

// 应用层 - 组装数据源与 API
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{IsoWeek, TrendClassification};

// 领域实体
pub use domain::{DefectDrillDown, DefectTrendSummary, InspectionEvent, RawEventFrame};

// 引擎
pub use engine::{
    EventNormalizer, InspectionEventGateway, MissingWeekDetector, RecurringDefectAnalyzer,
    TrendClassifier, TrendRanker,
};

// API
pub use api::{ApiError, ApiResult, DefectAnalysisApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "钢厂质检缺陷复发分析";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
