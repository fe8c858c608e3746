// ==========================================
// 钢厂质检缺陷复发分析 - 领域层
// ==========================================
// 职责: 定义质检事件、趋势汇总、下钻结果等领域实体
// ==========================================

pub mod inspection;
pub mod trend;
pub mod types;

// 重导出核心类型
pub use inspection::{InspectionEvent, RawEventFrame};
pub use trend::{DefectDrillDown, DefectTrendSummary};
pub use types::{IsoWeek, TrendClassification};
