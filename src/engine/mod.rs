// ==========================================
// 钢厂质检缺陷复发分析 - 引擎层
// ==========================================
// 职责: 归一化 / 聚合 / 分类 / 缺失周检测 / 排序 / 下钻
// 红线: 引擎不拼 SQL、不做 I/O，所有结论必须可解释
// ==========================================

pub mod aggregator;
pub mod analyzer;
pub mod classifier;
pub mod drilldown;
pub mod error;
pub mod gateway;
pub mod missing_week;
pub mod normalizer;
pub mod ranker;

// 重导出核心引擎
pub use aggregator::{DefectAggregator, DefectGroupStats};
pub use analyzer::RecurringDefectAnalyzer;
pub use classifier::{TrendClassifier, MIN_RECURRING_LOTS, MIN_RECURRING_WEEKS};
pub use drilldown::DrillDownBuilder;
pub use error::{ValidationError, ValidationResult};
pub use gateway::InspectionEventGateway;
pub use missing_week::MissingWeekDetector;
pub use normalizer::{EventNormalizer, NormalizeStats};
pub use ranker::TrendRanker;
