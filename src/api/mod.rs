// ==========================================
// 钢厂质检缺陷复发分析 - API 层
// ==========================================
// 职责: 提供业务 API 接口，供 CLI 调用
// ==========================================

pub mod defect_analysis_api;
pub mod error;

// 重导出核心类型
pub use defect_analysis_api::DefectAnalysisApi;
pub use error::{ApiError, ApiResult};
