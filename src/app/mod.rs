// ==========================================
// 钢厂质检缺陷复发分析 - 应用层
// ==========================================
// 职责: 组装数据源、配置与 API，供 CLI 入口使用
// ==========================================

pub mod state;

// 重导出
pub use state::{AppState, DataSource};
