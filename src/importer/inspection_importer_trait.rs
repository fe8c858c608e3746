// ==========================================
// 钢厂质检缺陷复发分析 - 质检事件导入 Trait
// ==========================================
// 职责: 定义导入接口（不包含实现）
// ==========================================

use crate::importer::error::ImportResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ==========================================
// ImportBatchSummary - 单文件导入汇总
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportBatchSummary {
    pub batch_id: String,
    pub file_name: String,
    pub total_rows: usize,
    pub imported_rows: usize,
    /// 满足复发分析前提的行数（有缺陷编码、有严重度、缺陷数 > 0）
    pub qualifying_rows: usize,
    pub unparseable_timestamps: usize,
    pub elapsed_ms: u64,
}

// ==========================================
// InspectionImporter Trait
// ==========================================
// 实现者: InspectionImporterImpl
#[async_trait]
pub trait InspectionImporter: Send + Sync {
    /// 导入单个文件（.csv / .xlsx / .xls）
    ///
    /// # 导入流程
    /// 1. 文件解析（阻塞线程池）
    /// 2. 表头校验 + 字段归一化
    /// 3. 落库（单事务）
    async fn import_file<P: AsRef<Path> + Send>(&self, file_path: P)
        -> ImportResult<ImportBatchSummary>;

    /// 批量导入多个文件（并发执行）
    ///
    /// 每个文件独立成批，单个文件失败不影响其他文件
    async fn batch_import<P: AsRef<Path> + Send + Sync>(
        &self,
        file_paths: Vec<P>,
    ) -> Vec<ImportResult<ImportBatchSummary>>;
}
