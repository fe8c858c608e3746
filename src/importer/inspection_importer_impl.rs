// ==========================================
// 钢厂质检缺陷复发分析 - 质检事件导入器实现
// ==========================================
// 流程: 解析 → 表头校验 → 归一化 → 落库
// ==========================================

use crate::engine::normalizer::EventNormalizer;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::inspection_importer_trait::{ImportBatchSummary, InspectionImporter};
use crate::repository::InspectionEventRepository;
use async_trait::async_trait;
use futures::future::join_all;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// InspectionImporterImpl
// ==========================================
pub struct InspectionImporterImpl {
    repo: Arc<InspectionEventRepository>,
    normalizer: EventNormalizer,
}

impl InspectionImporterImpl {
    pub fn new(repo: Arc<InspectionEventRepository>) -> Self {
        Self {
            repo,
            normalizer: EventNormalizer::new(),
        }
    }

    async fn import_path(&self, path: PathBuf) -> ImportResult<ImportBatchSummary> {
        let start = Instant::now();
        let batch_id = Uuid::new_v4().to_string();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }
        info!(batch_id = %batch_id, file = %file_name, "开始导入质检事件");

        // === 步骤 1: 解析文件 ===
        let parse_path = path.clone();
        let frame = tokio::task::spawn_blocking(move || UniversalFileParser.parse(parse_path))
            .await?
            .map_err(|e| {
                error!(error = %e, "文件解析失败");
                e
            })?;
        debug!(rows = frame.len(), columns = frame.columns.len(), "文件解析完成");

        // === 步骤 2: 表头校验 + 归一化 ===
        let (events, stats) = self.normalizer.normalize_with_stats(&frame)?;
        if stats.unparseable_timestamps > 0 {
            warn!(
                count = stats.unparseable_timestamps,
                "存在无法解析的检验时间，按空值入库"
            );
        }
        let qualifying_rows = events.iter().filter(|e| e.is_qualifying()).count();

        // === 步骤 3: 落库 ===
        let repo = Arc::clone(&self.repo);
        let insert_batch_id = batch_id.clone();
        let imported_rows =
            tokio::task::spawn_blocking(move || repo.insert_batch(&insert_batch_id, &events))
                .await??;

        let summary = ImportBatchSummary {
            batch_id,
            file_name,
            total_rows: stats.total_rows,
            imported_rows,
            qualifying_rows,
            unparseable_timestamps: stats.unparseable_timestamps,
            elapsed_ms: start.elapsed().as_millis() as u64,
        };
        info!(
            batch_id = %summary.batch_id,
            imported = summary.imported_rows,
            qualifying = summary.qualifying_rows,
            elapsed_ms = summary.elapsed_ms,
            "导入完成"
        );
        Ok(summary)
    }
}

#[async_trait]
impl InspectionImporter for InspectionImporterImpl {
    #[instrument(skip(self, file_path))]
    async fn import_file<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
    ) -> ImportResult<ImportBatchSummary> {
        self.import_path(file_path.as_ref().to_path_buf()).await
    }

    async fn batch_import<P: AsRef<Path> + Send + Sync>(
        &self,
        file_paths: Vec<P>,
    ) -> Vec<ImportResult<ImportBatchSummary>> {
        let tasks = file_paths
            .iter()
            .map(|p| self.import_path(p.as_ref().to_path_buf()));
        let results = join_all(tasks).await;

        let failed = results.iter().filter(|r| r.is_err()).count();
        info!(files = results.len(), failed, "批量导入完成");
        results
    }
}
