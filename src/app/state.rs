// ==========================================
// 钢厂质检缺陷复发分析 - 应用状态
// ==========================================
// 职责: 按数据源组装 Gateway → DefectAnalysisApi
// 配置: 环境变量 > config_kv 表 > 默认值
// ==========================================

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::api::DefectAnalysisApi;
use crate::config::{AppConfig, ConfigManager};
use crate::db::{open_sqlite_connection, warn_if_schema_outdated};
use crate::engine::gateway::InspectionEventGateway;
use crate::importer::FileEventSource;
use crate::repository::InspectionEventRepository;

/// 质检事件数据源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// SQLite 数据库
    Database(String),
    /// CSV / Excel 文件（只读分析，不落库）
    File(PathBuf),
}

// ==========================================
// AppState - 应用状态
// ==========================================
pub struct AppState {
    /// 生效配置
    pub config: AppConfig,

    /// 缺陷趋势分析API
    pub defect_api: Arc<DefectAnalysisApi>,

    /// 配置管理器（仅数据库数据源）
    pub config_manager: Option<Arc<ConfigManager>>,
}

impl AppState {
    /// 创建AppState
    ///
    /// # 参数
    /// - source: 数据源
    /// - env: 环境变量读取函数
    pub fn new<F>(source: DataSource, env: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        match source {
            DataSource::Database(db_path) => {
                tracing::info!("初始化AppState，数据库路径: {}", db_path);

                let conn = open_sqlite_connection(&db_path)
                    .map_err(|e| format!("无法打开数据库: {}", e))?;
                if let Err(e) = warn_if_schema_outdated(&conn) {
                    tracing::warn!("schema 版本检查失败(将继续启动): {}", e);
                }
                let conn = Arc::new(Mutex::new(conn));

                let config_manager = Arc::new(ConfigManager::from_connection(conn.clone()));
                let mut config = AppConfig::resolve(env, Some(&config_manager));
                config.db_path = db_path;

                let repo: Arc<dyn InspectionEventGateway> =
                    Arc::new(InspectionEventRepository::from_connection(conn));

                Ok(Self {
                    defect_api: Arc::new(DefectAnalysisApi::with_locale(repo, &config.locale)),
                    config,
                    config_manager: Some(config_manager),
                })
            }
            DataSource::File(path) => {
                tracing::info!("初始化AppState，数据文件: {}", path.display());

                let config = AppConfig::resolve(env, None);
                let source: Arc<dyn InspectionEventGateway> = Arc::new(FileEventSource::new(path));

                Ok(Self {
                    defect_api: Arc::new(DefectAnalysisApi::with_locale(source, &config.locale)),
                    config,
                    config_manager: None,
                })
            }
        }
    }
}
