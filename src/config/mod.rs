// ==========================================
// 钢厂质检缺陷复发分析 - 配置层
// ==========================================
// 职责: 运行期配置解析
// 优先级: 环境变量 > config_kv 表 > 默认值
// 红线: 引擎不读取配置，开关由调用方显式传入
// ==========================================

pub mod config_manager;

pub use config_manager::{config_keys, ConfigManager, DEFAULT_SHOW_RECURRING_ONLY};

use crate::i18n::{normalize_locale, DEFAULT_LOCALE};
use crate::perf::is_truthy;
use std::path::PathBuf;

/// 环境变量名
pub mod env_keys {
    pub const DB_PATH: &str = "STEELWORKS_DB_PATH";
    pub const SHOW_RECURRING_ONLY: &str = "SHOW_RECURRING_ONLY";
    pub const LOCALE: &str = "STEELWORKS_LOCALE";
}

/// 数据目录名
const DATA_DIR_NAME: &str = "steelworks-defect";
/// 数据库文件名
const DB_FILE_NAME: &str = "steelworks_defect.db";

// ==========================================
// AppConfig - 运行期配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: String,
    pub show_recurring_only: bool,
    pub locale: String,
}

impl AppConfig {
    /// 从进程环境解析（不访问数据库）
    pub fn from_env() -> Self {
        Self::resolve(|key| std::env::var(key).ok(), None)
    }

    /// 解析配置
    ///
    /// # 参数
    /// - env: 环境变量读取函数（便于测试注入）
    /// - store: 可选的 config_kv 配置源
    pub fn resolve<F>(env: F, store: Option<&ConfigManager>) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_value = |key: &str| {
            env(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let db_path = env_value(env_keys::DB_PATH).unwrap_or_else(get_default_db_path);

        let show_recurring_only = match env_value(env_keys::SHOW_RECURRING_ONLY) {
            Some(v) => is_truthy(&v),
            None => store
                .and_then(|s| match s.get_default_recurring_filter() {
                    Ok(v) => Some(v),
                    Err(e) => {
                        tracing::warn!("读取 show_recurring_only 失败，使用默认值: {}", e);
                        None
                    }
                })
                .unwrap_or(DEFAULT_SHOW_RECURRING_ONLY),
        };

        let locale = match env_value(env_keys::LOCALE) {
            Some(v) => normalize_locale(&v).to_string(),
            None => store
                .and_then(|s| s.get_locale().ok())
                .unwrap_or_else(|| DEFAULT_LOCALE.to_string()),
        };

        Self {
            db_path,
            show_recurring_only,
            locale,
        }
    }
}

/// 获取默认数据库路径
///
/// # 返回
/// - 环境变量 STEELWORKS_DB_PATH（若设置）
/// - 用户数据目录/steelworks-defect/steelworks_defect.db
/// - 回退: ./steelworks_defect.db
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(env_keys::DB_PATH) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from(".").join(DB_FILE_NAME);

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join(DATA_DIR_NAME);
        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join(DB_FILE_NAME);
        }
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_env_takes_precedence() {
        let config = AppConfig::resolve(
            env_of(&[
                (env_keys::DB_PATH, "/tmp/quality.db"),
                (env_keys::SHOW_RECURRING_ONLY, "no"),
                (env_keys::LOCALE, "zh"),
            ]),
            None,
        );
        assert_eq!(config.db_path, "/tmp/quality.db");
        assert!(!config.show_recurring_only);
        assert_eq!(config.locale, "zh-CN");
    }

    #[test]
    fn test_defaults_without_env_or_store() {
        let config = AppConfig::resolve(env_of(&[(env_keys::DB_PATH, "x.db")]), None);
        assert!(config.show_recurring_only);
        assert_eq!(config.locale, "en");
    }

    #[test]
    fn test_default_db_path_has_db_extension() {
        let path = get_default_db_path();
        assert!(!path.is_empty());
        assert!(path.ends_with(".db"));
    }
}
