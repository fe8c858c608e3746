// ==========================================
// 钢厂质检缺陷复发分析 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::db::open_sqlite_connection;
use crate::i18n::{normalize_locale, DEFAULT_LOCALE};
use crate::perf::is_truthy;
use rusqlite::{params, Connection};
use std::collections::BTreeMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

/// config_kv 键名
pub mod config_keys {
    /// 列表视图默认仅显示复发缺陷
    pub const SHOW_RECURRING_ONLY: &str = "show_recurring_only";
    /// 说明文案语言
    pub const LOCALE: &str = "locale";
}

/// 默认值
pub const DEFAULT_SHOW_RECURRING_ONLY: bool = true;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 写入 global scope 配置（存在则覆盖）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES ('global', ?1, ?2, datetime('now'))
            ON CONFLICT(scope_id, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![key, value],
        )?;

        tracing::info!(key, value, "config updated");
        Ok(())
    }

    /// 获取所有 global 配置（按键排序）
    pub fn list_global_configs(&self) -> Result<BTreeMap<String, String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut configs = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            configs.insert(key, value);
        }
        Ok(configs)
    }

    /// 列表视图默认是否仅显示复发缺陷
    pub fn get_default_recurring_filter(&self) -> Result<bool, Box<dyn Error>> {
        Ok(self
            .get_global_config_value(config_keys::SHOW_RECURRING_ONLY)?
            .map(|v| is_truthy(&v))
            .unwrap_or(DEFAULT_SHOW_RECURRING_ONLY))
    }

    /// 说明文案语言
    pub fn get_locale(&self) -> Result<String, Box<dyn Error>> {
        Ok(self
            .get_global_config_value(config_keys::LOCALE)?
            .map(|v| normalize_locale(&v).to_string())
            .unwrap_or_else(|| DEFAULT_LOCALE.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{configure_sqlite_connection, init_schema};

    fn manager() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        init_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn)))
    }

    #[test]
    fn test_defaults_when_unset() {
        let m = manager();
        assert_eq!(m.get_global_config_value("missing").unwrap(), None);
        assert!(m.get_default_recurring_filter().unwrap());
        assert_eq!(m.get_locale().unwrap(), "en");
    }

    #[test]
    fn test_set_and_override() {
        let m = manager();
        m.set_global_config_value(config_keys::SHOW_RECURRING_ONLY, "off").unwrap();
        assert!(!m.get_default_recurring_filter().unwrap());

        m.set_global_config_value(config_keys::SHOW_RECURRING_ONLY, "Yes").unwrap();
        assert!(m.get_default_recurring_filter().unwrap());

        m.set_global_config_value(config_keys::LOCALE, "zh_CN").unwrap();
        assert_eq!(m.get_locale().unwrap(), "zh-CN");

        let all = m.list_global_configs().unwrap();
        assert_eq!(all.len(), 2);
    }
}
