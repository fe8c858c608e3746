// ==========================================
// 钢厂质检缺陷复发分析 - SQLite 连接与建库
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 建库脚本 / 演示数据脚本随二进制内嵌
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version（与 scripts/schema.sql 对齐）
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 建表脚本
pub const SCHEMA_SQL: &str = include_str!("../scripts/schema.sql");

/// 演示数据脚本
pub const SEED_SQL: &str = include_str!("../scripts/seed.sql");

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let mut conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    crate::perf::install_sqlite_tracing(&mut conn);
    Ok(conn)
}

/// 建表（幂等）
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    tracing::info!(version = CURRENT_SCHEMA_VERSION, "schema initialized");
    Ok(())
}

/// 写入演示数据（在单个事务中执行）
pub fn seed_demo_data(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(&format!("BEGIN;\n{}\nCOMMIT;", SEED_SQL))?;
    tracing::info!("demo data seeded");
    Ok(())
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

/// 校验 schema 版本，不一致时仅告警
pub fn warn_if_schema_outdated(conn: &Connection) -> rusqlite::Result<()> {
    match read_schema_version(conn)? {
        Some(v) if v == CURRENT_SCHEMA_VERSION => {}
        Some(v) => tracing::warn!(
            found = v,
            expected = CURRENT_SCHEMA_VERSION,
            "schema version mismatch"
        ),
        None => tracing::warn!("schema_version table missing, run init_db first"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        assert_eq!(read_schema_version(&conn).unwrap(), None);

        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap();
        assert_eq!(read_schema_version(&conn).unwrap(), Some(CURRENT_SCHEMA_VERSION));
    }

    #[test]
    fn test_seed_demo_data() {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        init_schema(&conn).unwrap();
        seed_demo_data(&conn).unwrap();

        let events: i64 = conn
            .query_row("SELECT COUNT(*) FROM inspection_event", [], |row| row.get(0))
            .unwrap();
        assert!(events >= 6);

        // 无缺陷记录的 defect_type_id 为空
        let defect_free: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM inspection_event WHERE defect_type_id IS NULL",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert!(defect_free >= 1);
    }
}
