// ==========================================
// 钢厂质检缺陷复发分析 - 质检事件数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑（分类/过滤交给引擎）
// 读取: inspection_event ⨝ lot ⟕ inspector ⟕ defect_type
//       无缺陷的质检记录 defect_type_id 为空，因此缺陷类型使用 LEFT JOIN
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::inspection::{InspectionEvent, RawEventFrame};
use crate::engine::gateway::InspectionEventGateway;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, OptionalExtension, Params, Row};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// 落库时间格式
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const SELECT_EVENTS_SQL: &str = r#"
    SELECT
        dt.defect_id,
        dt.severity,
        l.normalized_lot_id,
        ie.inspection_timestamp,
        ie.qty_checked,
        ie.qty_defects,
        ie.disposition,
        ie.notes,
        i.inspector_name
    FROM inspection_event ie
    JOIN lot l ON l.id = ie.lot_id
    LEFT JOIN inspector i ON i.id = ie.inspector_id
    LEFT JOIN defect_type dt ON dt.id = ie.defect_type_id
"#;

// ==========================================
// InspectionEventRepository - 质检事件仓储
// ==========================================
pub struct InspectionEventRepository {
    conn: Arc<Mutex<Connection>>,
}

impl InspectionEventRepository {
    /// 创建新的仓储实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 查询
    // ==========================================

    /// 读取全部质检事件（按落库顺序）
    pub fn find_all(&self) -> RepositoryResult<RawEventFrame> {
        let conn = self.get_conn()?;
        let sql = format!("{} ORDER BY ie.id", SELECT_EVENTS_SQL);
        query_frame(&conn, &sql, [])
    }

    /// 读取单个缺陷代码的质检事件
    pub fn find_by_defect_code(&self, defect_code: &str) -> RepositoryResult<RawEventFrame> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE dt.defect_id = ?1 ORDER BY ie.id", SELECT_EVENTS_SQL);
        query_frame(&conn, &sql, params![defect_code])
    }

    /// 质检事件总数
    pub fn count_events(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM inspection_event", [], |row| row.get(0))?;
        Ok(count)
    }

    /// 某批次导入的事件数
    pub fn count_by_batch(&self, batch_id: &str) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM inspection_event WHERE import_batch_id = ?1",
            params![batch_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    // ==========================================
    // 写入
    // ==========================================

    /// 批量写入质检事件（单事务）
    ///
    /// 批次、质检员、缺陷类型按需创建
    ///
    /// # 返回
    /// - Ok(usize): 写入的事件数
    pub fn insert_batch(&self, batch_id: &str, events: &[InspectionEvent]) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let mut lot_ids: HashMap<String, i64> = HashMap::new();
        let mut inspector_ids: HashMap<String, i64> = HashMap::new();
        let mut defect_type_ids: HashMap<(String, Option<String>), i64> = HashMap::new();

        {
            let mut insert = tx.prepare(
                r#"
                INSERT INTO inspection_event (
                    lot_id, inspector_id, defect_type_id, inspection_timestamp,
                    qty_checked, qty_defects, disposition, notes, import_batch_id
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
            )?;

            for event in events {
                let lot_pk = match lot_ids.get(&event.lot_id) {
                    Some(id) => *id,
                    None => {
                        let id = get_or_create_lot(&tx, &event.lot_id)?;
                        lot_ids.insert(event.lot_id.clone(), id);
                        id
                    }
                };

                let inspector_pk = match &event.inspector_name {
                    Some(name) => match inspector_ids.get(name) {
                        Some(id) => Some(*id),
                        None => {
                            let id = get_or_create_inspector(&tx, name)?;
                            inspector_ids.insert(name.clone(), id);
                            Some(id)
                        }
                    },
                    None => None,
                };

                let defect_type_pk = match &event.defect_code {
                    Some(code) => {
                        let key = (code.clone(), event.severity.clone());
                        match defect_type_ids.get(&key) {
                            Some(id) => Some(*id),
                            None => {
                                let id = get_or_create_defect_type(&tx, code, event.severity.as_deref())?;
                                defect_type_ids.insert(key, id);
                                Some(id)
                            }
                        }
                    }
                    None => None,
                };

                let timestamp = event
                    .inspected_at
                    .map(|ts| ts.format(TIMESTAMP_FORMAT).to_string());

                insert.execute(params![
                    lot_pk,
                    inspector_pk,
                    defect_type_pk,
                    timestamp,
                    event.qty_checked,
                    event.qty_defects,
                    event.disposition,
                    event.notes,
                    batch_id,
                ])?;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        tracing::info!(batch_id, inserted = events.len(), "inspection events persisted");
        Ok(events.len())
    }
}

impl InspectionEventGateway for InspectionEventRepository {
    fn fetch_inspection_events(&self) -> RepositoryResult<RawEventFrame> {
        self.find_all()
    }

    fn fetch_events_for_defect(&self, defect_code: &str) -> RepositoryResult<RawEventFrame> {
        self.find_by_defect_code(defect_code)
    }
}

// ==========================================
// 内部函数
// ==========================================

/// 执行查询并把结果转为原始集合（单元格字符串化，NULL → 空串）
fn query_frame<P: Params>(conn: &Connection, sql: &str, params: P) -> RepositoryResult<RawEventFrame> {
    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();

    let mut frame = RawEventFrame::new(columns.clone());
    let mut rows = stmt.query(params)?;
    while let Some(row) = rows.next()? {
        frame.rows.push(row_to_cells(row, &columns)?);
    }

    tracing::debug!(rows = frame.len(), "inspection events fetched");
    Ok(frame)
}

fn row_to_cells(row: &Row<'_>, columns: &[String]) -> rusqlite::Result<HashMap<String, String>> {
    let mut cells = HashMap::with_capacity(columns.len());
    for (idx, name) in columns.iter().enumerate() {
        let value = match row.get_ref(idx)? {
            ValueRef::Null => String::new(),
            ValueRef::Integer(i) => i.to_string(),
            ValueRef::Real(f) => f.to_string(),
            ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
                String::from_utf8_lossy(bytes).into_owned()
            }
        };
        cells.insert(name.clone(), value);
    }
    Ok(cells)
}

fn get_or_create_lot(conn: &Connection, lot_id: &str) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT OR IGNORE INTO lot (normalized_lot_id) VALUES (?1)",
        params![lot_id],
    )?;
    conn.query_row(
        "SELECT id FROM lot WHERE normalized_lot_id = ?1",
        params![lot_id],
        |row| row.get(0),
    )
}

fn get_or_create_inspector(conn: &Connection, name: &str) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT OR IGNORE INTO inspector (inspector_name) VALUES (?1)",
        params![name],
    )?;
    conn.query_row(
        "SELECT id FROM inspector WHERE inspector_name = ?1",
        params![name],
        |row| row.get(0),
    )
}

fn get_or_create_defect_type(
    conn: &Connection,
    defect_code: &str,
    severity: Option<&str>,
) -> rusqlite::Result<i64> {
    // severity 可为 NULL，UNIQUE 约束对 NULL 不生效，因此先查后插
    let existing: Option<i64> = conn
        .query_row(
            "SELECT id FROM defect_type WHERE defect_id = ?1 AND severity IS ?2",
            params![defect_code, severity],
            |row| row.get(0),
        )
        .optional()?;

    match existing {
        Some(id) => Ok(id),
        None => {
            conn.execute(
                "INSERT INTO defect_type (defect_id, severity) VALUES (?1, ?2)",
                params![defect_code, severity],
            )?;
            Ok(conn.last_insert_rowid())
        }
    }
}
