use super::SheetBackend;
use crate::db::open_sqlite_connection;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::table_codec::Row;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

/// 表格存储表名
pub const SHEET_TABLE: &str = "vehicle_sheet";

// ==========================================
// SqliteSheetBackend - SQLite 表格后端
// ==========================================
/// 以 SQLite 表模拟矩形表格
///
/// 每行存为一条记录: row_no（行号,从 0 开始,0 为表头）+ cells（JSON 字符串数组）
/// 覆写在单个事务内完成: 先清空再逐行插入
pub struct SqliteSheetBackend {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteSheetBackend {
    /// 创建新的 SqliteSheetBackend 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Self::from_connection(Arc::new(Mutex::new(conn)))
    }

    /// 从已有连接创建后端实例（会确保表存在）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        let backend = Self { conn };
        backend.ensure_table()?;
        Ok(backend)
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn ensure_table(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute_batch(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {SHEET_TABLE} (
                row_no INTEGER PRIMARY KEY,
                cells TEXT NOT NULL
            );
            "#
        ))?;
        Ok(())
    }
}

impl SheetBackend for SqliteSheetBackend {
    fn describe(&self) -> String {
        format!("sqlite:{}", SHEET_TABLE)
    }

    fn read_all(&self) -> RepositoryResult<Vec<Row>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT cells FROM {SHEET_TABLE} ORDER BY row_no"
        ))?;

        let raw_rows = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<String>, _>>()?;

        let mut rows = Vec::with_capacity(raw_rows.len());
        for raw in raw_rows {
            let cells: Row = serde_json::from_str(&raw)?;
            rows.push(cells);
        }
        Ok(rows)
    }

    fn overwrite(&self, rows: &[Row]) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        tx.execute(&format!("DELETE FROM {SHEET_TABLE}"), [])?;
        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO {SHEET_TABLE} (row_no, cells) VALUES (?1, ?2)"
            ))?;
            for (row_no, row) in rows.iter().enumerate() {
                stmt.execute(params![row_no as i64, serde_json::to_string(row)?])?;
            }
        }

        tx.commit()?;
        Ok(())
    }
}
