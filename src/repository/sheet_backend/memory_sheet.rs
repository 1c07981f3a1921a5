use super::SheetBackend;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::table_codec::Row;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

// ==========================================
// MemorySheetBackend - 内存表格后端
// ==========================================
/// 内存表格,用于演示与测试
///
/// 可通过 fail_reads / fail_writes 模拟后端不可用
#[derive(Default)]
pub struct MemorySheetBackend {
    rows: Mutex<Vec<Row>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    write_count: AtomicUsize,
}

impl MemorySheetBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<Row>) -> Self {
        Self {
            rows: Mutex::new(rows),
            ..Self::default()
        }
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// 成功整表覆写的次数
    pub fn write_count(&self) -> usize {
        self.write_count.load(Ordering::SeqCst)
    }

    /// 当前表格内容
    pub fn rows(&self) -> Vec<Row> {
        self.rows.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl SheetBackend for MemorySheetBackend {
    fn describe(&self) -> String {
        "memory".to_string()
    }

    fn read_all(&self) -> RepositoryResult<Vec<Row>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(RepositoryError::PersistenceFailure(
                "memory backend: read unavailable".to_string(),
            ));
        }
        let rows = self
            .rows
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        Ok(rows.clone())
    }

    fn overwrite(&self, rows: &[Row]) -> RepositoryResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RepositoryError::PersistenceFailure(
                "memory backend: write rejected".to_string(),
            ));
        }
        let mut current = self
            .rows
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        *current = rows.to_vec();
        self.write_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
