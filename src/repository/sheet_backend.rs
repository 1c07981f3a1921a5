// ==========================================
// 整车产线流转跟踪系统 - 表格存储后端
// ==========================================
// 职责: 矩形表格的整表读取与整表覆写
// 约束: 后端只支持整表覆写,不支持按行修改
// 实现: CSV 文件 / SQLite 表 / 内存
// ==========================================

mod csv_sheet;
mod memory_sheet;
mod sqlite_sheet;

pub use csv_sheet::CsvSheetBackend;
pub use memory_sheet::MemorySheetBackend;
pub use sqlite_sheet::{SqliteSheetBackend, SHEET_TABLE};

use crate::repository::error::RepositoryResult;
use crate::repository::table_codec::Row;

// ==========================================
// SheetBackend Trait
// ==========================================
// 第一行为表头,其余每行一条车辆记录
pub trait SheetBackend: Send + Sync {
    /// 后端描述（用于日志）
    fn describe(&self) -> String;

    /// 读取整张表（空表返回空 Vec）
    fn read_all(&self) -> RepositoryResult<Vec<Row>>;

    /// 用给定行整表覆写
    fn overwrite(&self, rows: &[Row]) -> RepositoryResult<()>;
}
