// ==========================================
// 整车产线流转跟踪系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含流转规则
// ==========================================
// 职责: 车辆表格的读取、缓存与整表覆写
// 后端: SQLite 表 / CSV 文件 / 内存（测试）
// ==========================================

pub mod error;
pub mod sheet_backend;
pub mod table_codec;
pub mod vehicle_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use sheet_backend::{CsvSheetBackend, MemorySheetBackend, SheetBackend, SqliteSheetBackend};
pub use table_codec::TableCodec;
pub use vehicle_repo::{BulkOutcome, StoreOptions, VehicleRecordStore};
