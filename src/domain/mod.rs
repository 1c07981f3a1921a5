// ==========================================
// 整车产线流转跟踪系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、编号校验
// 红线: 不含数据访问逻辑,不含状态流转逻辑
// ==========================================

pub mod error;
pub mod station;
pub mod types;
pub mod vehicle;

// 重导出核心类型
pub use error::DomainError;
pub use station::{StationSequence, DEFAULT_PRODUCTION_LINES};
pub use types::{StationStatus, VehicleModel};
pub use vehicle::{
    normalize_id, validate_id, validate_id_with_len, StationProgress, VehicleRecord,
    DEFAULT_VIN_LENGTH,
};
