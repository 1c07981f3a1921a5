// ==========================================
// 整车产线流转跟踪系统 - 引擎层
// ==========================================
// 职责: 工位状态流转规则、车辆过滤、看板统计
// 红线: Engine 不做 I/O,只对内存中的记录计算
// ==========================================

pub mod filter;
pub mod summary;
pub mod transition;

// 重导出核心引擎
pub use filter::VehicleFilter;
pub use summary::{CompletionPoint, DashboardSummary, ProductionSummary, StationLoad};
pub use transition::TransitionEngine;
