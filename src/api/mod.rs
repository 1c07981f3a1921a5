// ==========================================
// 整车产线流转跟踪系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供 CLI 调用
// ==========================================

pub mod dashboard_api;
pub mod error;
pub mod vehicle_api;

// 重导出核心类型
pub use dashboard_api::DashboardApi;
pub use error::{ApiError, ApiErrorView, ApiResult};
pub use vehicle_api::{BulkFailure, BulkUpdateReport, VehicleApi};
