// ==========================================
// 整车产线流转跟踪系统 - 应用层
// ==========================================
// 职责: 组装配置、存储与 API,供 CLI 使用
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_db_path, AppState};
