// ==========================================
// 整车产线流转跟踪系统 - 配置层
// ==========================================
// 职责: 产线工位、编号长度、表格后端等运行参数
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod settings;
pub mod tracker_config_trait;

pub use config_manager::{config_keys, parse_station_list, ConfigManager};
pub use settings::TrackerSettings;
pub use tracker_config_trait::{SheetBackendKind, TrackerConfigReader};
