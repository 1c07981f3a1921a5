// ==========================================
// 整车产线流转跟踪系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite / CSV 表格存储
// 系统定位: 单车逐工位流转跟踪（状态机 + 整表持久化）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 流转规则/过滤/统计
pub mod engine;

// 数据仓储层 - 表格存储
pub mod repository;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 明细导出
pub mod export;

// API 层 - 业务接口
pub mod api;

// 应用层 - 组装
pub mod app;

// 命令行参数定义
pub mod cli;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{DomainError, StationSequence, StationStatus, VehicleModel, VehicleRecord};

// 引擎
pub use engine::{ProductionSummary, TransitionEngine, VehicleFilter};

// 仓储
pub use repository::{RepositoryError, StoreOptions, VehicleRecordStore};

// API
pub use api::{ApiError, DashboardApi, VehicleApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "整车产线流转跟踪系统";
