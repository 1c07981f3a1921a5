// ==========================================
// 整车产线流转跟踪系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// 启动顺序: 连接 → 建表 → 读取配置 → 选择表格后端 → 打开仓储 → 创建 API
// ==========================================

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::api::{DashboardApi, VehicleApi};
use crate::config::{ConfigManager, SheetBackendKind, TrackerSettings};
use crate::db::{ensure_schema, open_sqlite_connection};
use crate::repository::sheet_backend::{CsvSheetBackend, SheetBackend, SqliteSheetBackend};
use crate::repository::vehicle_repo::VehicleRecordStore;

/// 应用状态
///
/// 包含所有API实例和共享资源
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 启动时加载的运行参数
    pub settings: TrackerSettings,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    /// 车辆记录仓储
    pub store: Arc<VehicleRecordStore>,

    /// 车辆API
    pub vehicle_api: Arc<VehicleApi>,

    /// 看板API
    pub dashboard_api: Arc<DashboardApi>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径（配置表与 SQLite 表格后端共用）
    ///
    /// # 返回
    /// - Err(String): 初始化错误（含失败步骤说明）
    pub async fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        ensure_schema(&conn).map_err(|e| format!("无法初始化数据库表: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 配置
        // ==========================================
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );
        let settings = TrackerSettings::load(config_manager.as_ref())
            .await
            .map_err(|e| format!("无法加载运行参数: {}", e))?;

        // ==========================================
        // 表格后端 + 仓储
        // ==========================================
        let backend: Arc<dyn SheetBackend> = match &settings.sheet_backend {
            SheetBackendKind::Sqlite => Arc::new(
                SqliteSheetBackend::from_connection(conn.clone())
                    .map_err(|e| format!("无法创建SqliteSheetBackend: {}", e))?,
            ),
            SheetBackendKind::Csv { path } => {
                Arc::new(CsvSheetBackend::new(resolve_sheet_path(&db_path, path)))
            }
        };
        tracing::info!(backend = %backend.describe(), "表格后端已选择");

        let store = Arc::new(
            VehicleRecordStore::open(
                backend,
                Arc::new(settings.stations.clone()),
                settings.store_options(),
            )
            .map_err(|e| format!("无法打开车辆记录仓储: {}", e))?,
        );

        // ==========================================
        // API
        // ==========================================
        let vehicle_api = Arc::new(VehicleApi::new(store.clone()));
        let dashboard_api = Arc::new(DashboardApi::new(store.clone()));

        tracing::info!("AppState初始化完成");
        Ok(Self {
            db_path,
            settings,
            config_manager,
            store,
            vehicle_api,
            dashboard_api,
        })
    }
}

/// CSV 表格相对路径以数据库所在目录为基准
fn resolve_sheet_path(db_path: &str, sheet_path: &str) -> PathBuf {
    let sheet = Path::new(sheet_path);
    if sheet.is_absolute() {
        return sheet.to_path_buf();
    }
    Path::new(db_path)
        .parent()
        .map(|dir| dir.join(sheet))
        .unwrap_or_else(|| sheet.to_path_buf())
}

/// 获取默认数据库路径
///
/// 优先级: 环境变量 VEHICLE_FLOW_DB_PATH → 用户数据目录 → 当前目录
pub fn get_default_db_path() -> String {
    // 允许通过环境变量显式指定 DB 路径（便于调试/测试/CI）
    if let Ok(path) = std::env::var("VEHICLE_FLOW_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./vehicle_flow.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("vehicle-flow-tracker");
        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("vehicle_flow.db");
        }
    }

    path.to_string_lossy().to_string()
}
