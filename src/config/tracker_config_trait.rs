// ==========================================
// 整车产线流转跟踪系统 - 配置读取 Trait
// ==========================================
// 职责: 定义启动时所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use async_trait::async_trait;
use std::error::Error;

/// 车辆表格存储后端类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetBackendKind {
    Sqlite,               // 与配置同库的 vehicle_sheet 表
    Csv { path: String }, // CSV 文件
}

// ==========================================
// TrackerConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait TrackerConfigReader: Send + Sync {
    /// 获取产线工位列表（按流转顺序）
    ///
    /// # 默认值
    /// - 14 个标准工位（Body Shop … Delivery）
    async fn get_production_lines(&self) -> Result<Vec<String>, Box<dyn Error>>;

    /// 获取车辆编号长度
    ///
    /// # 默认值
    /// - 5
    async fn get_vin_length(&self) -> Result<usize, Box<dyn Error>>;

    /// 获取表格缓存有效期（秒）
    ///
    /// # 返回
    /// - None: 不过期（单进程写入时推荐）
    async fn get_cache_ttl_secs(&self) -> Result<Option<i64>, Box<dyn Error>>;

    /// 获取车辆表格存储后端
    ///
    /// # 默认值
    /// - Sqlite
    async fn get_sheet_backend(&self) -> Result<SheetBackendKind, Box<dyn Error>>;
}
