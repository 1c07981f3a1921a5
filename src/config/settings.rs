// ==========================================
// 整车产线流转跟踪系统 - 运行参数
// ==========================================
// 职责: 启动时从 TrackerConfigReader 读取并校验运行参数
// ==========================================

use crate::config::tracker_config_trait::{SheetBackendKind, TrackerConfigReader};
use crate::domain::station::StationSequence;
use crate::repository::vehicle_repo::StoreOptions;
use std::error::Error;

#[derive(Debug, Clone)]
pub struct TrackerSettings {
    pub stations: StationSequence,
    pub vin_length: usize,
    pub cache_ttl_secs: Option<i64>,
    pub sheet_backend: SheetBackendKind,
}

impl TrackerSettings {
    /// 读取全部运行参数
    ///
    /// # 返回
    /// - Err: 配置读取失败或工位列表不合法（空/重复/空白名称）
    pub async fn load(reader: &dyn TrackerConfigReader) -> Result<Self, Box<dyn Error>> {
        let lines = reader.get_production_lines().await?;
        let stations = StationSequence::new(lines)?;
        let vin_length = reader.get_vin_length().await?;
        let cache_ttl_secs = reader.get_cache_ttl_secs().await?;
        let sheet_backend = reader.get_sheet_backend().await?;

        tracing::debug!(
            stations = stations.len(),
            vin_length,
            ?cache_ttl_secs,
            ?sheet_backend,
            "运行参数已加载"
        );

        Ok(Self {
            stations,
            vin_length,
            cache_ttl_secs,
            sheet_backend,
        })
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            vin_length: self.vin_length,
            cache_ttl: self.cache_ttl_secs.map(chrono::Duration::seconds),
        }
    }
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            stations: StationSequence::production_default(),
            vin_length: crate::domain::vehicle::DEFAULT_VIN_LENGTH,
            cache_ttl_secs: None,
            sheet_backend: SheetBackendKind::Sqlite,
        }
    }
}
