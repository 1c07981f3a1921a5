// ==========================================
// Mock 配置实现 - 用于集成测试
// ==========================================

#![allow(dead_code)]

use async_trait::async_trait;
use std::error::Error;
use vehicle_flow_tracker::config::{SheetBackendKind, TrackerConfigReader};
use vehicle_flow_tracker::domain::DEFAULT_PRODUCTION_LINES;

/// Mock 配置结构
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub production_lines: Vec<String>,
    pub vin_length: usize,
    pub cache_ttl_secs: Option<i64>,
    pub sheet_backend: SheetBackendKind,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            production_lines: DEFAULT_PRODUCTION_LINES.iter().map(|s| s.to_string()).collect(),
            vin_length: 5,
            cache_ttl_secs: None,
            sheet_backend: SheetBackendKind::Sqlite,
        }
    }
}

impl MockConfig {
    /// 自定义工位列表
    pub fn with_lines(lines: &[&str]) -> Self {
        Self {
            production_lines: lines.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }
}

#[async_trait]
impl TrackerConfigReader for MockConfig {
    async fn get_production_lines(&self) -> Result<Vec<String>, Box<dyn Error>> {
        Ok(self.production_lines.clone())
    }

    async fn get_vin_length(&self) -> Result<usize, Box<dyn Error>> {
        Ok(self.vin_length)
    }

    async fn get_cache_ttl_secs(&self) -> Result<Option<i64>, Box<dyn Error>> {
        Ok(self.cache_ttl_secs)
    }

    async fn get_sheet_backend(&self) -> Result<SheetBackendKind, Box<dyn Error>> {
        Ok(self.sheet_backend.clone())
    }
}
