// ==========================================
// 整车产线流转跟踪系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::tracker_config_trait::{SheetBackendKind, TrackerConfigReader};
use crate::db::{ensure_schema, open_sqlite_connection};
use crate::domain::station::DEFAULT_PRODUCTION_LINES;
use crate::domain::vehicle::DEFAULT_VIN_LENGTH;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::collections::BTreeMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

/// 全局作用域
const GLOBAL_SCOPE: &str = "global";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;
        Self::from_connection(Arc::new(Mutex::new(conn)))
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：会对传入连接再次应用统一 PRAGMA 并确保配置表存在（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
            ensure_schema(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
            params![GLOBAL_SCOPE, key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取配置值，缺失或空白时使用默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self
            .get_config_value(key)?
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| default.to_string()))
    }

    /// 读取 global scope 的配置值
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        self.get_config_value(key)
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3, updated_at = datetime('now')",
            params![GLOBAL_SCOPE, key, value],
        )?;
        tracing::info!(config_key = key, "配置已更新");
        Ok(())
    }

    /// 获取所有 global 配置的快照（JSON格式，按键排序）
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = ?1 ORDER BY key")?;
        let rows = stmt.query_map(params![GLOBAL_SCOPE], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&config_map)?)
    }
}

/// 解析工位列表配置
///
/// 支持 JSON 数组（`["Body Shop","Paint"]`）或逗号分隔（`Body Shop,Paint`）
pub fn parse_station_list(raw: &str) -> Result<Vec<String>, Box<dyn Error>> {
    let trimmed = raw.trim();
    if trimmed.starts_with('[') {
        let list: Vec<String> = serde_json::from_str(trimmed)?;
        return Ok(list);
    }
    Ok(trimmed
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}

// ==========================================
// TrackerConfigReader Trait 实现
// ==========================================
#[async_trait]
impl TrackerConfigReader for ConfigManager {
    async fn get_production_lines(&self) -> Result<Vec<String>, Box<dyn Error>> {
        match self.get_config_value(config_keys::PRODUCTION_LINES)? {
            Some(raw) if !raw.trim().is_empty() => parse_station_list(&raw),
            _ => Ok(DEFAULT_PRODUCTION_LINES.iter().map(|s| s.to_string()).collect()),
        }
    }

    async fn get_vin_length(&self) -> Result<usize, Box<dyn Error>> {
        let default = DEFAULT_VIN_LENGTH.to_string();
        let value = self.get_config_or_default(config_keys::VIN_LENGTH, &default)?;
        match value.trim().parse::<usize>() {
            Ok(len) if len > 0 => Ok(len),
            _ => {
                tracing::warn!(
                    config_key = config_keys::VIN_LENGTH,
                    raw_value = %value,
                    "车辆编号长度配置格式错误，使用默认值"
                );
                Ok(DEFAULT_VIN_LENGTH)
            }
        }
    }

    async fn get_cache_ttl_secs(&self) -> Result<Option<i64>, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::CACHE_TTL_SECS, "")?;
        Ok(value.trim().parse::<i64>().ok().filter(|secs| *secs >= 0))
    }

    async fn get_sheet_backend(&self) -> Result<SheetBackendKind, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::SHEET_BACKEND, "SQLITE")?;
        match value.trim().to_uppercase().as_str() {
            "CSV" => {
                let path =
                    self.get_config_or_default(config_keys::SHEET_CSV_PATH, "vehicle_sheet.csv")?;
                Ok(SheetBackendKind::Csv { path })
            }
            _ => Ok(SheetBackendKind::Sqlite),
        }
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 产线
    pub const PRODUCTION_LINES: &str = "production_lines"; // 工位列表 (JSON 数组或逗号分隔)
    pub const VIN_LENGTH: &str = "vin_length";

    // 表格存储
    pub const SHEET_BACKEND: &str = "sheet_backend"; // SQLITE | CSV
    pub const SHEET_CSV_PATH: &str = "sheet_csv_path";
    pub const CACHE_TTL_SECS: &str = "cache_ttl_secs";
}
