// ==========================================
// 整车产线流转跟踪系统 - 车辆记录领域模型
// ==========================================
// 职责: 车辆身份 + 各工位状态/时间
// 红线: 记录只能经由状态流转引擎修改（Add/Delete 除外）
// ==========================================

use crate::domain::error::DomainError;
use crate::domain::station::StationSequence;
use crate::domain::types::{StationStatus, VehicleModel};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 车辆编号默认长度
pub const DEFAULT_VIN_LENGTH: usize = 5;

// ==========================================
// 车辆编号校验
// ==========================================

/// 归一化车辆编号（去首尾空白 + 转大写）,不做格式校验
///
/// 用于按编号查询；新增车辆时请使用 [`validate_id`]
pub fn normalize_id(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// 校验并归一化车辆编号（默认长度）
pub fn validate_id(raw: &str) -> Result<String, DomainError> {
    validate_id_with_len(raw, DEFAULT_VIN_LENGTH)
}

/// 校验并归一化车辆编号
///
/// # 规则
/// - 去首尾空白,转大写
/// - 长度必须等于 expected_len
/// - 仅允许 ASCII 字母和数字
///
/// 唯一性不在此校验,由仓储在新增时判定
pub fn validate_id_with_len(raw: &str, expected_len: usize) -> Result<String, DomainError> {
    let normalized = normalize_id(raw);

    let valid = normalized.chars().count() == expected_len
        && normalized.chars().all(|c| c.is_ascii_alphanumeric());

    if valid {
        Ok(normalized)
    } else {
        Err(DomainError::InvalidFormat {
            raw: raw.to_string(),
            expected_len,
        })
    }
}

// ==========================================
// StationProgress - 单工位进度
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationProgress {
    pub station: String,                    // 工位名称
    pub status: StationStatus,              // 工位状态
    pub updated_at: Option<DateTime<Utc>>,  // 最近一次状态变更时间（未设置时为 None）
}

// ==========================================
// VehicleRecord - 车辆记录
// ==========================================
// 对齐: 持久化表格一行
// stations 与工位序列一一对应,顺序一致
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleRecord {
    // ===== 身份 =====
    pub id: String,                   // 车辆编号（已归一化）
    pub model: VehicleModel,          // 车型

    // ===== 流转位置 =====
    pub current_station: String,      // 当前工位

    // ===== 时间 =====
    pub started_at: DateTime<Utc>,      // 上线时间
    pub last_updated_at: DateTime<Utc>, // 最近修改时间

    // ===== 各工位进度 =====
    pub stations: Vec<StationProgress>,
}

impl VehicleRecord {
    /// 创建新车辆记录
    ///
    /// 首工位置为进行中（时间=now）,其余工位未设置
    pub fn new(
        id: String,
        model: VehicleModel,
        started_at: DateTime<Utc>,
        now: DateTime<Utc>,
        sequence: &StationSequence,
    ) -> Self {
        let first = sequence.first();
        let stations = sequence
            .iter()
            .map(|station| {
                if station == first {
                    StationProgress {
                        station: station.to_string(),
                        status: StationStatus::InProgress,
                        updated_at: Some(now),
                    }
                } else {
                    StationProgress {
                        station: station.to_string(),
                        status: StationStatus::Unset,
                        updated_at: None,
                    }
                }
            })
            .collect();

        Self {
            id,
            model,
            current_station: first.to_string(),
            started_at,
            last_updated_at: now,
            stations,
        }
    }

    pub fn progress(&self, station: &str) -> Option<&StationProgress> {
        self.stations.iter().find(|p| p.station == station)
    }

    pub(crate) fn progress_mut(&mut self, station: &str) -> Option<&mut StationProgress> {
        self.stations.iter_mut().find(|p| p.station == station)
    }

    /// 指定工位状态（工位不存在时视为未设置）
    pub fn status_at(&self, station: &str) -> StationStatus {
        self.progress(station)
            .map(|p| p.status)
            .unwrap_or(StationStatus::Unset)
    }

    /// 当前工位状态
    pub fn current_status(&self) -> StationStatus {
        self.status_at(&self.current_station)
    }

    /// 是否全部工位已完成
    pub fn is_fully_completed(&self) -> bool {
        !self.stations.is_empty()
            && self
                .stations
                .iter()
                .all(|p| p.status == StationStatus::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_validate_id_normalizes() {
        assert_eq!(validate_id("  ab12c ").unwrap(), "AB12C");
    }

    #[test]
    fn test_validate_id_rejects_bad_input() {
        assert!(validate_id("AB12").is_err());
        assert!(validate_id("AB12CD").is_err());
        assert!(validate_id("AB-2C").is_err());
        assert!(validate_id("AB 2C").is_err());
        assert!(matches!(
            validate_id(""),
            Err(DomainError::InvalidFormat { expected_len: 5, .. })
        ));
    }

    #[test]
    fn test_validate_id_custom_length() {
        assert_eq!(validate_id_with_len("v0001x", 6).unwrap(), "V0001X");
    }

    #[test]
    fn test_new_record_initial_state() {
        let seq = StationSequence::new(["A", "B", "C"]).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
        let record = VehicleRecord::new("V0001".into(), VehicleModel::C43, now, now, &seq);

        assert_eq!(record.current_station, "A");
        assert_eq!(record.status_at("A"), StationStatus::InProgress);
        assert_eq!(record.progress("A").unwrap().updated_at, Some(now));
        assert_eq!(record.status_at("B"), StationStatus::Unset);
        assert_eq!(record.progress("C").unwrap().updated_at, None);
        assert!(!record.is_fully_completed());
    }
}
