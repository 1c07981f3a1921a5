// ==========================================
// 整车产线流转跟踪系统 - 领域类型定义
// ==========================================
// 职责: 工位状态、车型等枚举类型
// 红线: 状态是带标签的枚举,颜色映射由外部展示层负责
// ==========================================

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 工位状态 (Station Status)
// ==========================================
// 持久化格式: "In Progress" / "Completed" / "Repair Needed" / ""(未设置)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StationStatus {
    #[default]
    Unset,        // 未到达
    InProgress,   // 进行中
    Completed,    // 已完成
    RepairNeeded, // 需返修
}

impl fmt::Display for StationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

impl StationStatus {
    /// 转换为表格存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            StationStatus::Unset => "",
            StationStatus::InProgress => "In Progress",
            StationStatus::Completed => "Completed",
            StationStatus::RepairNeeded => "Repair Needed",
        }
    }

    /// 从表格单元格解析状态
    ///
    /// 空串视为 Unset；同时接受 `IN_PROGRESS` / `in-progress` 等写法
    pub fn from_db_str(s: &str) -> Result<Self, DomainError> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect::<String>()
            .to_uppercase();

        match normalized.as_str() {
            "" => Ok(StationStatus::Unset),
            "INPROGRESS" => Ok(StationStatus::InProgress),
            "COMPLETED" => Ok(StationStatus::Completed),
            "REPAIRNEEDED" => Ok(StationStatus::RepairNeeded),
            _ => Err(DomainError::UnknownStatus(s.to_string())),
        }
    }

    /// 解析用户提交的目标状态（不允许 Unset）
    pub fn parse_target(s: &str) -> Result<Self, DomainError> {
        match Self::from_db_str(s)? {
            StationStatus::Unset => Err(DomainError::UnknownStatus(s.to_string())),
            status => Ok(status),
        }
    }

    pub fn is_set(&self) -> bool {
        !matches!(self, StationStatus::Unset)
    }
}

// ==========================================
// 车型 (Vehicle Model)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleModel {
    C43,
}

impl fmt::Display for VehicleModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

impl VehicleModel {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            VehicleModel::C43 => "C43",
        }
    }

    pub fn from_db_str(s: &str) -> Result<Self, DomainError> {
        match s.trim().to_uppercase().as_str() {
            "C43" => Ok(VehicleModel::C43),
            _ => Err(DomainError::UnknownModel(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_db_roundtrip_text() {
        assert_eq!(StationStatus::InProgress.to_db_str(), "In Progress");
        assert_eq!(
            StationStatus::from_db_str("Repair Needed").unwrap(),
            StationStatus::RepairNeeded
        );
        assert_eq!(
            StationStatus::from_db_str("IN_PROGRESS").unwrap(),
            StationStatus::InProgress
        );
        assert_eq!(StationStatus::from_db_str("  ").unwrap(), StationStatus::Unset);
    }

    #[test]
    fn test_parse_target_rejects_unset_and_garbage() {
        assert!(matches!(
            StationStatus::parse_target(""),
            Err(DomainError::UnknownStatus(_))
        ));
        assert!(matches!(
            StationStatus::parse_target("Paused"),
            Err(DomainError::UnknownStatus(_))
        ));
        assert_eq!(
            StationStatus::parse_target("completed").unwrap(),
            StationStatus::Completed
        );
    }

    #[test]
    fn test_model_parse() {
        assert_eq!(VehicleModel::from_db_str(" c43 ").unwrap(), VehicleModel::C43);
        assert!(VehicleModel::from_db_str("X5").is_err());
    }
}
