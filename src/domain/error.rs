// ==========================================
// 整车产线流转跟踪系统 - 领域层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 领域层/引擎层错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    // ===== 输入校验错误 =====
    #[error("车辆编号格式错误: '{raw}'（需为 {expected_len} 位字母或数字）")]
    InvalidFormat { raw: String, expected_len: usize },

    #[error("未知工位: {0}")]
    UnknownStation(String),

    #[error("未知状态: '{0}'")]
    UnknownStatus(String),

    #[error("未知车型: {0}")]
    UnknownModel(String),

    // ===== 工位序列配置错误 =====
    #[error("工位序列不能为空")]
    EmptyStationSequence,

    #[error("工位序列存在重复或空白工位: '{0}'")]
    InvalidStationName(String),

    // ===== 状态流转错误 =====
    #[error("非法状态流转: vehicle={vehicle_id}, station={station}, status={status}, current={current_station} ({reason})")]
    InvalidTransition {
        vehicle_id: String,
        station: String,
        status: String,
        current_station: String,
        reason: String,
    },
}
