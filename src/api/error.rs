// ==========================================
// 整车产线流转跟踪系统 - API层错误类型
// ==========================================
// 职责: 将领域/仓储错误转换为面向操作员的错误消息
// ==========================================

use crate::domain::error::DomainError;
use crate::repository::error::RepositoryError;
use serde::Serialize;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("未知工位: {0}")]
    UnknownStation(String),

    #[error("未知状态: {0}")]
    UnknownStatus(String),

    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("资源已存在: {0}")]
    AlreadyExists(String),

    #[error("无效的状态转换: {0}")]
    InvalidStateTransition(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("保存失败,请重试: {0}")]
    PersistenceFailure(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 稳定的错误码（供 CLI/前端分类展示）
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::UnknownStation(_) => "UNKNOWN_STATION",
            ApiError::UnknownStatus(_) => "UNKNOWN_STATUS",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::AlreadyExists(_) => "ALREADY_EXISTS",
            ApiError::InvalidStateTransition(_) => "INVALID_TRANSITION",
            ApiError::PersistenceFailure(_) => "PERSISTENCE_FAILURE",
            ApiError::InternalError(_) | ApiError::Other(_) => "INTERNAL",
        }
    }

    /// 转为可序列化的错误视图
    pub fn to_view(&self) -> ApiErrorView {
        ApiErrorView {
            code: self.code().to_string(),
            message: self.to_string(),
        }
    }
}

/// 错误的序列化视图
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorView {
    pub code: String,
    pub message: String,
}

// ==========================================
// 从 DomainError 转换
// ==========================================
impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidFormat { .. } | DomainError::UnknownModel(_) => {
                ApiError::InvalidInput(err.to_string())
            }
            DomainError::UnknownStation(station) => ApiError::UnknownStation(station),
            DomainError::UnknownStatus(status) => ApiError::UnknownStatus(status),
            DomainError::InvalidTransition { .. } => {
                ApiError::InvalidStateTransition(err.to_string())
            }
            DomainError::EmptyStationSequence | DomainError::InvalidStationName(_) => {
                ApiError::InternalError(format!("工位配置错误: {}", err))
            }
        }
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::AlreadyExists { entity, id } => {
                ApiError::AlreadyExists(format!("{}(id={})已存在", entity, id))
            }
            RepositoryError::Domain(domain) => domain.into(),
            RepositoryError::PersistenceFailure(msg) => ApiError::PersistenceFailure(msg),
            RepositoryError::TableFormat { row, message } => {
                ApiError::PersistenceFailure(format!("表格第{}行格式错误: {}", row, message))
            }
            RepositoryError::LockError(msg) => {
                ApiError::InternalError(format!("锁获取失败: {}", msg))
            }
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
