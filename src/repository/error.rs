// ==========================================
// 整车产线流转跟踪系统 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use crate::domain::error::DomainError;
use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== 记录错误 =====
    #[error("记录未找到: {entity} with id={id}")]
    NotFound { entity: String, id: String },

    #[error("记录已存在: {entity} with id={id}")]
    AlreadyExists { entity: String, id: String },

    // ===== 领域规则错误（格式/流转）=====
    #[error(transparent)]
    Domain(#[from] DomainError),

    // ===== 持久化错误 =====
    #[error("持久化失败: {0}")]
    PersistenceFailure(String),

    #[error("表格格式错误 (行 {row}): {message}")]
    TableFormat { row: usize, message: String },

    #[error("锁获取失败: {0}")]
    LockError(String),

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RepositoryError {
    pub fn vehicle_not_found(id: &str) -> Self {
        RepositoryError::NotFound {
            entity: "Vehicle".to_string(),
            id: id.to_string(),
        }
    }

    /// 是否为持久化层故障（读写后端失败、表格损坏）
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            RepositoryError::PersistenceFailure(_) | RepositoryError::TableFormat { .. }
        )
    }
}

// 实现 From<rusqlite::Error>
impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        RepositoryError::PersistenceFailure(format!("sqlite: {}", err))
    }
}

impl From<csv::Error> for RepositoryError {
    fn from(err: csv::Error) -> Self {
        RepositoryError::PersistenceFailure(format!("csv: {}", err))
    }
}

impl From<std::io::Error> for RepositoryError {
    fn from(err: std::io::Error) -> Self {
        RepositoryError::PersistenceFailure(format!("io: {}", err))
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::PersistenceFailure(format!("json: {}", err))
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;
