//! 存储层统一错误定义
//!
//! 覆盖流命名、流存在性、事务生命周期与观察者回调等最小必要集合；
//! 并发写冲突由适配器以 `VersionConflict` 上报，核心不做重试或翻译。
//!
use thiserror::Error;

/// 统一错误类型（存储边界最小必要集）
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid stream name: {reason}")]
    InvalidStreamName { reason: String },
    #[error("stream not found: {stream}")]
    StreamNotFound { stream: String },
    #[error("stream already exists: {stream}")]
    StreamExists { stream: String },
    #[error("transaction already started")]
    TransactionAlreadyStarted,
    #[error("no active transaction")]
    NoActiveTransaction,
    #[error("version conflict: expected={expected}, actual={actual}")]
    VersionConflict { expected: u64, actual: u64 },
    #[error("observer error: {reason}")]
    Observer { reason: String },
}

/// 统一 Result 类型别名
pub type StoreResult<T> = Result<T, StoreError>;
