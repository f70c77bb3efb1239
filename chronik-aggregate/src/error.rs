//! 聚合层统一错误定义
//!
//! 类型校验与翻译失败相互独立；存储边界的错误原样上抛，核心不重试、不翻译。
//!
use chronik_store::error::StoreError;
use thiserror::Error;

/// 统一错误类型（聚合层最小必要集）
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AggregateError {
    /// 仓储配置的聚合类型与候选实例不符
    #[error("aggregate type mismatch: expected={expected}, found={found}")]
    TypeMismatch { expected: String, found: String },
    #[error("invalid aggregate type: {reason}")]
    InvalidAggregateType { reason: String },
    /// 翻译器无法从实例或历史中得到所需能力
    #[error("aggregate translation failed: {reason}")]
    Translation { reason: String },
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("serialization error: {source}")]
    Serde {
        #[from]
        source: serde_json::Error,
    },
}

/// 统一 Result 类型别名
pub type AggregateResult<T> = Result<T, AggregateError>;
