//! 聚合类型（AggregateType）
//!
//! 区分同一仓储实例所管理聚合类别的值对象，用于标记流与快照，
//! 并校验候选实例是否属于仓储所配置的类型。
//!
use crate::aggregate_root::AggregateRoot;
use crate::error::{AggregateError, AggregateResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 聚合类型标签
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AggregateType(String);

impl AggregateType {
    /// 从聚合能力接口推导类型标签
    pub fn of<A: AggregateRoot>() -> Self {
        Self(A::TYPE.to_string())
    }

    /// 使用自定义名称（非空）
    pub fn from_name(name: impl Into<String>) -> AggregateResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(AggregateError::InvalidAggregateType {
                reason: "aggregate type must not be empty".to_string(),
            });
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 校验该标签是否与聚合 `A` 一致
    pub fn check<A: AggregateRoot>(&self) -> AggregateResult<()> {
        if self.0 != A::TYPE {
            return Err(AggregateError::TypeMismatch {
                expected: self.0.clone(),
                found: A::TYPE.to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for AggregateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
