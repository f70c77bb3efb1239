//! 聚合标识（AggregateId）
//!
//! 不透明标识，在系统边界处一次性归一化：数值型主键统一转为字符串，
//! 持久化元数据中的 `aggregate_id` 因此恒为 JSON 字符串（显式契约，而非隐式转换）。
//!
use serde::{Deserialize, Serialize};
use std::fmt;

/// 聚合标识
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AggregateId(String);

impl AggregateId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AggregateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for AggregateId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for AggregateId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<u64> for AggregateId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_ids_are_canonicalized_to_string() {
        let id = AggregateId::from(100000u64);
        assert_eq!(id.as_str(), "100000");
        assert_eq!(id, AggregateId::from("100000"));
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = AggregateId::from(42u64);
        assert_eq!(serde_json::to_value(&id).unwrap(), serde_json::json!("42"));
    }
}
