//! 元数据匹配器
//!
//! 以合取方式组合若干字段约束，供适配器在过滤加载时逐事件求值：
//! - `Equals`：字段值相等（如 `aggregate_id`/`aggregate_type`）
//! - `GreaterThan`：数值大于（如从快照恢复时 `aggregate_version > N`）
//!
use crate::domain_event::DomainEvent;
use serde_json::Value;

/// 约束运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equals,
    GreaterThan,
}

#[derive(Debug, Clone)]
struct Constraint {
    field: String,
    operator: Operator,
    value: Value,
}

/// 元数据匹配器（所有约束同时满足才算命中）
#[derive(Debug, Clone, Default)]
pub struct MetadataMatcher {
    constraints: Vec<Constraint>,
}

impl MetadataMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_equals(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.constraints.push(Constraint {
            field: field.into(),
            operator: Operator::Equals,
            value: value.into(),
        });
        self
    }

    pub fn with_greater_than(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.constraints.push(Constraint {
            field: field.into(),
            operator: Operator::GreaterThan,
            value: value.into(),
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn matches(&self, event: &DomainEvent) -> bool {
        self.constraints.iter().all(|constraint| {
            let Some(actual) = event.metadata_value(&constraint.field) else {
                return false;
            };
            match constraint.operator {
                Operator::Equals => actual == &constraint.value,
                Operator::GreaterThan => match (actual.as_u64(), constraint.value.as_u64()) {
                    (Some(actual), Some(bound)) => actual > bound,
                    _ => false,
                },
            }
        })
    }
}
