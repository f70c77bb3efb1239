//! 领域事件持久化模型（DomainEvent）
//!
//! 定义事件在存储层的标准形态：负载与元数据均为 JSON 值，
//! 元数据在持久化后必须包含 `aggregate_id`/`aggregate_type`/`aggregate_version`。
//!
use bon::Builder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// 领域事件（不可变记录）
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
pub struct DomainEvent {
    /// 事件唯一标识符
    #[builder(default = Uuid::new_v4())]
    event_id: Uuid,
    /// 事件名，用于事件到处理器的显式分发
    event_name: String,
    /// 事件负载，存储事件的具体数据
    payload: Value,
    /// 元数据（持久化后包含 aggregate_id / aggregate_type / aggregate_version）
    #[builder(default)]
    metadata: Map<String, Value>,
    /// 事件发生时间（UTC）
    #[builder(default = Utc::now())]
    created_at: DateTime<Utc>,
    /// 聚合内版本，从 1 开始逐一递增
    version: u64,
}

impl DomainEvent {
    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    pub fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }

    pub fn metadata_value(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// 返回追加了一条元数据的副本（同名键覆盖），事件本身保持不可变
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}
