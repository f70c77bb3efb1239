//! 事件流与流名
//!
//! `StreamName` 是非空的不透明标识；`Stream` 为流名加按聚合版本升序的事件序列，
//! 可附带流级元数据。
//!
use crate::domain_event::DomainEvent;
use crate::error::{StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// 流名（非空校验在构造时完成）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StreamName(String);

impl StreamName {
    pub fn new(name: impl Into<String>) -> StoreResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(StoreError::InvalidStreamName {
                reason: "stream name must not be empty".to_string(),
            });
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for StreamName {
    /// 默认共享流名 `event_stream`
    fn default() -> Self {
        Self("event_stream".to_string())
    }
}

impl fmt::Display for StreamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 事件流
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stream {
    stream_name: StreamName,
    metadata: Map<String, Value>,
    events: Vec<DomainEvent>,
}

impl Stream {
    pub fn new(stream_name: StreamName, events: Vec<DomainEvent>) -> Self {
        Self {
            stream_name,
            metadata: Map::new(),
            events,
        }
    }

    /// 返回追加了一条流级元数据的副本
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn stream_name(&self) -> &StreamName {
        &self.stream_name
    }

    pub fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }

    pub fn events(&self) -> &[DomainEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<DomainEvent> {
        self.events
    }
}
