//! 内存版存储适配器（InMemoryAdapter）
//!
//! 以 `HashMap<String, Vec<DomainEvent>>` 保存流，事务通过备份副本实现：
//! `begin` 拍下快照，`commit` 丢弃快照，`rollback` 恢复快照，
//! 因此回滚后的事务不会留下任何部分追加。典型用途：测试环境与本地开发。
//!
use crate::adapter::Adapter;
use crate::domain_event::DomainEvent;
use crate::error::{StoreError, StoreResult};
use crate::metadata_matcher::MetadataMatcher;
use crate::stream::{Stream, StreamName};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Default)]
struct StoredStream {
    metadata: serde_json::Map<String, Value>,
    events: Vec<DomainEvent>,
}

#[derive(Debug, Default)]
struct InMemoryState {
    streams: HashMap<String, StoredStream>,
    backup: Option<HashMap<String, StoredStream>>,
}

/// 内存适配器
#[derive(Debug, Default)]
pub struct InMemoryAdapter {
    state: Mutex<InMemoryState>,
}

impl InMemoryAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 逐聚合检查追加批次的版本连续性（乐观并发控制）。
    /// 没有 `aggregate_id` 元数据的事件不参与检查。
    fn check_versions(existing: &[DomainEvent], incoming: &[DomainEvent]) -> StoreResult<()> {
        let mut last: HashMap<&str, u64> = HashMap::new();
        for event in existing {
            if let Some(id) = event.metadata_value("aggregate_id").and_then(Value::as_str) {
                last.insert(id, event.version());
            }
        }
        for event in incoming {
            let Some(id) = event.metadata_value("aggregate_id").and_then(Value::as_str) else {
                continue;
            };
            let expected = last.get(id).copied().unwrap_or(0) + 1;
            if event.version() != expected {
                return Err(StoreError::VersionConflict {
                    expected,
                    actual: event.version(),
                });
            }
            last.insert(id, event.version());
        }
        Ok(())
    }
}

#[async_trait]
impl Adapter for InMemoryAdapter {
    async fn begin_transaction(&self) -> StoreResult<()> {
        let mut state = self.state.lock().await;
        if state.backup.is_some() {
            return Err(StoreError::TransactionAlreadyStarted);
        }
        state.backup = Some(state.streams.clone());
        Ok(())
    }

    async fn commit_transaction(&self) -> StoreResult<()> {
        let mut state = self.state.lock().await;
        if state.backup.take().is_none() {
            return Err(StoreError::NoActiveTransaction);
        }
        Ok(())
    }

    async fn rollback_transaction(&self) -> StoreResult<()> {
        let mut state = self.state.lock().await;
        match state.backup.take() {
            Some(backup) => {
                state.streams = backup;
                Ok(())
            }
            None => Err(StoreError::NoActiveTransaction),
        }
    }

    async fn create(&self, stream: Stream) -> StoreResult<()> {
        let mut state = self.state.lock().await;
        let name = stream.stream_name().as_str().to_string();
        if state.streams.contains_key(&name) {
            return Err(StoreError::StreamExists { stream: name });
        }
        Self::check_versions(&[], stream.events())?;
        let metadata = stream.metadata().clone();
        state.streams.insert(
            name,
            StoredStream {
                metadata,
                events: stream.into_events(),
            },
        );
        Ok(())
    }

    async fn append_to(
        &self,
        stream_name: &StreamName,
        events: Vec<DomainEvent>,
    ) -> StoreResult<()> {
        let mut state = self.state.lock().await;
        let stored =
            state
                .streams
                .get_mut(stream_name.as_str())
                .ok_or_else(|| StoreError::StreamNotFound {
                    stream: stream_name.as_str().to_string(),
                })?;
        Self::check_versions(&stored.events, &events)?;
        stored.events.extend(events);
        Ok(())
    }

    async fn load(&self, stream_name: &StreamName) -> StoreResult<Stream> {
        let state = self.state.lock().await;
        let stored =
            state
                .streams
                .get(stream_name.as_str())
                .ok_or_else(|| StoreError::StreamNotFound {
                    stream: stream_name.as_str().to_string(),
                })?;
        let mut stream = Stream::new(stream_name.clone(), stored.events.clone());
        for (key, value) in &stored.metadata {
            stream = stream.with_metadata(key.clone(), value.clone());
        }
        Ok(stream)
    }

    async fn load_filtered(
        &self,
        stream_name: &StreamName,
        matcher: &MetadataMatcher,
    ) -> StoreResult<Vec<DomainEvent>> {
        let state = self.state.lock().await;
        let stored =
            state
                .streams
                .get(stream_name.as_str())
                .ok_or_else(|| StoreError::StreamNotFound {
                    stream: stream_name.as_str().to_string(),
                })?;
        Ok(stored
            .events
            .iter()
            .filter(|event| matcher.matches(event))
            .cloned()
            .collect())
    }
}
