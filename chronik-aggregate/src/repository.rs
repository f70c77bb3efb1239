//! 聚合仓储（AggregateRepository）
//!
//! 面向单一聚合类型的持久化门面：
//! - `add`/`get` 登记与装载聚合，事务内维护身份映射（同一标识恒返回同一句柄）；
//! - 待持久化事件在提交前（`before_commit` 钩子内）统一刷写，落在同一事务中；
//! - 装载时优先查询快照，只增量重放捕获版本之后的事件；
//! - 可按聚合独立建流（`<类型>-<标识>`），或共享默认流并按元数据过滤。
//!
//! 仓储通过 `StoreObserver` 挂接到事件存储上：提交后与回滚后清空身份映射，
//! 下一个事务重新从存储装载。
//!
use crate::aggregate_id::AggregateId;
use crate::aggregate_root::AggregateRoot;
use crate::aggregate_type::AggregateType;
use crate::error::{AggregateError, AggregateResult};
use crate::snapshot::SnapshotStore;
use crate::translator::{AggregateTranslator, CapabilityTranslator};
use async_trait::async_trait;
use chronik_store::domain_event::DomainEvent;
use chronik_store::error::{StoreError, StoreResult};
use chronik_store::event_store::EventStore;
use chronik_store::metadata_matcher::MetadataMatcher;
use chronik_store::observer::StoreObserver;
use chronik_store::stream::{Stream, StreamName};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// 身份映射中的登记项
struct TrackedAggregate<A> {
    instance: Arc<RwLock<A>>,
    stream_name: StreamName,
    /// 首次刷写时需要创建流（独立流模式下新登记的聚合）
    is_new: bool,
}

/// 聚合仓储
pub struct AggregateRepository<A>
where
    A: AggregateRoot,
{
    store: Arc<EventStore>,
    aggregate_type: AggregateType,
    translator: Arc<dyn AggregateTranslator<A>>,
    snapshot_store: Option<Arc<dyn SnapshotStore>>,
    stream_name: StreamName,
    one_stream_per_aggregate: bool,
    identity_map: Mutex<HashMap<AggregateId, TrackedAggregate<A>>>,
}

impl<A> AggregateRepository<A>
where
    A: AggregateRoot,
{
    pub fn builder(store: Arc<EventStore>) -> AggregateRepositoryBuilder<A> {
        AggregateRepositoryBuilder::new(store)
    }

    pub fn aggregate_type(&self) -> &AggregateType {
        &self.aggregate_type
    }

    /// 聚合所在的流名：独立流模式下为 `<类型>-<标识>`，否则为共享流
    fn stream_name_for(&self, aggregate_id: &AggregateId) -> AggregateResult<StreamName> {
        if self.one_stream_per_aggregate {
            Ok(StreamName::new(format!(
                "{}-{}",
                self.aggregate_type, aggregate_id
            ))?)
        } else {
            Ok(self.stream_name.clone())
        }
    }

    /// 登记一个新聚合实例并返回其共享句柄
    ///
    /// 不触发任何存储 I/O；待持久化事件在提交前统一刷写。
    pub async fn add(&self, instance: A) -> AggregateResult<Arc<RwLock<A>>> {
        self.aggregate_type.check::<A>()?;
        let aggregate_id = self.translator.extract_id(&instance);
        let stream_name = self.stream_name_for(&aggregate_id)?;

        let handle = Arc::new(RwLock::new(instance));
        self.identity_map.lock().await.insert(
            aggregate_id.clone(),
            TrackedAggregate {
                instance: handle.clone(),
                stream_name,
                is_new: self.one_stream_per_aggregate,
            },
        );
        tracing::debug!(aggregate_id = %aggregate_id, "aggregate registered");
        Ok(handle)
    }

    /// 按标识装载聚合
    ///
    /// 事务内重复装载返回同一句柄；聚合不存在时返回 `None`。
    /// 配置了快照存储时优先从快照恢复，只重放捕获版本之后的事件。
    pub async fn get(&self, aggregate_id: &AggregateId) -> AggregateResult<Option<Arc<RwLock<A>>>> {
        if let Some(tracked) = self.identity_map.lock().await.get(aggregate_id) {
            return Ok(Some(tracked.instance.clone()));
        }

        let mut base: Option<A> = None;
        let mut snapshot_version: Option<u64> = None;
        if let Some(snapshot_store) = &self.snapshot_store {
            if let Some(snapshot) = snapshot_store
                .get(&self.aggregate_type, aggregate_id)
                .await?
            {
                snapshot_version = Some(snapshot.last_version());
                base = Some(snapshot.to_aggregate()?);
            }
        }

        let stream_name = self.stream_name_for(aggregate_id)?;
        let events = self
            .load_history(&stream_name, aggregate_id, snapshot_version)
            .await?;

        let instance = match (base, events.is_empty()) {
            (None, true) => return Ok(None),
            (None, false) => self.translator.reconstitute_from_history(&events)?,
            (Some(mut aggregate), _) => {
                self.translator.apply_events(&mut aggregate, &events)?;
                aggregate
            }
        };
        tracing::debug!(
            aggregate_id = %aggregate_id,
            replayed = events.len(),
            from_snapshot = snapshot_version.is_some(),
            "aggregate loaded"
        );

        let handle = Arc::new(RwLock::new(instance));
        self.identity_map.lock().await.insert(
            aggregate_id.clone(),
            TrackedAggregate {
                instance: handle.clone(),
                stream_name,
                is_new: false,
            },
        );
        Ok(Some(handle))
    }

    /// 聚合的当前版本（已应用事件数）
    pub fn extract_version(&self, aggregate: &A) -> u64 {
        self.translator.extract_version(aggregate)
    }

    async fn load_history(
        &self,
        stream_name: &StreamName,
        aggregate_id: &AggregateId,
        after_version: Option<u64>,
    ) -> AggregateResult<Vec<DomainEvent>> {
        let mut matcher = MetadataMatcher::new();
        if !self.one_stream_per_aggregate {
            matcher = matcher
                .with_equals("aggregate_id", aggregate_id.as_str())
                .with_equals("aggregate_type", self.aggregate_type.as_str());
        }
        if let Some(version) = after_version {
            matcher = matcher.with_greater_than("aggregate_version", version);
        }

        let loaded = if matcher.is_empty() {
            self.store
                .load(stream_name)
                .await
                .map(|stream| stream.into_events())
        } else {
            self.store.load_filtered(stream_name, &matcher).await
        };
        match loaded {
            Ok(events) => Ok(events),
            Err(StoreError::StreamNotFound { .. }) => Ok(Vec::new()),
            Err(err) => Err(err.into()),
        }
    }

    /// 刷写身份映射中全部待持久化事件（提交前钩子调用）
    ///
    /// 每个事件附加 `aggregate_id`（恒为字符串）、`aggregate_type`、
    /// `aggregate_version` 元数据；独立流模式下首次刷写创建专属流，
    /// 建流成功后才清除新建标记，失败的提交重试时仍走建流路径。
    async fn flush_pending_events(&self, store: &EventStore) -> AggregateResult<()> {
        let mut map = self.identity_map.lock().await;
        for (aggregate_id, tracked) in map.iter_mut() {
            let pending = {
                let mut instance = tracked.instance.write().await;
                self.translator.extract_pending_events(&mut instance)
            };
            if pending.is_empty() && !tracked.is_new {
                continue;
            }
            let enriched: Vec<DomainEvent> = pending
                .into_iter()
                .map(|event| {
                    let version = event.version();
                    event
                        .with_metadata("aggregate_id", Value::String(aggregate_id.to_string()))
                        .with_metadata(
                            "aggregate_type",
                            Value::String(self.aggregate_type.to_string()),
                        )
                        .with_metadata("aggregate_version", Value::from(version))
                })
                .collect();
            if tracked.is_new {
                tracing::debug!(stream = %tracked.stream_name, events = enriched.len(), "flushing into new stream");
                store
                    .create(Stream::new(tracked.stream_name.clone(), enriched))
                    .await?;
                tracked.is_new = false;
            } else if !enriched.is_empty() {
                tracing::debug!(stream = %tracked.stream_name, events = enriched.len(), "flushing pending events");
                store.append_to(&tracked.stream_name, enriched).await?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl<A> StoreObserver for AggregateRepository<A>
where
    A: AggregateRoot,
{
    async fn before_commit(&self, store: &EventStore) -> StoreResult<()> {
        self.flush_pending_events(store).await.map_err(|err| match err {
            AggregateError::Store(err) => err,
            other => StoreError::Observer {
                reason: other.to_string(),
            },
        })
    }

    async fn after_commit(&self, _store: &EventStore, _recorded: &[DomainEvent]) {
        self.identity_map.lock().await.clear();
    }

    async fn after_rollback(&self, _store: &EventStore) {
        self.identity_map.lock().await.clear();
    }
}

/// 聚合仓储构建器
///
/// 默认使用 `CapabilityTranslator`、`AggregateType::of::<A>()` 与共享默认流；
/// `build` 完成后仓储已作为观察者挂接到事件存储。
pub struct AggregateRepositoryBuilder<A>
where
    A: AggregateRoot,
{
    store: Arc<EventStore>,
    aggregate_type: AggregateType,
    translator: Arc<dyn AggregateTranslator<A>>,
    snapshot_store: Option<Arc<dyn SnapshotStore>>,
    stream_name: StreamName,
    one_stream_per_aggregate: bool,
}

impl<A> AggregateRepositoryBuilder<A>
where
    A: AggregateRoot,
{
    pub fn new(store: Arc<EventStore>) -> Self {
        Self {
            store,
            aggregate_type: AggregateType::of::<A>(),
            translator: Arc::new(CapabilityTranslator),
            snapshot_store: None,
            stream_name: StreamName::default(),
            one_stream_per_aggregate: false,
        }
    }

    pub fn with_aggregate_type(mut self, aggregate_type: AggregateType) -> Self {
        self.aggregate_type = aggregate_type;
        self
    }

    pub fn with_translator(mut self, translator: Arc<dyn AggregateTranslator<A>>) -> Self {
        self.translator = translator;
        self
    }

    pub fn with_snapshot_store(mut self, snapshot_store: Arc<dyn SnapshotStore>) -> Self {
        self.snapshot_store = Some(snapshot_store);
        self
    }

    pub fn with_stream_name(mut self, stream_name: StreamName) -> Self {
        self.stream_name = stream_name;
        self
    }

    pub fn one_stream_per_aggregate(mut self, enabled: bool) -> Self {
        self.one_stream_per_aggregate = enabled;
        self
    }

    pub async fn build(self) -> Arc<AggregateRepository<A>> {
        let store = self.store.clone();
        let repository = Arc::new(AggregateRepository {
            store: self.store,
            aggregate_type: self.aggregate_type,
            translator: self.translator,
            snapshot_store: self.snapshot_store,
            stream_name: self.stream_name,
            one_stream_per_aggregate: self.one_stream_per_aggregate,
            identity_map: Mutex::new(HashMap::new()),
        });
        store.attach(repository.clone()).await;
        repository
    }
}
