//! 事件存储门面（EventStore）
//!
//! 组合存储适配器与观察者列表，负责：
//! - 事务生命周期（begin/commit/rollback）与再入约束；
//! - 记录本次事务内追加的事件，在提交后通过 `after_commit` 暴露；
//! - 在创建/追加/提交/过滤加载前后分发观察者钩子。
//!
//! 提交顺序：`before_commit`（钩子内的再入追加仍落在本事务中）→ 适配器提交 →
//! `after_commit`（携带本次事务全部已记录事件）。门面自身的正确性不依赖任何观察者。
//!
use crate::adapter::Adapter;
use crate::domain_event::DomainEvent;
use crate::error::{StoreError, StoreResult};
use crate::metadata_matcher::MetadataMatcher;
use crate::observer::StoreObserver;
use crate::stream::{Stream, StreamName};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Default)]
struct TransactionState {
    in_transaction: bool,
    recorded: Vec<DomainEvent>,
}

/// 事件存储
pub struct EventStore {
    adapter: Arc<dyn Adapter>,
    observers: Mutex<Vec<Arc<dyn StoreObserver>>>,
    state: Mutex<TransactionState>,
}

impl EventStore {
    pub fn new(adapter: Arc<dyn Adapter>) -> Self {
        Self {
            adapter,
            observers: Mutex::new(Vec::new()),
            state: Mutex::new(TransactionState::default()),
        }
    }

    /// 注册观察者（仅对本实例生效）
    pub async fn attach(&self, observer: Arc<dyn StoreObserver>) {
        self.observers.lock().await.push(observer);
    }

    /// 注销观察者（按实例指针匹配），此后不再收到任何钩子
    pub async fn detach(&self, observer: &Arc<dyn StoreObserver>) {
        self.observers
            .lock()
            .await
            .retain(|existing| !Arc::ptr_eq(existing, observer));
    }

    async fn observers(&self) -> Vec<Arc<dyn StoreObserver>> {
        self.observers.lock().await.clone()
    }

    async fn ensure_in_transaction(&self) -> StoreResult<()> {
        if self.state.lock().await.in_transaction {
            Ok(())
        } else {
            Err(StoreError::NoActiveTransaction)
        }
    }

    pub async fn begin_transaction(&self) -> StoreResult<()> {
        let mut state = self.state.lock().await;
        if state.in_transaction {
            return Err(StoreError::TransactionAlreadyStarted);
        }
        self.adapter.begin_transaction().await?;
        state.in_transaction = true;
        Ok(())
    }

    pub async fn commit(&self) -> StoreResult<()> {
        self.ensure_in_transaction().await?;

        let observers = self.observers().await;
        for observer in &observers {
            observer.before_commit(self).await?;
        }

        self.adapter.commit_transaction().await?;

        let recorded = {
            let mut state = self.state.lock().await;
            state.in_transaction = false;
            std::mem::take(&mut state.recorded)
        };
        tracing::debug!(recorded = recorded.len(), "transaction committed");

        for observer in &observers {
            observer.after_commit(self, &recorded).await;
        }
        Ok(())
    }

    pub async fn rollback(&self) -> StoreResult<()> {
        self.ensure_in_transaction().await?;
        self.adapter.rollback_transaction().await?;

        {
            let mut state = self.state.lock().await;
            state.in_transaction = false;
            state.recorded.clear();
        }
        tracing::debug!("transaction rolled back");

        for observer in &self.observers().await {
            observer.after_rollback(self).await;
        }
        Ok(())
    }

    pub async fn create(&self, stream: Stream) -> StoreResult<()> {
        self.ensure_in_transaction().await?;

        let observers = self.observers().await;
        for observer in &observers {
            observer.before_create(self, &stream).await?;
        }

        let stream_name = stream.stream_name().clone();
        let events = stream.events().to_vec();
        self.adapter.create(stream).await?;
        self.state.lock().await.recorded.extend(events.iter().cloned());
        tracing::debug!(stream = %stream_name, events = events.len(), "stream created");

        for observer in &observers {
            observer.after_create(self, &stream_name, &events).await;
        }
        Ok(())
    }

    pub async fn append_to(
        &self,
        stream_name: &StreamName,
        events: Vec<DomainEvent>,
    ) -> StoreResult<()> {
        self.ensure_in_transaction().await?;

        let observers = self.observers().await;
        for observer in &observers {
            observer.before_append(self, stream_name, &events).await?;
        }

        self.adapter.append_to(stream_name, events.clone()).await?;
        self.state.lock().await.recorded.extend(events.iter().cloned());
        tracing::debug!(stream = %stream_name, events = events.len(), "events appended");

        for observer in &observers {
            observer.after_append(self, stream_name, &events).await;
        }
        Ok(())
    }

    pub async fn load(&self, stream_name: &StreamName) -> StoreResult<Stream> {
        self.adapter.load(stream_name).await
    }

    pub async fn load_filtered(
        &self,
        stream_name: &StreamName,
        matcher: &MetadataMatcher,
    ) -> StoreResult<Vec<DomainEvent>> {
        let observers = self.observers().await;
        for observer in &observers {
            observer.before_load_filtered(self, stream_name, matcher).await;
        }

        let events = self.adapter.load_filtered(stream_name, matcher).await?;

        for observer in &observers {
            observer.after_load_filtered(self, stream_name, &events).await;
        }
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::InMemoryAdapter;
    use async_trait::async_trait;
    use serde_json::json;

    fn new_store() -> EventStore {
        EventStore::new(Arc::new(InMemoryAdapter::new()))
    }

    fn event(name: &str, version: u64) -> DomainEvent {
        DomainEvent::builder()
            .event_name(name.to_string())
            .payload(json!({}))
            .version(version)
            .build()
    }

    #[derive(Default)]
    struct Probe {
        calls: Mutex<Vec<String>>,
        committed: Mutex<Vec<DomainEvent>>,
    }

    #[async_trait]
    impl StoreObserver for Probe {
        async fn before_create(&self, _store: &EventStore, _stream: &Stream) -> StoreResult<()> {
            self.calls.lock().await.push("before_create".into());
            Ok(())
        }

        async fn after_create(
            &self,
            _store: &EventStore,
            _stream_name: &StreamName,
            _events: &[DomainEvent],
        ) {
            self.calls.lock().await.push("after_create".into());
        }

        async fn before_commit(&self, _store: &EventStore) -> StoreResult<()> {
            self.calls.lock().await.push("before_commit".into());
            Ok(())
        }

        async fn after_commit(&self, _store: &EventStore, recorded: &[DomainEvent]) {
            self.calls.lock().await.push("after_commit".into());
            self.committed.lock().await.extend(recorded.iter().cloned());
        }

        async fn after_rollback(&self, _store: &EventStore) {
            self.calls.lock().await.push("after_rollback".into());
        }
    }

    #[tokio::test]
    async fn commit_requires_active_transaction() {
        let store = new_store();
        match store.commit().await.unwrap_err() {
            StoreError::NoActiveTransaction => {}
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn nested_begin_is_rejected() {
        let store = new_store();
        store.begin_transaction().await.unwrap();
        match store.begin_transaction().await.unwrap_err() {
            StoreError::TransactionAlreadyStarted => {}
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn create_outside_transaction_is_rejected() {
        let store = new_store();
        let err = store
            .create(Stream::new(StreamName::default(), vec![]))
            .await
            .unwrap_err();
        match err {
            StoreError::NoActiveTransaction => {}
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn observers_see_hooks_in_order_with_recorded_events() {
        let store = new_store();
        let probe = Arc::new(Probe::default());
        store.attach(probe.clone()).await;

        store.begin_transaction().await.unwrap();
        store
            .create(Stream::new(StreamName::default(), vec![event("user.created", 1)]))
            .await
            .unwrap();
        store.commit().await.unwrap();

        let calls = probe.calls.lock().await.clone();
        assert_eq!(
            calls,
            vec!["before_create", "after_create", "before_commit", "after_commit"]
        );
        let committed = probe.committed.lock().await;
        assert_eq!(committed.len(), 1);
        assert_eq!(committed[0].event_name(), "user.created");
    }

    #[tokio::test]
    async fn rollback_discards_recorded_events() {
        let store = new_store();
        let probe = Arc::new(Probe::default());
        store.attach(probe.clone()).await;

        store.begin_transaction().await.unwrap();
        store
            .create(Stream::new(StreamName::default(), vec![event("user.created", 1)]))
            .await
            .unwrap();
        store.rollback().await.unwrap();

        // 回滚后流不存在，之前记录的事件也被丢弃
        match store.load(&StreamName::default()).await.unwrap_err() {
            StoreError::StreamNotFound { .. } => {}
            other => panic!("unexpected {other:?}"),
        }
        assert!(probe.committed.lock().await.is_empty());
        assert_eq!(probe.calls.lock().await.last().unwrap(), "after_rollback");
    }

    #[tokio::test]
    async fn detached_observer_stops_receiving_hooks() {
        let store = new_store();
        let probe = Arc::new(Probe::default());
        store.attach(probe.clone()).await;

        store.begin_transaction().await.unwrap();
        store
            .create(Stream::new(StreamName::default(), vec![event("user.created", 1)]))
            .await
            .unwrap();
        store.commit().await.unwrap();
        let seen_before = probe.calls.lock().await.len();

        let detached: Arc<dyn StoreObserver> = probe.clone();
        store.detach(&detached).await;

        store.begin_transaction().await.unwrap();
        store
            .append_to(&StreamName::default(), vec![event("user.username_changed", 2)])
            .await
            .unwrap();
        store.commit().await.unwrap();

        assert_eq!(probe.calls.lock().await.len(), seen_before);
    }

    struct AppendOnCommit;

    #[async_trait]
    impl StoreObserver for AppendOnCommit {
        async fn before_commit(&self, store: &EventStore) -> StoreResult<()> {
            store
                .append_to(&StreamName::default(), vec![event("user.username_changed", 2)])
                .await
        }
    }

    #[tokio::test]
    async fn before_commit_may_append_within_same_transaction() {
        let store = new_store();
        store.begin_transaction().await.unwrap();
        store
            .create(Stream::new(StreamName::default(), vec![event("user.created", 1)]))
            .await
            .unwrap();
        store.commit().await.unwrap();

        let probe = Arc::new(Probe::default());
        store.attach(Arc::new(AppendOnCommit)).await;
        store.attach(probe.clone()).await;

        store.begin_transaction().await.unwrap();
        store.commit().await.unwrap();

        let stream = store.load(&StreamName::default()).await.unwrap();
        assert_eq!(stream.events().len(), 2);
        // 钩子内追加的事件同样出现在 after_commit 的已记录集合中
        assert_eq!(probe.committed.lock().await.len(), 1);
    }
}
