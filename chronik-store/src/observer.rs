//! 存储生命周期观察者
//!
//! 以显式方法代替字符串命名的动作事件：创建/追加/提交/过滤加载的前后钩子，
//! 全部提供空实现，按需覆写。注册范围仅限单个 `EventStore` 实例，
//! 进程内的多个存储互不通知。
//!
//! `before_commit` 在适配器提交之前触发，钩子内对存储的再入调用
//! （如聚合仓储在此刷写待持久化事件）落在同一事务中；
//! 其返回错误会中止本次提交并原样上抛。
//!
use crate::domain_event::DomainEvent;
use crate::error::StoreResult;
use crate::event_store::EventStore;
use crate::metadata_matcher::MetadataMatcher;
use crate::stream::{Stream, StreamName};
use async_trait::async_trait;

/// 事件存储生命周期观察者（默认全部空实现）
#[async_trait]
pub trait StoreObserver: Send + Sync {
    async fn before_create(&self, _store: &EventStore, _stream: &Stream) -> StoreResult<()> {
        Ok(())
    }

    async fn after_create(
        &self,
        _store: &EventStore,
        _stream_name: &StreamName,
        _events: &[DomainEvent],
    ) {
    }

    async fn before_append(
        &self,
        _store: &EventStore,
        _stream_name: &StreamName,
        _events: &[DomainEvent],
    ) -> StoreResult<()> {
        Ok(())
    }

    async fn after_append(
        &self,
        _store: &EventStore,
        _stream_name: &StreamName,
        _events: &[DomainEvent],
    ) {
    }

    async fn before_commit(&self, _store: &EventStore) -> StoreResult<()> {
        Ok(())
    }

    /// `recorded` 为本次事务内全部已记录事件
    async fn after_commit(&self, _store: &EventStore, _recorded: &[DomainEvent]) {}

    async fn after_rollback(&self, _store: &EventStore) {}

    async fn before_load_filtered(
        &self,
        _store: &EventStore,
        _stream_name: &StreamName,
        _matcher: &MetadataMatcher,
    ) {
    }

    /// `events` 为本次过滤加载命中的事件序列，可重复遍历
    async fn after_load_filtered(
        &self,
        _store: &EventStore,
        _stream_name: &StreamName,
        _events: &[DomainEvent],
    ) {
    }
}
