//! 快照存储协议
use crate::aggregate_id::AggregateId;
use crate::aggregate_type::AggregateType;
use crate::error::AggregateResult;
use crate::snapshot::Snapshot;
use async_trait::async_trait;
use std::sync::Arc;

/// 按（聚合类型，聚合标识）读写最新快照
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn get(
        &self,
        aggregate_type: &AggregateType,
        aggregate_id: &AggregateId,
    ) -> AggregateResult<Option<Snapshot>>;

    async fn save(&self, snapshot: Snapshot) -> AggregateResult<()>;
}

#[async_trait]
impl<T> SnapshotStore for Arc<T>
where
    T: SnapshotStore + ?Sized,
{
    async fn get(
        &self,
        aggregate_type: &AggregateType,
        aggregate_id: &AggregateId,
    ) -> AggregateResult<Option<Snapshot>> {
        (**self).get(aggregate_type, aggregate_id).await
    }

    async fn save(&self, snapshot: Snapshot) -> AggregateResult<()> {
        (**self).save(snapshot).await
    }
}
