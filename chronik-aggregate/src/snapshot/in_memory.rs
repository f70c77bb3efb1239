//! 内存版快照存储
use crate::aggregate_id::AggregateId;
use crate::aggregate_type::AggregateType;
use crate::error::AggregateResult;
use crate::snapshot::{Snapshot, SnapshotStore};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// 内存快照存储：每个（类型，标识）只保留最新一份
#[derive(Debug, Default)]
pub struct InMemorySnapshotStore {
    snapshots: Mutex<HashMap<(String, String), Snapshot>>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SnapshotStore for InMemorySnapshotStore {
    async fn get(
        &self,
        aggregate_type: &AggregateType,
        aggregate_id: &AggregateId,
    ) -> AggregateResult<Option<Snapshot>> {
        let key = (
            aggregate_type.as_str().to_string(),
            aggregate_id.as_str().to_string(),
        );
        Ok(self.snapshots.lock().await.get(&key).cloned())
    }

    async fn save(&self, snapshot: Snapshot) -> AggregateResult<()> {
        let key = (
            snapshot.aggregate_type().as_str().to_string(),
            snapshot.aggregate_id().as_str().to_string(),
        );
        self.snapshots.lock().await.insert(key, snapshot);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate_root::AggregateRoot;
    use chronik_store::domain_event::DomainEvent;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct User {
        version: u64,
    }

    impl AggregateRoot for User {
        const TYPE: &'static str = "user";
        fn aggregate_id(&self) -> AggregateId {
            AggregateId::from("u-1")
        }
        fn version(&self) -> u64 {
            self.version
        }
        fn pop_recorded_events(&mut self) -> Vec<DomainEvent> {
            vec![]
        }
        fn apply(&mut self, _event: &DomainEvent) {}
    }

    #[tokio::test]
    async fn save_overwrites_previous_snapshot() {
        let store = InMemorySnapshotStore::new();
        let kind = AggregateType::of::<User>();
        let id = AggregateId::from("u-1");

        store
            .save(Snapshot::from_aggregate(&User { version: 1 }).unwrap())
            .await
            .unwrap();
        store
            .save(Snapshot::from_aggregate(&User { version: 2 }).unwrap())
            .await
            .unwrap();

        let latest = store.get(&kind, &id).await.unwrap().unwrap();
        assert_eq!(latest.last_version(), 2);
    }

    #[tokio::test]
    async fn missing_snapshot_is_none() {
        let store = InMemorySnapshotStore::new();
        let found = store
            .get(&AggregateType::of::<User>(), &AggregateId::from("absent"))
            .await
            .unwrap();
        assert!(found.is_none());
    }
}
