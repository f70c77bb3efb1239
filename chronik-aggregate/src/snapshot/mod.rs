//! 快照（Snapshot）
//!
//! 定义聚合状态在某一版本的缓存物化与其存储协议：
//! - `Snapshot`：不可变值对象，携带序列化投影与捕获版本；
//! - `SnapshotStore`：按（聚合类型，聚合标识）读写最新快照；
//! - `InMemorySnapshotStore`：测试与本地开发用内存实现。
//!
//! 快照只是性能缓存，生命周期独立于事件存储：缺失或过期只会退化为
//! 更长的重放，绝不影响正确性（捕获版本恒 ≤ 权威版本）。
//!
mod in_memory;
mod store;

pub use in_memory::InMemorySnapshotStore;
pub use store::SnapshotStore;

use crate::aggregate_id::AggregateId;
use crate::aggregate_root::AggregateRoot;
use crate::aggregate_type::AggregateType;
use crate::error::AggregateResult;
use bon::Builder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 聚合快照
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
pub struct Snapshot {
    aggregate_type: AggregateType,
    aggregate_id: AggregateId,
    /// 聚合实例的序列化投影
    payload: Value,
    /// 捕获时的聚合版本
    last_version: u64,
    #[builder(default = Utc::now())]
    created_at: DateTime<Utc>,
}

impl Snapshot {
    /// 从聚合实例捕获快照
    pub fn from_aggregate<A>(aggregate: &A) -> AggregateResult<Self>
    where
        A: AggregateRoot,
    {
        Ok(Self {
            aggregate_type: AggregateType::of::<A>(),
            aggregate_id: aggregate.aggregate_id(),
            payload: serde_json::to_value(aggregate)?,
            last_version: aggregate.version(),
            created_at: Utc::now(),
        })
    }

    /// 将投影反序列化为聚合实例（类型不符时报错）
    pub fn to_aggregate<A>(&self) -> AggregateResult<A>
    where
        A: AggregateRoot,
    {
        self.aggregate_type.check::<A>()?;
        let aggregate = serde_json::from_value(self.payload.clone())?;
        Ok(aggregate)
    }

    pub fn aggregate_type(&self) -> &AggregateType {
        &self.aggregate_type
    }

    pub fn aggregate_id(&self) -> &AggregateId {
        &self.aggregate_id
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    pub fn last_version(&self) -> u64 {
        self.last_version
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
