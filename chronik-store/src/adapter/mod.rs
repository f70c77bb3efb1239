//! 存储适配器边界
//!
//! 定义持久化引擎需要实现的事务化创建/追加/加载协议，并提供一个
//! 事务语义完整的内存实现（`InMemoryAdapter`），用于测试与本地开发。
//! 并发写冲突（乐观锁）由适配器在 `append_to` 中检查并以普通存储错误上报。
//!
mod in_memory;

pub use in_memory::InMemoryAdapter;

use crate::domain_event::DomainEvent;
use crate::error::StoreResult;
use crate::metadata_matcher::MetadataMatcher;
use crate::stream::{Stream, StreamName};
use async_trait::async_trait;

/// 持久化引擎协议
#[async_trait]
pub trait Adapter: Send + Sync {
    async fn begin_transaction(&self) -> StoreResult<()>;

    async fn commit_transaction(&self) -> StoreResult<()>;

    async fn rollback_transaction(&self) -> StoreResult<()>;

    /// 创建新流；流已存在时返回 `StreamExists`
    async fn create(&self, stream: Stream) -> StoreResult<()>;

    /// 向既有流追加事件；流不存在时返回 `StreamNotFound`
    async fn append_to(&self, stream_name: &StreamName, events: Vec<DomainEvent>)
    -> StoreResult<()>;

    /// 按版本升序加载整个流
    async fn load(&self, stream_name: &StreamName) -> StoreResult<Stream>;

    /// 按元数据匹配器过滤加载流中事件（升序）
    async fn load_filtered(
        &self,
        stream_name: &StreamName,
        matcher: &MetadataMatcher,
    ) -> StoreResult<Vec<DomainEvent>>;
}
