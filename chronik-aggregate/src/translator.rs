//! 聚合翻译器（AggregateTranslator）
//!
//! 将仓储与具体聚合形态解耦的能力桥：提取标识/版本/待持久化事件，
//! 从历史重建实例，或将快照派生的实例快进到最新状态。
//! 默认实现 `CapabilityTranslator` 通过 `AggregateRoot` 接口绑定；
//! 测试中可替换为任意自定义实现。
//!
use crate::aggregate_id::AggregateId;
use crate::aggregate_root::AggregateRoot;
use crate::error::{AggregateError, AggregateResult};
use chronik_store::domain_event::DomainEvent;

/// 翻译器协议
pub trait AggregateTranslator<A>: Send + Sync
where
    A: AggregateRoot,
{
    fn extract_id(&self, aggregate: &A) -> AggregateId;

    fn extract_version(&self, aggregate: &A) -> u64;

    /// 排空实例的待持久化事件缓冲并返回（幂等安全：
    /// 无新事件时第二次调用得到空序列）
    fn extract_pending_events(&self, aggregate: &mut A) -> Vec<DomainEvent>;

    /// 从按版本升序的完整历史重建实例（版本从 1 开始）；
    /// 空历史视为翻译失败
    fn reconstitute_from_history(&self, events: &[DomainEvent]) -> AggregateResult<A>;

    /// 将既有实例按升序应用事件快进（用于快照增量重放）
    fn apply_events(&self, aggregate: &mut A, events: &[DomainEvent]) -> AggregateResult<()>;
}

/// 默认翻译器：经由 `AggregateRoot` 能力接口绑定
#[derive(Debug, Clone, Copy, Default)]
pub struct CapabilityTranslator;

impl<A> AggregateTranslator<A> for CapabilityTranslator
where
    A: AggregateRoot,
{
    fn extract_id(&self, aggregate: &A) -> AggregateId {
        aggregate.aggregate_id()
    }

    fn extract_version(&self, aggregate: &A) -> u64 {
        aggregate.version()
    }

    fn extract_pending_events(&self, aggregate: &mut A) -> Vec<DomainEvent> {
        aggregate.pop_recorded_events()
    }

    fn reconstitute_from_history(&self, events: &[DomainEvent]) -> AggregateResult<A> {
        if events.is_empty() {
            return Err(AggregateError::Translation {
                reason: "cannot reconstitute aggregate from empty history".to_string(),
            });
        }
        let mut aggregate = A::default();
        self.apply_events(&mut aggregate, events)?;
        Ok(aggregate)
    }

    fn apply_events(&self, aggregate: &mut A, events: &[DomainEvent]) -> AggregateResult<()> {
        for event in events {
            let expected = aggregate.version() + 1;
            if event.version() != expected {
                return Err(AggregateError::Translation {
                    reason: format!(
                        "non-contiguous event version: expected {expected}, got {}",
                        event.version()
                    ),
                });
            }
            aggregate.apply(event);
        }
        Ok(())
    }
}
