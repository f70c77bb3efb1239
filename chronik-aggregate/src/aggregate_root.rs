//! 聚合能力接口（AggregateRoot）
//!
//! 约束一个可被事件溯源仓储管理的聚合必须具备的能力：
//! - 报告标识与当前版本；
//! - 排空自上次提取以来记录的待持久化事件缓冲；
//! - 以单个历史事件推进自身状态（重放）。
//!
//! 聚合实例始终由领域逻辑独占持有与修改；仓储只读取其待持久化事件
//! （排空缓冲），以及在装载时构造/推进实例。绑定方式为显式实现本接口，
//! 不做任何结构性或反射式发现。
//!
use crate::aggregate_id::AggregateId;
use chronik_store::domain_event::DomainEvent;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// 聚合根能力接口
///
/// `Serialize`/`DeserializeOwned` 用于快照投影；待持久化事件缓冲
/// 应标注 `#[serde(skip)]`，不进入快照。`Default` 提供重放起点（版本 0），
/// `apply` 负责把版本推进到所应用事件的版本。
pub trait AggregateRoot: Default + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// 聚合类型名，用于标记流与快照
    const TYPE: &'static str;

    /// 聚合标识
    fn aggregate_id(&self) -> AggregateId;

    /// 当前版本（已应用事件数；新实例为 0）
    fn version(&self) -> u64;

    /// 排空并返回自上次提取以来记录的事件；
    /// 无新事件时再次调用必须返回空序列
    fn pop_recorded_events(&mut self) -> Vec<DomainEvent>;

    /// 应用一个历史事件，推进状态与版本
    fn apply(&mut self, event: &DomainEvent);
}
