//! 事件存储核心（chronik-store）
//!
//! 提供事件溯源持久化内核所依赖的事件流抽象与存储边界：
//! - 流与事件值对象（`stream`、`domain_event`）
//! - 元数据匹配（`metadata_matcher`）：按 `aggregate_id`/`aggregate_type` 等字段过滤加载
//! - 存储适配器边界（`adapter`）：事务化的创建/追加/加载引擎，附带内存实现
//! - 事件存储门面（`event_store`）：事务生命周期、本次事务已记录事件、观察者分发
//! - 生命周期观察者（`observer`）：创建/追加/提交/过滤加载前后的钩子
//!
//! 本 crate 只定义存储边界与最小必要的错误类型，聚合仓储等上层协作者
//! 由 `chronik-aggregate` 提供；具体的持久化后端（例如 Postgres）由外部适配器实现。
//!
pub mod adapter;
pub mod domain_event;
pub mod error;
pub mod event_store;
pub mod metadata_matcher;
pub mod observer;
pub mod stream;
