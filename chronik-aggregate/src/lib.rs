//! 聚合仓储层（chronik-aggregate）
//!
//! 在 `chronik-store` 的存储边界之上实现事件溯源聚合的装载与刷写：
//! - 聚合能力接口（`aggregate_root`）与显式翻译器（`translator`）
//! - 聚合标识与类型值对象（`aggregate_id`、`aggregate_type`）
//! - 快照值对象与快照存储（`snapshot`）：纯性能缓存，过期不影响正确性
//! - 聚合仓储（`repository`）：事务内一致的身份映射、提交钩子驱动的
//!   待持久化事件刷写、共享流/每聚合专属流两种命名策略
//!
//! 典型用法：
//! 1. 为聚合实现 `AggregateRoot`（标识、版本、待持久化事件缓冲、事件重放）；
//! 2. 通过 `AggregateRepository::builder` 装配存储、翻译器与可选快照存储；
//! 3. 在存储事务内 `add`/`get` 聚合，提交时仓储自动刷写新事件。
//!
pub mod aggregate_id;
pub mod aggregate_root;
pub mod aggregate_type;
pub mod error;
pub mod repository;
pub mod snapshot;
pub mod translator;
