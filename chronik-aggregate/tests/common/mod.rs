//! 集成测试共用夹具
use chronik_aggregate::aggregate_id::AggregateId;
use chronik_aggregate::aggregate_root::AggregateRoot;
use chronik_store::adapter::InMemoryAdapter;
use chronik_store::domain_event::DomainEvent;
use chronik_store::event_store::EventStore;
use chronik_store::stream::{Stream, StreamName};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use ulid::Ulid;

pub const USER_CREATED: &str = "user.created";
pub const USERNAME_CHANGED: &str = "user.username_changed";

/// 用户聚合：注册 + 改名，事件缓冲不进入快照
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub version: u64,
    #[serde(skip)]
    recorded_events: Vec<DomainEvent>,
}

impl User {
    pub fn register(user_id: impl Into<String>, name: &str, email: &str) -> Self {
        let mut user = Self::default();
        user.record(
            USER_CREATED,
            json!({ "user_id": user_id.into(), "name": name, "email": email }),
        );
        user
    }

    pub fn change_name(&mut self, name: &str) {
        self.record(USERNAME_CHANGED, json!({ "name": name }));
    }

    fn record(&mut self, event_name: &str, payload: Value) {
        let event = DomainEvent::builder()
            .event_name(event_name.to_string())
            .payload(payload)
            .version(self.version + 1)
            .build();
        self.apply(&event);
        self.recorded_events.push(event);
    }
}

impl AggregateRoot for User {
    const TYPE: &'static str = "user";

    fn aggregate_id(&self) -> AggregateId {
        AggregateId::from(self.user_id.as_str())
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn pop_recorded_events(&mut self) -> Vec<DomainEvent> {
        std::mem::take(&mut self.recorded_events)
    }

    fn apply(&mut self, event: &DomainEvent) {
        match event.event_name() {
            USER_CREATED => {
                self.user_id = event.payload()["user_id"]
                    .as_str()
                    .unwrap_or_default()
                    .to_string();
                self.name = event.payload()["name"].as_str().unwrap_or_default().to_string();
                self.email = event.payload()["email"].as_str().unwrap_or_default().to_string();
            }
            USERNAME_CHANGED => {
                self.name = event.payload()["name"].as_str().unwrap_or_default().to_string();
            }
            _ => {}
        }
        self.version = event.version();
    }
}

pub fn new_user_id() -> String {
    Ulid::new().to_string()
}

/// 新建事件存储并预先创建共享默认流
pub async fn store_with_default_stream() -> Arc<EventStore> {
    let store = Arc::new(EventStore::new(Arc::new(InMemoryAdapter::new())));
    store.begin_transaction().await.unwrap();
    store
        .create(Stream::new(StreamName::default(), vec![]))
        .await
        .unwrap();
    store.commit().await.unwrap();
    store
}

/// 新建事件存储（不预建任何流，供独立流模式使用）
pub fn bare_store() -> Arc<EventStore> {
    Arc::new(EventStore::new(Arc::new(InMemoryAdapter::new())))
}
