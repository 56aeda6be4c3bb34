mod client;
mod errors;
mod in_memory;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::mpsc;

pub use client::EventBusClient;
pub use errors::BusError;
pub use in_memory::InMemoryBroker;

/// One message as it travels over the bus.
///
/// `key` is the partitioning key: the broker must deliver messages sharing a
/// key in publish order to any single consumer group. No ordering is promised
/// across keys or topics.
#[derive(Debug, Clone)]
pub struct BusMessage {
    pub key: String,
    pub payload: String,
    pub content_type: &'static str,
    pub timestamp_millis: i64
}

impl BusMessage {
    pub fn json(key: impl Into<String>, payload: String) -> Self {
        Self {
            key: key.into(),
            payload,
            content_type: "application/json",
            timestamp_millis: Utc::now().timestamp_millis()
        }
    }
}

/// Narrow seam to the broker infrastructure.
///
/// The broker itself (partition administration, persistence, replication) is
/// an external managed service; implementations only carry messages. A
/// successful `send` means the broker acknowledged receipt, giving the caller
/// at-least-once semantics.
#[async_trait]
pub trait BrokerTransport: Send + Sync + 'static {
    /// Establishes the underlying session. May fail transiently; retry policy
    /// is the caller's concern.
    async fn open(&self) -> Result<(), BusError>;

    /// Releases the session. Must be safe to call when no session exists.
    async fn close(&self);

    async fn send(&self, topic: &str, message: BusMessage) -> Result<(), BusError>;

    /// Sends a whole batch; an error means the batch must be treated as not
    /// delivered, never as partially delivered.
    async fn send_batch(&self, topic: &str, messages: Vec<BusMessage>) -> Result<(), BusError>;

    /// Joins `group_id` on `topic` and returns the group's ordered delivery
    /// stream. Each group sees every message published after it joined.
    async fn register(&self, topic: &str, group_id: &str) -> Result<mpsc::UnboundedReceiver<BusMessage>, BusError>;
}
