use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::debug;

use crate::bus::{BrokerTransport, BusError, BusMessage};

struct GroupChannel {
    group_id: String,
    sender: mpsc::UnboundedSender<BusMessage>
}

/// In-process broker used by tests and the bootstrap demo.
///
/// Delivery semantics mirror the external contract this crate depends on:
/// every registered consumer group receives every message published after it
/// joined, exactly once per group and in publish order per topic (a superset
/// of the per-partition ordering a real broker promises). Messages published
/// to a topic with no registered groups are dropped, matching a consumer that
/// joins with only new messages requested.
pub struct InMemoryBroker {
    topics: DashMap<String, Vec<GroupChannel>>,
    open_failures: AtomicU32
}

impl InMemoryBroker {
    pub fn new() -> Self {
        Self {
            topics: DashMap::new(),
            open_failures: AtomicU32::new(0)
        }
    }

    /// Makes the next `attempts` calls to `open` fail, for exercising the
    /// client's connect backoff.
    pub fn fail_next_opens(&self, attempts: u32) {
        self.open_failures.store(attempts, Ordering::SeqCst);
    }

    /// Drops every group channel so subscription loops drain their buffered
    /// messages and terminate.
    pub fn shutdown(&self) {
        self.topics.clear();
    }
}

#[async_trait]
impl BrokerTransport for InMemoryBroker {
    async fn open(&self) -> Result<(), BusError> {
        if self.open_failures.load(Ordering::SeqCst) > 0 {
            self.open_failures.fetch_sub(1, Ordering::SeqCst);
            return Err(BusError::connection_failed("broker unavailable"));
        }

        Ok(())
    }

    async fn close(&self) {}

    async fn send(&self, topic: &str, message: BusMessage) -> Result<(), BusError> {
        if let Some(groups) = self.topics.get(topic) {
            for group in groups.iter() {
                //NOTE: A group whose receiver has gone away simply stops receiving,
                //      that is a consumer lifecycle event and not a publish failure.
                if group.sender.send(message.clone()).is_err() {
                    debug!("Group [{}] on topic [{topic}] is gone; message not delivered to it", group.group_id);
                }
            }
        }

        Ok(())
    }

    async fn send_batch(&self, topic: &str, messages: Vec<BusMessage>) -> Result<(), BusError> {
        for message in messages {
            self.send(topic, message).await?;
        }

        Ok(())
    }

    async fn register(&self, topic: &str, group_id: &str) -> Result<mpsc::UnboundedReceiver<BusMessage>, BusError> {
        let mut groups = self.topics.entry(topic.to_string()).or_default();

        if groups.iter().any(|group| group.group_id == group_id) {
            return Err(BusError::subscribe_failed(topic, group_id, "group already registered"));
        }

        let (sender, receiver) = mpsc::unbounded_channel();

        groups.push(GroupChannel {
            group_id: group_id.to_string(),
            sender
        });

        Ok(receiver)
    }
}
