mod errors;
mod in_memory;
#[cfg(test)]
mod tests;

use async_trait::async_trait;

pub use errors::QueueError;
pub use in_memory::InMemoryQueue;

use crate::types::{MessageId, ReceiptHandle};

/// One message handed out by the queue.
///
/// The receipt identifies this particular delivery attempt; `receive_count`
/// reports how many times the message has been handed out, including this one.
#[derive(Debug, Clone)]
pub struct Delivery {
    pub message_id: MessageId,
    pub receipt: ReceiptHandle,
    pub body: String,
    pub receive_count: u32
}

/// Narrow seam to the durable work queue.
///
/// The queue owns a message until it is acknowledged: deliveries that are
/// rejected, or never resolved, come back through `receive` with a higher
/// `receive_count` until the queue's redelivery budget is spent and the
/// message moves to the dead-letter destination.
#[async_trait]
pub trait WorkQueue: Send + Sync + 'static {
    /// Durably enqueues one message body and returns its queue-assigned id.
    async fn enqueue(&self, body: String) -> Result<MessageId, QueueError>;

    /// Hands out up to `max` deliveries in enqueue order.
    async fn receive(&self, max: usize) -> Result<Vec<Delivery>, QueueError>;

    /// Completes a delivery; the message will not be seen again.
    async fn acknowledge(&self, receipt: &ReceiptHandle) -> Result<(), QueueError>;

    /// Reports a delivery as failed, returning the message to the queue's
    /// redelivery or dead-letter flow.
    async fn reject(&self, receipt: &ReceiptHandle) -> Result<(), QueueError>;
}
