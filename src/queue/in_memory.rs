use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::queue::{Delivery, QueueError, WorkQueue};
use crate::types::{MessageId, ReceiptHandle};

const DEFAULT_MAX_RECEIVES: u32 = 3;

struct QueuedMessage {
    message_id: MessageId,
    body: String,
    receive_count: u32
}

#[derive(Default)]
struct QueueInner {
    ready: VecDeque<QueuedMessage>,
    in_flight: HashMap<ReceiptHandle, QueuedMessage>,
    dead_letter: Vec<QueuedMessage>,
    next_message: u64,
    next_receipt: u64
}

/// In-process durable queue used by tests and the bootstrap demo.
///
/// Honors the external queue contract the pipeline depends on: FIFO hand-out,
/// per-delivery acknowledgment, redelivery of rejected messages with an
/// incremented receive count, and a dead-letter buffer once `max_receives`
/// is exceeded. The dead-letter buffer is inspectable, standing in for the
/// dead-letter destination a managed queue would provide.
pub struct InMemoryQueue {
    inner: Mutex<QueueInner>,
    max_receives: u32,
    unavailable: AtomicBool
}

impl InMemoryQueue {
    pub fn new() -> Self {
        Self::with_max_receives(DEFAULT_MAX_RECEIVES)
    }

    pub fn with_max_receives(max_receives: u32) -> Self {
        Self {
            inner: Mutex::new(QueueInner::default()),
            max_receives,
            unavailable: AtomicBool::new(false)
        }
    }

    /// Simulates a queue outage; enqueue fails while set.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub async fn ready_len(&self) -> usize {
        self.inner.lock().await.ready.len()
    }

    /// Bodies of messages that exceeded the redelivery budget.
    pub async fn dead_letter_bodies(&self) -> Vec<String> {
        self.inner.lock().await.dead_letter.iter()
            .map(|message| message.body.clone())
            .collect()
    }
}

#[async_trait]
impl WorkQueue for InMemoryQueue {
    async fn enqueue(&self, body: String) -> Result<MessageId, QueueError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(QueueError::unavailable("queue endpoint not reachable"));
        }

        let mut inner = self.inner.lock().await;

        inner.next_message += 1;
        let message_id = format!("msg-{}", inner.next_message);

        inner.ready.push_back(QueuedMessage {
            message_id: message_id.clone(),
            body,
            receive_count: 0
        });

        Ok(message_id)
    }

    async fn receive(&self, max: usize) -> Result<Vec<Delivery>, QueueError> {
        let mut inner = self.inner.lock().await;
        let mut deliveries = Vec::new();

        while deliveries.len() < max {
            let Some(mut message) = inner.ready.pop_front() else {
                break;
            };

            message.receive_count += 1;

            inner.next_receipt += 1;
            let receipt = format!("rcpt-{}", inner.next_receipt);

            deliveries.push(Delivery {
                message_id: message.message_id.clone(),
                receipt: receipt.clone(),
                body: message.body.clone(),
                receive_count: message.receive_count
            });

            inner.in_flight.insert(receipt, message);
        }

        Ok(deliveries)
    }

    async fn acknowledge(&self, receipt: &ReceiptHandle) -> Result<(), QueueError> {
        let mut inner = self.inner.lock().await;

        inner.in_flight.remove(receipt)
            .map(|message| debug!("Message [{}] acknowledged", message.message_id))
            .ok_or_else(|| QueueError::unknown_receipt(receipt))
    }

    async fn reject(&self, receipt: &ReceiptHandle) -> Result<(), QueueError> {
        let mut inner = self.inner.lock().await;

        let message = inner.in_flight.remove(receipt)
            .ok_or_else(|| QueueError::unknown_receipt(receipt))?;

        if message.receive_count >= self.max_receives {
            warn!("Message [{}] exceeded {} receives; moved to dead-letter", message.message_id, self.max_receives);
            inner.dead_letter.push(message);
        } else {
            inner.ready.push_back(message);
        }

        Ok(())
    }
}
