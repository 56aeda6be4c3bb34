use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::spawn;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::bus::{BrokerTransport, BusError, BusMessage};

const MAX_CONNECT_ATTEMPTS: u32 = 5;
const INITIAL_RETRY_DELAY: Duration = Duration::from_millis(300);
const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum ConnectionState {
    Disconnected,
    Connecting,
    Connected
}

/// Producer/consumer session over a [`BrokerTransport`].
///
/// The client is long-lived and shared per process: `connect` is idempotent
/// and guarded so concurrent callers cannot double-initialize the session,
/// and publishing lazily connects on first use. Connection establishment
/// retries transient failures with capped exponential backoff; exhausting the
/// retry budget is fatal and leaves the client disconnected.
pub struct EventBusClient<T: BrokerTransport> {
    transport: Arc<T>,
    client_id: String,
    state: Mutex<ConnectionState>,
    initial_retry_delay: Duration,
    max_retry_delay: Duration
}

impl<T: BrokerTransport> EventBusClient<T> {
    pub fn new(transport: Arc<T>, client_id: impl Into<String>) -> Self {
        Self {
            transport,
            client_id: client_id.into(),
            state: Mutex::new(ConnectionState::Disconnected),
            initial_retry_delay: INITIAL_RETRY_DELAY,
            max_retry_delay: MAX_RETRY_DELAY
        }
    }

    /// Overrides the backoff schedule. Tests use this to avoid real waits.
    pub fn with_backoff(mut self, initial: Duration, cap: Duration) -> Self {
        self.initial_retry_delay = initial;
        self.max_retry_delay = cap;
        self
    }

    /// Establishes the broker session; a no-op when already connected.
    ///
    /// # Errors
    /// Returns `BusError::ConnectionExhausted` once the bounded retry budget
    /// is spent. The caller should treat this as fatal for the component.
    pub async fn connect(&self) -> Result<(), BusError> {
        let mut state = self.state.lock().await;

        if *state == ConnectionState::Connected {
            return Ok(());
        }

        //NOTE: The state lock is held across the whole attempt sequence on purpose,
        //      a concurrent connect() parks here and observes Connected afterwards.
        *state = ConnectionState::Connecting;

        let mut delay = self.initial_retry_delay;

        for attempt in 1..=MAX_CONNECT_ATTEMPTS {
            match self.transport.open().await {
                Ok(()) => {
                    *state = ConnectionState::Connected;
                    info!("Event bus client [{}] connected", self.client_id);
                    return Ok(());
                }
                Err(connect_error) => {
                    warn!("Connection attempt {attempt}/{MAX_CONNECT_ATTEMPTS} failed: {connect_error}");

                    if attempt < MAX_CONNECT_ATTEMPTS {
                        sleep(delay).await;
                        delay = (delay * 2).min(self.max_retry_delay);
                    }
                }
            }
        }

        *state = ConnectionState::Disconnected;

        Err(BusError::connection_exhausted(MAX_CONNECT_ATTEMPTS))
    }

    /// Releases the session; safe to call when not connected.
    pub async fn disconnect(&self) {
        let mut state = self.state.lock().await;

        if *state == ConnectionState::Connected {
            self.transport.close().await;
            *state = ConnectionState::Disconnected;
            info!("Event bus client [{}] disconnected", self.client_id);
        }
    }

    /// Publishes one JSON-serialized payload keyed by `key`.
    ///
    /// A successful return means the broker acknowledged receipt. On failure
    /// the caller decides whether to retry or drop; nothing was acknowledged.
    pub async fn publish<P: Serialize>(&self, topic: &str, key: &str, payload: &P) -> Result<(), BusError> {
        self.ensure_connected().await?;

        let body = serde_json::to_string(payload)
            .map_err(|serialize_error| BusError::serialization(topic, serialize_error))?;

        self.transport.send(topic, BusMessage::json(key, body)).await?;

        debug!("Message sent to topic [{topic}] with key [{key}]");

        Ok(())
    }

    /// Publishes a batch of keyed payloads.
    ///
    /// # Errors
    /// Any failure surfaces as a single `BusError::BatchFailed`; the caller
    /// must re-submit the whole batch or fall back to per-item publishing.
    pub async fn publish_batch<P: Serialize>(&self, topic: &str, items: &[(String, P)]) -> Result<(), BusError> {
        self.ensure_connected().await?;

        let count = items.len();
        let mut messages = Vec::with_capacity(count);

        for (key, payload) in items {
            let body = serde_json::to_string(payload)
                .map_err(|serialize_error| BusError::batch_failed(topic, count, BusError::serialization(topic, serialize_error)))?;

            messages.push(BusMessage::json(key.clone(), body));
        }

        self.transport.send_batch(topic, messages).await
            .map_err(|send_error| BusError::batch_failed(topic, count, send_error))?;

        debug!("Batch of {count} messages sent to topic [{topic}]");

        Ok(())
    }

    /// Joins `group_id` on `topic` and runs `handler` once per delivered
    /// message on a spawned task, returning the task handle.
    ///
    /// A failing handler never terminates the loop: the error is logged and
    /// the message is treated as failed, left to the broker's redelivery or
    /// dead-letter policy. The loop ends when the broker closes the stream.
    pub async fn subscribe<H, Fut>(&self, topic: &str, group_id: &str, handler: H) -> Result<JoinHandle<()>, BusError>
    where
        H: Fn(BusMessage) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), BusError>> + Send
    {
        self.ensure_connected().await?;

        let mut receiver = self.transport.register(topic, group_id).await?;
        let topic = topic.to_string();
        let group_id = group_id.to_string();

        info!("Subscribed to topic [{topic}] as group [{group_id}]");

        let handle = spawn(async move {
            while let Some(message) = receiver.recv().await {
                let key = message.key.clone();

                if let Err(handler_error) = handler(message).await {
                    error!("Handler for topic [{topic}] group [{group_id}] failed on key [{key}]: {handler_error}");
                }
            }

            debug!("Subscription to topic [{topic}] for group [{group_id}] ended");
        });

        Ok(handle)
    }

    async fn ensure_connected(&self) -> Result<(), BusError> {
        if *self.state.lock().await == ConnectionState::Connected {
            return Ok(());
        }

        self.connect().await
    }
}
